//! Test utilities
//!
//! - [`key`]: build a `KeyEvent` from a string such as `"r"`, `"f5"` or `"ctrl+c"`
//! - [`click`]: a left mouse click at a cell
//! - [`RenderHarness`]: render a component into an in-memory terminal
//! - [`ActionAssertions`]: assertions over the actions a component returned
//!
//! ```ignore
//! let mut render = RenderHarness::new(80, 24);
//! let output = render.render_to_string_plain(|frame| {
//!     component.render(frame, frame.area(), props);
//! });
//! assert!(output.contains("Refresh Now"));
//! ```

use std::fmt::Debug;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};

use crate::event::EventKind;

/// Build a `KeyEvent` from a key string.
///
/// Accepts a single character or a named key (`enter`, `esc`, `pagedown`,
/// `f1`..`f12` and so on), optionally prefixed by `ctrl+`, `alt+` or `shift+`.
///
/// # Panics
///
/// Panics if the string cannot be parsed.
pub fn key(s: &str) -> KeyEvent {
    let lower = s.trim().to_lowercase();
    let mut parts: Vec<&str> = lower.split('+').collect();
    let key_part = parts.pop().unwrap_or_default();

    let mut modifiers = KeyModifiers::empty();
    for part in parts {
        match part {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            other => panic!("Invalid key modifier {other:?} in {s:?}"),
        }
    }

    let code = match key_part {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n @ 1..=12) => KeyCode::F(n),
            _ => panic!("Invalid key string: {s:?}"),
        },
        c if c.chars().count() == 1 => KeyCode::Char(c.chars().next().unwrap_or(' ')),
        _ => panic!("Invalid key string: {s:?}"),
    };

    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// `EventKind::Key` for a key string, see [`key`].
pub fn key_event(s: &str) -> EventKind {
    EventKind::Key(key(s))
}

/// Left mouse button press at (`column`, `row`).
pub fn click(column: u16, row: u16) -> EventKind {
    EventKind::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

/// Render into a fixed-size in-memory terminal.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|e| panic!("failed to create test terminal: {e}"));
        Self { terminal }
    }

    /// Render once and return the resulting buffer.
    pub fn render<F>(&mut self, f: F) -> &Buffer
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal
            .draw(f)
            .unwrap_or_else(|e| panic!("render failed: {e}"));
        self.terminal.backend().buffer()
    }

    /// Render once and return the text content, one line per row.
    pub fn render_to_string_plain<F>(&mut self, f: F) -> String
    where
        F: FnOnce(&mut Frame),
    {
        buffer_to_string_plain(self.render(f))
    }
}

/// Text content of a buffer without styling, rows joined by `\n`.
pub fn buffer_to_string_plain(buffer: &Buffer) -> String {
    buffer_rect_to_string_plain(buffer, buffer.area)
}

/// Text content of `rect` within `buffer`, rows joined by `\n`.
pub fn buffer_rect_to_string_plain(buffer: &Buffer, rect: Rect) -> String {
    let mut out = String::new();
    for y in rect.top()..rect.bottom() {
        if y > rect.top() {
            out.push('\n');
        }
        let mut x = rect.left();
        while x < rect.right() {
            let symbol = buffer[(x, y)].symbol();
            out.push_str(symbol);
            // Wide glyphs occupy the following cell too
            let width = unicode_width(symbol);
            x += width.max(1);
        }
    }
    out
}

fn unicode_width(symbol: &str) -> u16 {
    use ratatui::text::Span;
    Span::raw(symbol).width() as u16
}

/// Assertions over actions returned from `handle_event`.
pub trait ActionAssertions<A> {
    fn assert_empty(&self);
    fn assert_count(&self, n: usize);
    fn assert_first(&self, expected: A);
}

impl<A: PartialEq + Debug> ActionAssertions<A> for [A] {
    fn assert_empty(&self) {
        assert!(self.is_empty(), "expected no actions, got {self:?}");
    }

    fn assert_count(&self, n: usize) {
        assert_eq!(self.len(), n, "unexpected action count in {self:?}");
    }

    fn assert_first(&self, expected: A) {
        assert_eq!(
            self.first(),
            Some(&expected),
            "first action mismatch in {self:?}"
        );
    }
}

impl<A: PartialEq + Debug> ActionAssertions<A> for Vec<A> {
    fn assert_empty(&self) {
        self.as_slice().assert_empty();
    }

    fn assert_count(&self, n: usize) {
        self.as_slice().assert_count(n);
    }

    fn assert_first(&self, expected: A) {
        self.as_slice().assert_first(expected);
    }
}
