//! Processed-at line, payload provenance and the refresh button

use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};
use skyboard_core::EventKind;

use super::Component;
use crate::action::{Action, RefreshTrigger};

pub const REFRESH_LABEL: &str = "Refresh Now";
pub const REFRESHING_LABEL: &str = "Refreshing...";

/// Remembers where the button was last drawn so clicks can be hit-tested.
#[derive(Default)]
pub struct HeaderBar {
    button_area: Option<Rect>,
}

pub struct HeaderBarProps<'a> {
    /// `processed_at`, already formatted for display
    pub processed_at: &'a str,
    pub model: Option<&'a str>,
    pub source: Option<&'a str>,
    pub is_refreshing: bool,
    pub can_refresh: bool,
}

impl HeaderBar {
    pub const HEIGHT: u16 = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Area of the button in the last render, if it was drawn.
    pub fn button_area(&self) -> Option<Rect> {
        self.button_area
    }

    /// Forget the button, e.g. when the header is not on screen.
    pub fn clear(&mut self) {
        self.button_area = None;
    }

    fn hit(&self, column: u16, row: u16) -> bool {
        self.button_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }
}

impl Component<Action> for HeaderBar {
    type Props<'a> = HeaderBarProps<'a>;

    fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> Vec<Action> {
        match event {
            EventKind::Mouse(mouse)
                if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                    && props.can_refresh
                    && self.hit(mouse.column, mouse.row) =>
            {
                vec![Action::RefreshStart(RefreshTrigger::Manual)]
            }
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let [top, meta] = Layout::vertical([Constraint::Length(1); 2]).areas(area);

        let label = if props.is_refreshing {
            REFRESHING_LABEL
        } else {
            REFRESH_LABEL
        };
        let button_text = format!(" {label} ");
        let button_width = button_text.chars().count() as u16;
        let columns = Layout::horizontal([Constraint::Min(0), Constraint::Length(button_width)]);
        let [processed, button] = columns.areas(top);

        let processed_line = Line::from(vec![
            Span::styled(" Processed at: ", Style::default().fg(Color::Gray).bold()),
            Span::styled(props.processed_at, Style::default().fg(Color::White)),
        ]);
        frame.render_widget(Paragraph::new(processed_line), processed);

        let button_style = if props.can_refresh {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray).bg(Color::DarkGray)
        };
        let button_line = Line::styled(button_text, button_style);
        frame.render_widget(Paragraph::new(button_line), button);
        self.button_area = Some(button);

        let name_style = Style::default().fg(Color::DarkGray);
        let value_style = Style::default().fg(Color::Gray);
        let mut provenance = Vec::new();
        if let Some(model) = props.model {
            provenance.push(Span::styled(" Model: ", name_style));
            provenance.push(Span::styled(model, value_style));
        }
        if let Some(source) = props.source {
            provenance.push(Span::styled(" Source: ", name_style));
            provenance.push(Span::styled(source, value_style));
        }
        if !provenance.is_empty() {
            frame.render_widget(Paragraph::new(Line::from(provenance)), meta);
        }
    }
}
