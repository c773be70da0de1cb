//! Terminal input events and the crossterm poller

use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Input event delivered to components
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Key press (release and repeat events are filtered out)
    Key(KeyEvent),
    /// Mouse click, drag or scroll
    Mouse(MouseEvent),
    /// Terminal resize to (columns, rows)
    Resize(u16, u16),
}

impl EventKind {
    /// Convert a crossterm event, dropping the kinds the dashboard ignores.
    pub fn from_crossterm(event: event::Event) -> Option<Self> {
        match event {
            event::Event::Key(key) if key.kind == KeyEventKind::Press => Some(EventKind::Key(key)),
            event::Event::Mouse(mouse) => Some(EventKind::Mouse(mouse)),
            event::Event::Resize(w, h) => Some(EventKind::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawn the crossterm polling task.
///
/// Events are forwarded to `tx` until `cancel_token` fires or the receiver is
/// dropped. At most `MAX_EVENTS_PER_BATCH` events are read per wake-up so a
/// burst of input cannot starve the action loop.
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<EventKind>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Event poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut processed = 0;
                    while processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        processed += 1;
                        let Ok(evt) = event::read() else { continue };
                        if let Some(kind) = EventKind::from_crossterm(evt) {
                            if tx.send(kind).is_err() {
                                debug!("Event channel closed, stopping poller");
                                return;
                            }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseButton, MouseEventKind};

    fn key_with_kind(kind: KeyEventKind) -> event::Event {
        event::Event::Key(KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::empty(),
        })
    }

    #[test]
    fn test_key_press_is_forwarded() {
        let kind = EventKind::from_crossterm(key_with_kind(KeyEventKind::Press));
        assert!(matches!(kind, Some(EventKind::Key(k)) if k.code == KeyCode::Char('r')));
    }

    #[test]
    fn test_key_release_is_dropped() {
        assert_eq!(
            EventKind::from_crossterm(key_with_kind(KeyEventKind::Release)),
            None
        );
    }

    #[test]
    fn test_mouse_and_resize() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            EventKind::from_crossterm(event::Event::Mouse(click)),
            Some(EventKind::Mouse(click))
        );
        assert_eq!(
            EventKind::from_crossterm(event::Event::Resize(80, 24)),
            Some(EventKind::Resize(80, 24))
        );
        assert_eq!(EventKind::from_crossterm(event::Event::FocusGained), None);
    }
}
