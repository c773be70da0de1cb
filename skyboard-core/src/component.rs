//! Component trait for pure UI elements

use ratatui::{layout::Rect, Frame};

use crate::event::EventKind;

/// A UI element that renders from props and turns input into actions
///
/// Props carry all read-only data the component needs. `handle_event` never
/// mutates application state; it returns actions for the store instead.
/// Purely visual bookkeeping (for example the last rendered area of a button,
/// used for mouse hit-testing) may live in `&mut self`.
pub trait Component<A> {
    /// Data required to render the component (read-only)
    type Props<'a>;

    /// Map an input event to actions. Render-only components keep the default.
    #[allow(unused_variables)]
    fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> Vec<A> {
        Vec::new()
    }

    /// Render the component into `area`
    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}
