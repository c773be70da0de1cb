//! Wires the dashboard into the runtime loop

use std::cell::RefCell;
use std::io;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::{Frame, Terminal, layout::Rect};
use skyboard_core::{EventKind, EventOutcome};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::api::WeatherSource;
use crate::components::{Component, DashboardView, DashboardViewProps};
use crate::controller::{self, DashboardRuntime, EffectHandler};
use crate::state::DashboardState;

/// Rendering and input mapping for the whole screen
#[derive(Default)]
pub struct DashboardUi {
    view: DashboardView,
}

impl DashboardUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        self.view.render(frame, area, DashboardViewProps { state });
    }

    pub fn map_event(&mut self, event: &EventKind, state: &DashboardState) -> EventOutcome<Action> {
        if let EventKind::Resize(width, height) = event {
            return EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render();
        }

        EventOutcome::from_actions(self.view.handle_event(event, DashboardViewProps { state }))
    }
}

/// Run the dashboard on a real terminal until the user quits.
pub async fn run<B, S>(
    terminal: &mut Terminal<B>,
    source: S,
    refresh_interval: Duration,
) -> io::Result<()>
where
    B: Backend,
    S: WeatherSource,
{
    let mut runtime = controller::new_runtime();
    controller::mount(&mut runtime, refresh_interval);

    let handler = EffectHandler::new(source);
    let ui = RefCell::new(DashboardUi::new());

    runtime
        .run(
            terminal,
            |frame, area, state| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handler.handle(effect, ctx),
        )
        .await
}

/// Like [`run`], with input events supplied by the caller.
///
/// Returns the runtime so the final state can be inspected.
pub async fn run_with_events<B, S>(
    terminal: &mut Terminal<B>,
    event_rx: mpsc::UnboundedReceiver<EventKind>,
    source: S,
    refresh_interval: Duration,
) -> io::Result<DashboardRuntime>
where
    B: Backend,
    S: WeatherSource,
{
    let mut runtime = controller::new_runtime();
    controller::mount(&mut runtime, refresh_interval);

    let handler = EffectHandler::new(source);
    let ui = RefCell::new(DashboardUi::new());

    runtime
        .run_with_events(
            terminal,
            event_rx,
            |frame, area, state| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handler.handle(effect, ctx),
        )
        .await?;

    Ok(runtime)
}
