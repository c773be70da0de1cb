//! Dashboard actions
//!
//! Naming follows an intent/result split: `RefreshStart` is the intent,
//! `RefreshDidSettle` the async result sent back by the fetch task.

use skyboard_core::{Action as ActionTrait, ActionSummary};

use crate::payload::WeatherPayload;

/// What started a refresh cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Initial load
    Mount,
    /// Auto-refresh timer
    Timer,
    /// The user pressed the refresh control
    Manual,
}

impl RefreshTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshTrigger::Mount => "mount",
            RefreshTrigger::Timer => "timer",
            RefreshTrigger::Manual => "manual",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Intent: start a refresh cycle
    RefreshStart(RefreshTrigger),

    /// Result: refresh cycle `cycle` finished. `None` means no usable payload.
    RefreshDidSettle {
        cycle: u64,
        payload: Option<WeatherPayload>,
    },

    /// Terminal was resized
    UiTerminalResize(u16, u16),

    /// Scroll the table so this row is the first one in view
    UiTableScroll(usize),

    /// Spinner tick
    Tick,

    Quit,
}

impl ActionTrait for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::RefreshStart(_) => "RefreshStart",
            Action::RefreshDidSettle { .. } => "RefreshDidSettle",
            Action::UiTerminalResize(..) => "UiTerminalResize",
            Action::UiTableScroll(_) => "UiTableScroll",
            Action::Tick => "Tick",
            Action::Quit => "Quit",
        }
    }
}

/// Keeps the dispatch log readable: settles show a row count, not the payload.
impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::RefreshStart(trigger) => format!("RefreshStart({})", trigger.as_str()),
            Action::RefreshDidSettle {
                cycle,
                payload: Some(payload),
            } => format!(
                "RefreshDidSettle {{ cycle: {cycle}, cities: {} }}",
                payload.result.len()
            ),
            Action::RefreshDidSettle {
                cycle,
                payload: None,
            } => format!("RefreshDidSettle {{ cycle: {cycle}, failed }}"),
            _ => format!("{self:?}"),
        }
    }
}
