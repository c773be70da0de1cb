//! Dashboard state
//!
//! Components receive `&DashboardState` as props; only the reducer mutates it.

use std::time::Duration;

use crate::payload::WeatherPayload;

/// Auto-refresh period
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(600_000);

/// Spinner animation tick
pub const SPINNER_TICK_MS: u64 = 100;

/// What the dashboard body shows. Exactly one is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    /// No refresh cycle has settled yet
    #[default]
    Loading,
    /// The latest cycle produced no usable payload
    Error,
    /// The latest cycle produced a payload
    Ready(WeatherPayload),
}

impl View {
    pub fn is_loading(&self) -> bool {
        matches!(self, View::Loading)
    }

    pub fn payload(&self) -> Option<&WeatherPayload> {
        match self {
            View::Ready(payload) => Some(payload),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardState {
    pub view: View,

    /// A manually triggered refresh is in flight
    pub is_refreshing: bool,

    /// Generation of the most recently started refresh cycle.
    /// Settles carrying any other generation are stale.
    pub cycle: u64,

    /// Spinner frame counter
    pub tick_count: u32,

    /// First table row in view, never past the last row
    pub table_offset: usize,

    pub terminal_size: (u16, u16),
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            view: View::Loading,
            is_refreshing: false,
            cycle: 0,
            tick_count: 0,
            table_offset: 0,
            terminal_size: (80, 24), // updated on resize
        }
    }

    /// Whether a manual refresh may start now.
    ///
    /// Disabled while one is already in flight and before the first settle.
    pub fn can_refresh(&self) -> bool {
        !self.is_refreshing && !self.view.is_loading()
    }

    /// Rows in the table on screen, zero unless ready.
    pub fn row_count(&self) -> usize {
        self.view.payload().map_or(0, |p| p.result.len())
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
