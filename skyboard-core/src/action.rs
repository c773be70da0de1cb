//! Action traits for dispatchable state changes

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions are sent between the event loop, spawned tasks and timers, so they
/// must be `Clone + Debug + Send + 'static`.
pub trait Action: Clone + Debug + Send + 'static {
    /// Stable action name used in logs
    fn name(&self) -> &'static str;
}

/// Short, log-friendly description of an action
///
/// Result actions often carry whole payloads. Implement this to keep the
/// dispatch log readable; the default falls back to the action name.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        self.name().to_string()
    }
}
