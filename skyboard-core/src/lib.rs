//! Core runtime for the skyboard dashboard
//!
//! A small Redux/Elm-style architecture for terminal apps:
//!
//! - **Action**: a description of something that happened
//! - **EffectStore**: state plus a pure reducer returning [`DispatchResult`]
//! - **Effects**: data describing side effects, run by an effect handler
//! - **TaskManager**: keyed one-shot async tasks that resolve to actions
//! - **Subscriptions**: interval timers that keep emitting actions
//! - **EffectRuntime**: the loop tying input, actions and rendering together
//!
//! # Async pattern
//!
//! Work is split into an intent action and a result action:
//!
//! ```ignore
//! enum Action {
//!     RefreshNow,                                 // intent
//!     RefreshDidSettle { cycle: u64, payload: Option<Payload> }, // result
//! }
//! ```
//!
//! The reducer answers the intent with an effect, the effect handler spawns a
//! task, and the task sends the result action back through the runtime.

pub mod action;
pub mod component;
pub mod event;
pub mod runtime;
pub mod store;
pub mod subscriptions;
pub mod tasks;
pub mod testing;

pub use action::{Action, ActionSummary};
pub use component::Component;
pub use event::{spawn_event_poller, EventKind};
pub use runtime::{EffectContext, EffectRuntime, EventOutcome};
pub use store::{
    DispatchResult, EffectReducer, EffectStore, Middleware, NoopMiddleware, TracingMiddleware,
};
pub use subscriptions::{SubKey, Subscriptions};
pub use tasks::{TaskKey, TaskManager};

pub use ratatui::{layout::Rect, Frame};
