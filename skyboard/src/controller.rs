//! Refresh scheduling and the fetch cycle
//!
//! Every refresh, whether from mount, the timer or the user, runs the same
//! cycle: the reducer bumps the generation and asks for
//! [`Effect::FetchWeather`], [`EffectHandler`] spawns the fetch under the
//! `"refresh"` task key (aborting a superseded one), and the task settles with
//! [`Action::RefreshDidSettle`] carrying its generation.

use std::sync::Arc;
use std::time::Duration;

use skyboard_core::{EffectContext, EffectRuntime, EffectStore, TracingMiddleware};

use crate::action::{Action, RefreshTrigger};
use crate::api::WeatherSource;
use crate::effect::Effect;
use crate::payload::WeatherPayload;
use crate::reducer::reducer;
use crate::state::{DashboardState, SPINNER_TICK_MS};

pub const REFRESH_TASK: &str = "refresh";
pub const REFRESH_TIMER: &str = "refresh";
pub const TICK_TIMER: &str = "tick";

pub type DashboardStore = EffectStore<DashboardState, Action, Effect, TracingMiddleware>;
pub type DashboardRuntime = EffectRuntime<DashboardState, Action, Effect, TracingMiddleware>;

/// Fresh runtime in the Loading state, with action logging.
pub fn new_runtime() -> DashboardRuntime {
    let store = EffectStore::with_middleware(DashboardState::new(), reducer, TracingMiddleware);
    EffectRuntime::from_store(store)
}

/// Start the spinner tick and the auto-refresh timer, and queue the initial
/// load. Both timers stop when the runtime is torn down.
pub fn mount(runtime: &mut DashboardRuntime, refresh_interval: Duration) {
    runtime
        .subscriptions()
        .interval(TICK_TIMER, Duration::from_millis(SPINNER_TICK_MS), || {
            Action::Tick
        })
        .interval(REFRESH_TIMER, refresh_interval, || {
            Action::RefreshStart(RefreshTrigger::Timer)
        });

    runtime.enqueue(Action::RefreshStart(RefreshTrigger::Mount));
    tracing::info!(
        refresh_interval_ms = refresh_interval.as_millis() as u64,
        "Dashboard mounted"
    );
}

/// Runs effects against a [`WeatherSource`]
pub struct EffectHandler<S> {
    source: Arc<S>,
}

impl<S: WeatherSource> EffectHandler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn handle(&self, effect: Effect, ctx: &mut EffectContext<'_, Action>) {
        match effect {
            Effect::FetchWeather { cycle } => {
                let source = Arc::clone(&self.source);
                let superseded = ctx.tasks().spawn(REFRESH_TASK, async move {
                    let payload = fetch_cycle(source.as_ref(), cycle).await;
                    Action::RefreshDidSettle { cycle, payload }
                });
                if superseded {
                    tracing::info!(cycle, "Superseded in-flight refresh");
                }
            }
        }
    }
}

/// Fetch and decode. `None` covers every failure; the cause is logged here.
pub async fn fetch_cycle<S: WeatherSource>(source: &S, cycle: u64) -> Option<WeatherPayload> {
    let Some(body) = source.fetch_weather().await else {
        tracing::warn!(cycle, "Failed to fetch weather data");
        return None;
    };

    match WeatherPayload::from_body(body) {
        Ok(payload) => {
            tracing::info!(
                cycle,
                cities = payload.result.len(),
                "Weather data refreshed"
            );
            Some(payload)
        }
        Err(error) => {
            tracing::warn!(cycle, %error, "Failed to fetch weather data");
            None
        }
    }
}
