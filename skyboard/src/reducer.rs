//! Reducer: (state, action) -> state change + effects
//!
//! All state mutation happens here. Fetches are requested as
//! [`Effect::FetchWeather`] and come back as [`Action::RefreshDidSettle`].

use skyboard_core::DispatchResult;

use crate::action::{Action, RefreshTrigger};
use crate::effect::Effect;
use crate::state::{DashboardState, View};

pub fn reducer(state: &mut DashboardState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::RefreshStart(RefreshTrigger::Manual) => {
            if !state.can_refresh() {
                return DispatchResult::unchanged();
            }
            state.cycle += 1;
            state.is_refreshing = true;
            DispatchResult::changed_with(Effect::FetchWeather { cycle: state.cycle })
        }

        Action::RefreshStart(RefreshTrigger::Mount | RefreshTrigger::Timer) => {
            // Supersedes any cycle still in flight
            state.cycle += 1;
            DispatchResult::effect(Effect::FetchWeather { cycle: state.cycle })
        }

        Action::RefreshDidSettle { cycle, payload } => {
            if cycle != state.cycle {
                tracing::debug!(
                    cycle,
                    current = state.cycle,
                    "Discarding stale refresh result"
                );
                return DispatchResult::unchanged();
            }
            state.is_refreshing = false;
            state.view = match payload {
                Some(payload) => View::Ready(payload),
                None => View::Error,
            };
            // a shorter table pulls the viewport back onto its last row
            state.table_offset = state.table_offset.min(last_row(state));
            DispatchResult::changed()
        }

        Action::UiTableScroll(offset) => {
            let offset = offset.min(last_row(state));
            if offset == state.table_offset {
                return DispatchResult::unchanged();
            }
            state.table_offset = offset;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            // only the spinners animate
            if state.view.is_loading() || state.is_refreshing {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // handled by the runtime loop
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn last_row(state: &DashboardState) -> usize {
    state.row_count().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{CityWeather, WeatherPayload};

    fn payload(cities: &[(&str, &str, &str)]) -> WeatherPayload {
        WeatherPayload {
            processed_at: Some("2024-01-01T00:00:00Z".into()),
            result: cities
                .iter()
                .map(|(city, mood, summary)| {
                    (
                        city.to_string(),
                        CityWeather {
                            mood: mood.to_string(),
                            summary: summary.to_string(),
                        },
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    fn numbered_cities(n: usize) -> WeatherPayload {
        let names: Vec<String> = (1..=n).map(|i| format!("City {i}")).collect();
        let rows: Vec<(&str, &str, &str)> = names
            .iter()
            .map(|name| (name.as_str(), "Calm", "Mild"))
            .collect();
        payload(&rows)
    }

    fn ready_state() -> DashboardState {
        let mut state = DashboardState::new();
        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Mount));
        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 1,
                payload: Some(payload(&[("Delhi", "Sunny", "Clear skies")])),
            },
        );
        state
    }

    #[test]
    fn test_initial_state_is_loading() {
        let state = DashboardState::new();
        assert_eq!(state.view, View::Loading);
        assert!(!state.is_refreshing);
        assert_eq!(state.cycle, 0);
    }

    #[test]
    fn test_mount_starts_cycle_without_refreshing_flag() {
        let mut state = DashboardState::new();

        let result = reducer(&mut state, Action::RefreshStart(RefreshTrigger::Mount));

        assert!(!result.changed);
        assert_eq!(result.effects, vec![Effect::FetchWeather { cycle: 1 }]);
        assert!(!state.is_refreshing);
        assert_eq!(state.view, View::Loading);
    }

    #[test]
    fn test_settle_with_payload_is_ready() {
        let state = ready_state();

        assert_eq!(state.view.payload().map(|p| p.result.len()), Some(1));
        assert!(!state.is_refreshing);
    }

    #[test]
    fn test_settle_without_payload_is_error() {
        let mut state = DashboardState::new();
        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Mount));

        let result = reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 1,
                payload: None,
            },
        );

        assert!(result.changed);
        assert_eq!(state.view, View::Error);
    }

    #[test]
    fn test_failed_refresh_replaces_ready() {
        let mut state = ready_state();
        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Timer));
        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 2,
                payload: None,
            },
        );
        assert_eq!(state.view, View::Error);
    }

    #[test]
    fn test_manual_refresh_sets_and_clears_flag() {
        let mut state = ready_state();

        let result = reducer(&mut state, Action::RefreshStart(RefreshTrigger::Manual));
        assert!(result.changed);
        assert_eq!(result.effects, vec![Effect::FetchWeather { cycle: 2 }]);
        assert!(state.is_refreshing);
        // old table stays visible while refreshing
        assert!(state.view.payload().is_some());

        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 2,
                payload: None,
            },
        );
        assert!(!state.is_refreshing);
        assert_eq!(state.view, View::Error);
    }

    #[test]
    fn test_manual_refresh_ignored_while_refreshing_or_loading() {
        let mut loading = DashboardState::new();
        let result = reducer(&mut loading, Action::RefreshStart(RefreshTrigger::Manual));
        assert!(!result.changed);
        assert!(!result.has_effects());

        let mut state = ready_state();
        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Manual));
        let result = reducer(&mut state, Action::RefreshStart(RefreshTrigger::Manual));
        assert!(!result.has_effects());
        assert_eq!(state.cycle, 2);
    }

    #[test]
    fn test_manual_refresh_allowed_from_error() {
        let mut state = DashboardState::new();
        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Mount));
        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 1,
                payload: None,
            },
        );

        let result = reducer(&mut state, Action::RefreshStart(RefreshTrigger::Manual));
        assert!(result.has_effects());
        assert!(state.is_refreshing);
    }

    #[test]
    fn test_stale_settle_is_discarded() {
        let mut state = ready_state();
        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Manual));
        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Timer));
        assert_eq!(state.cycle, 3);

        // the superseded manual cycle answers late
        let result = reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 2,
                payload: None,
            },
        );
        assert!(!result.changed);
        assert!(state.view.payload().is_some());
        assert!(state.is_refreshing);

        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 3,
                payload: Some(payload(&[
                    ("Delhi", "Rainy", "Showers"),
                    ("Mumbai", "Humid", "Sticky"),
                ])),
            },
        );
        assert!(!state.is_refreshing);
        assert_eq!(state.view.payload().map(|p| p.result.len()), Some(2));
    }

    #[test]
    fn test_terminal_resize() {
        let mut state = DashboardState::new();
        let resize = Action::UiTerminalResize(100, 40);
        assert!(reducer(&mut state, resize.clone()).changed);
        assert_eq!(state.terminal_size, (100, 40));
        assert!(!reducer(&mut state, resize).changed);
    }

    #[test]
    fn test_tick_rerenders_only_while_waiting() {
        let mut state = DashboardState::new();
        assert!(reducer(&mut state, Action::Tick).changed);

        let mut state = ready_state();
        assert!(!reducer(&mut state, Action::Tick).changed);

        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Manual));
        assert!(reducer(&mut state, Action::Tick).changed);
    }

    #[test]
    fn test_table_scroll_stays_within_rows() {
        let mut state = DashboardState::new();
        assert!(!reducer(&mut state, Action::UiTableScroll(3)).changed);
        assert_eq!(state.table_offset, 0);

        state.view = View::Ready(numbered_cities(30));
        assert!(reducer(&mut state, Action::UiTableScroll(12)).changed);
        assert_eq!(state.table_offset, 12);

        reducer(&mut state, Action::UiTableScroll(500));
        assert_eq!(state.table_offset, 29);
        assert!(!reducer(&mut state, Action::UiTableScroll(29)).changed);

        reducer(&mut state, Action::UiTableScroll(0));
        assert_eq!(state.table_offset, 0);
    }

    #[test]
    fn test_refresh_keeps_scroll_position_within_new_rows() {
        let mut state = DashboardState {
            view: View::Ready(numbered_cities(30)),
            cycle: 1,
            table_offset: 20,
            ..Default::default()
        };

        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Timer));
        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 2,
                payload: Some(numbered_cities(30)),
            },
        );
        assert_eq!(state.table_offset, 20);

        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Timer));
        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 3,
                payload: Some(numbered_cities(5)),
            },
        );
        assert_eq!(state.table_offset, 4);

        reducer(&mut state, Action::RefreshStart(RefreshTrigger::Timer));
        reducer(
            &mut state,
            Action::RefreshDidSettle {
                cycle: 4,
                payload: None,
            },
        );
        assert_eq!(state.table_offset, 0);
    }
}
