//! Effect-aware store
//!
//! The reducer mutates state and returns a [`DispatchResult`]: whether a
//! re-render is needed plus any side effects to run. Effects are plain data;
//! the runtime hands them to an effect handler which spawns the actual work.
//!
//! ```ignore
//! fn reducer(state: &mut State, action: Action) -> DispatchResult<Effect> {
//!     match action {
//!         Action::Refresh => {
//!             state.cycle += 1;
//!             DispatchResult::changed_with(Effect::Fetch { cycle: state.cycle })
//!         }
//!         Action::DidLoad(data) => {
//!             state.data = Some(data);
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//! ```

use std::marker::PhantomData;

use crate::action::{Action, ActionSummary};

/// Outcome of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified.
    pub changed: bool,
    /// Effects to run after the state update.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change, no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// Reducer signature used by [`EffectStore`].
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Hooks around every dispatch.
pub trait Middleware<A: Action> {
    /// Called before the reducer sees the action
    fn before(&mut self, action: &A);

    /// Called after the reducer, with its change flag and effect count
    fn after(&mut self, action: &A, state_changed: bool, effects: usize);
}

/// Middleware that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool, _effects: usize) {}
}

/// Middleware that records each processed action as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMiddleware;

impl<A: ActionSummary> Middleware<A> for TracingMiddleware {
    fn before(&mut self, _action: &A) {}

    fn after(&mut self, action: &A, state_changed: bool, effects: usize) {
        tracing::debug!(
            action = %action.name(),
            summary = %action.summary(),
            state_changed,
            effects,
            "Action processed"
        );
    }
}

/// Single source of truth for application state.
pub struct EffectStore<S, A, E, M = NoopMiddleware> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    middleware: M,
    _marker: PhantomData<(A, E)>,
}

impl<S, A: Action, E> EffectStore<S, A, E, NoopMiddleware> {
    /// Create a store without middleware.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self::with_middleware(state, reducer, NoopMiddleware)
    }
}

impl<S, A: Action, E, M: Middleware<A>> EffectStore<S, A, E, M> {
    /// Create a store that runs `middleware` around every dispatch.
    pub fn with_middleware(state: S, reducer: EffectReducer<S, A, E>, middleware: M) -> Self {
        Self {
            state,
            reducer,
            middleware,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Run the action through middleware and reducer.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = (self.reducer)(&mut self.state, action.clone());
        self.middleware
            .after(&action, result.changed, result.effects.len());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Bump,
        Fetch,
        Ignore,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Bump => "Bump",
                TestAction::Fetch => "Fetch",
                TestAction::Ignore => "Ignore",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestEffect {
        Load(u32),
    }

    #[derive(Default)]
    struct TestState {
        count: u32,
    }

    fn test_reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Bump => {
                state.count += 1;
                DispatchResult::changed()
            }
            TestAction::Fetch => {
                state.count += 1;
                DispatchResult::changed_with(TestEffect::Load(state.count))
            }
            TestAction::Ignore => DispatchResult::unchanged(),
        }
    }

    #[derive(Default)]
    struct CountingMiddleware {
        before: usize,
        after: usize,
        effects: usize,
    }

    impl<A: Action> Middleware<A> for CountingMiddleware {
        fn before(&mut self, _action: &A) {
            self.before += 1;
        }

        fn after(&mut self, _action: &A, _state_changed: bool, effects: usize) {
            self.after += 1;
            self.effects += effects;
        }
    }

    #[test]
    fn test_dispatch_result_builders() {
        let r: DispatchResult<TestEffect> = DispatchResult::unchanged();
        assert!(!r.changed);
        assert!(!r.has_effects());

        let r = DispatchResult::effect(TestEffect::Load(1));
        assert!(!r.changed);
        assert_eq!(r.effects, vec![TestEffect::Load(1)]);

        let r = DispatchResult::changed_with(TestEffect::Load(1));
        assert!(r.changed);
        assert!(r.has_effects());
    }

    #[test]
    fn test_store_dispatch_returns_effects() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);

        let result = store.dispatch(TestAction::Bump);
        assert!(result.changed);
        assert!(result.effects.is_empty());

        let result = store.dispatch(TestAction::Fetch);
        assert_eq!(result.effects, vec![TestEffect::Load(2)]);
        assert_eq!(store.state().count, 2);

        let result = store.dispatch(TestAction::Ignore);
        assert!(!result.changed);
    }

    #[test]
    fn test_store_runs_middleware() {
        let mut store = EffectStore::with_middleware(
            TestState::default(),
            test_reducer,
            CountingMiddleware::default(),
        );

        store.dispatch(TestAction::Bump);
        store.dispatch(TestAction::Fetch);

        assert_eq!(store.middleware().before, 2);
        assert_eq!(store.middleware().after, 2);
        assert_eq!(store.middleware().effects, 1);
    }
}
