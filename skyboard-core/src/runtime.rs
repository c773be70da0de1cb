//! The event/action/render loop
//!
//! [`EffectRuntime`] owns the store, the action channel, the task manager and
//! the subscriptions. Each loop iteration renders if the last dispatch changed
//! state, then waits for either an input event or an action:
//!
//! 1. Input events go through `map_event`, producing actions
//! 2. Actions go through the store; returned effects go to `handle_effect`
//! 3. Effects spawn tasks or subscriptions, which feed actions back in
//!
//! When `should_quit` accepts an action the runtime tears down: timers and
//! in-flight tasks are aborted and queued actions are discarded.

use std::io;
use std::marker::PhantomData;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::event::{spawn_event_poller, EventKind};
use crate::store::{EffectStore, Middleware, NoopMiddleware};
use crate::subscriptions::Subscriptions;
use crate::tasks::TaskManager;
use crate::Action;

/// Timeout passed to each `crossterm::event::poll` call.
const POLL_TIMEOUT: Duration = Duration::from_millis(10);
/// Sleep between poll cycles.
const LOOP_SLEEP: Duration = Duration::from_millis(16);

/// Actions produced by an input event, plus a render hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome<A> {
    pub actions: Vec<A>,
    /// Force a re-render even if no action changes state.
    pub needs_render: bool,
}

impl<A> EventOutcome<A> {
    pub fn ignored() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: false,
        }
    }

    pub fn action(action: A) -> Self {
        Self {
            actions: vec![action],
            needs_render: false,
        }
    }

    pub fn from_actions(iter: impl IntoIterator<Item = A>) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            needs_render: false,
        }
    }

    pub fn with_render(mut self) -> Self {
        self.needs_render = true;
        self
    }
}

impl<A> Default for EventOutcome<A> {
    fn default() -> Self {
        Self::ignored()
    }
}

/// What an effect handler can reach.
///
/// Effects only ever start keyed tasks; timers belong to the mount step.
pub struct EffectContext<'a, A: Action> {
    tasks: &'a mut TaskManager<A>,
}

impl<A: Action> EffectContext<'_, A> {
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        self.tasks
    }
}

/// Runtime for an effect store.
pub struct EffectRuntime<S, A: Action, E, M: Middleware<A> = NoopMiddleware> {
    store: EffectStore<S, A, E, M>,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    should_render: bool,
    tasks: TaskManager<A>,
    subscriptions: Subscriptions<A>,
    _effect: PhantomData<E>,
}

impl<S, A: Action, E, M: Middleware<A>> EffectRuntime<S, A, E, M> {
    pub fn from_store(store: EffectStore<S, A, E, M>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let tasks = TaskManager::new(action_tx.clone());
        let subscriptions = Subscriptions::new(action_tx.clone());

        Self {
            store,
            action_tx,
            action_rx,
            should_render: true,
            tasks,
            subscriptions,
            _effect: PhantomData,
        }
    }

    /// Queue an action for the next loop iteration.
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        &mut self.tasks
    }

    pub fn subscriptions(&mut self) -> &mut Subscriptions<A> {
        &mut self.subscriptions
    }

    /// Dispatch one action and run its effects. Returns the change flag.
    pub fn dispatch<F>(&mut self, action: A, mut handle_effect: F) -> bool
    where
        F: FnMut(E, &mut EffectContext<'_, A>),
    {
        let result = self.store.dispatch(action);
        if result.has_effects() {
            let mut ctx = EffectContext {
                tasks: &mut self.tasks,
            };
            for effect in result.effects {
                handle_effect(effect, &mut ctx);
            }
        }
        result.changed
    }

    /// Wait for the next queued action.
    pub async fn next_action(&mut self) -> Option<A> {
        self.action_rx.recv().await
    }

    /// Stop timers, abort in-flight tasks and drop anything still queued.
    ///
    /// Tasks that already finished their work may still try to send; the
    /// closed channel turns that into a no-op.
    pub fn teardown(&mut self) {
        self.subscriptions.cancel_all();
        self.tasks.cancel_all();
        self.action_rx.close();

        let mut discarded = 0usize;
        while self.action_rx.try_recv().is_ok() {
            discarded += 1;
        }
        tracing::info!(discarded, "Runtime torn down");
    }

    /// Run against the real terminal, polling crossterm for input.
    pub async fn run<B, FRender, FEvent, FQuit, FEffect>(
        &mut self,
        terminal: &mut Terminal<B>,
        render: FRender,
        map_event: FEvent,
        should_quit: FQuit,
        handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &S),
        FEvent: FnMut(&EventKind, &S) -> EventOutcome<A>,
        FQuit: FnMut(&A) -> bool,
        FEffect: FnMut(E, &mut EffectContext<'_, A>),
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();
        let _poller = spawn_event_poller(event_tx, POLL_TIMEOUT, LOOP_SLEEP, cancel_token.clone());

        let result = self
            .run_with_events(
                terminal,
                event_rx,
                render,
                map_event,
                should_quit,
                handle_effect,
            )
            .await;

        cancel_token.cancel();
        result
    }

    /// Run with input events from `event_rx` instead of crossterm.
    ///
    /// Returns once `should_quit` accepts an action, or when both channels
    /// are closed. The runtime is torn down either way.
    pub async fn run_with_events<B, FRender, FEvent, FQuit, FEffect>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut event_rx: mpsc::UnboundedReceiver<EventKind>,
        mut render: FRender,
        mut map_event: FEvent,
        mut should_quit: FQuit,
        mut handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &S),
        FEvent: FnMut(&EventKind, &S) -> EventOutcome<A>,
        FQuit: FnMut(&A) -> bool,
        FEffect: FnMut(E, &mut EffectContext<'_, A>),
    {
        let result = loop {
            if self.should_render {
                let state = self.store.state();
                let drawn = terminal.draw(|frame| {
                    let area = frame.area();
                    render(frame, area, state);
                });
                if let Err(e) = drawn {
                    break Err(e);
                }
                self.should_render = false;
            }

            tokio::select! {
                Some(event) = event_rx.recv() => {
                    let outcome = map_event(&event, self.store.state());
                    if outcome.needs_render {
                        self.should_render = true;
                    }
                    for action in outcome.actions {
                        let _ = self.action_tx.send(action);
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    if should_quit(&action) {
                        break Ok(());
                    }
                    if self.dispatch(action, &mut handle_effect) {
                        self.should_render = true;
                    }
                }

                else => break Ok(()),
            }
        };

        self.teardown();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DispatchResult;
    use crate::testing::key_event;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::Paragraph;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Poll,
        DidPoll(u32),
        Quit,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Poll => "Poll",
                TestAction::DidPoll(_) => "DidPoll",
                TestAction::Quit => "Quit",
            }
        }
    }

    enum TestEffect {
        Poll(u32),
    }

    #[derive(Default)]
    struct TestState {
        polls: u32,
        last: Option<u32>,
    }

    fn reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Poll => {
                state.polls += 1;
                DispatchResult::effect(TestEffect::Poll(state.polls))
            }
            TestAction::DidPoll(n) => {
                state.last = Some(n);
                DispatchResult::changed()
            }
            TestAction::Quit => DispatchResult::unchanged(),
        }
    }

    fn handle_effect(effect: TestEffect, ctx: &mut EffectContext<'_, TestAction>) {
        match effect {
            TestEffect::Poll(n) => {
                ctx.tasks()
                    .spawn("poll", async move { TestAction::DidPoll(n) });
            }
        }
    }

    fn runtime() -> EffectRuntime<TestState, TestAction, TestEffect> {
        EffectRuntime::from_store(EffectStore::new(TestState::default(), reducer))
    }

    #[tokio::test]
    async fn test_dispatch_runs_effects() {
        let mut runtime = runtime();
        assert!(!runtime.dispatch(TestAction::Poll, handle_effect));
        let action = runtime.next_action().await.expect("channel open");
        assert_eq!(action, TestAction::DidPoll(1));

        assert!(runtime.dispatch(action, handle_effect));
        assert_eq!(runtime.state().last, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_stops_sources() {
        let mut runtime = runtime();
        runtime
            .subscriptions()
            .interval("poll", Duration::from_secs(1), || TestAction::Poll);
        runtime.enqueue(TestAction::Poll);

        runtime.teardown();

        assert!(runtime.subscriptions().is_empty());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runtime.next_action().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_events_renders_and_quits() {
        let mut runtime = runtime();
        let mut terminal = Terminal::new(TestBackend::new(20, 1)).expect("terminal");
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        runtime.enqueue(TestAction::Poll);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let _ = event_tx.send(key_event("q"));
        });

        runtime
            .run_with_events(
                &mut terminal,
                event_rx,
                |frame, area, state: &TestState| {
                    let text = format!("last={:?}", state.last);
                    frame.render_widget(Paragraph::new(text), area);
                },
                |event, _| match event {
                    EventKind::Key(_) => EventOutcome::action(TestAction::Quit),
                    _ => EventOutcome::ignored(),
                },
                |action| matches!(action, TestAction::Quit),
                handle_effect,
            )
            .await
            .expect("run");

        let line: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(line.starts_with("last=Some(1)"), "got {line:?}");
    }
}
