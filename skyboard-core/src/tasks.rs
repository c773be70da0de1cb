//! Keyed one-shot async tasks
//!
//! Each task resolves to a single action that is sent back to the event loop.
//! Tasks are keyed: spawning under a key that is still running aborts the
//! older task first, so at most one task per key is ever in flight.
//!
//! ```ignore
//! tasks.spawn("refresh", async move {
//!     let body = source.fetch_weather().await;
//!     Action::RefreshDidSettle { cycle, payload: decode(body) }
//! });
//! ```

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::Action;

/// Identifies a task for replacement and cancellation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

/// Registry of running tasks.
///
/// Aborted tasks never send their action. Dropping the manager aborts
/// everything still running.
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A: Action> TaskManager<A> {
    /// Create a manager that sends task results into `action_tx`.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            tasks: HashMap::new(),
            action_tx,
        }
    }

    /// Spawn `future` under `key`, aborting any task already running there.
    ///
    /// Returns `true` if a previous task was still in flight and got aborted.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> bool
    where
        F: Future<Output = A> + Send + 'static,
    {
        let key = key.into();
        let replaced = self.cancel(&key);
        if replaced {
            tracing::debug!(task = %key.name(), "Aborted in-flight task");
        }

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            // Receiver is gone after teardown; the result is simply dropped.
            let _ = tx.send(action);
        });

        self.tasks.insert(key, handle.abort_handle());
        replaced
    }

    /// Abort the task under `key`. Returns `true` if one was still running.
    pub fn cancel(&mut self, key: &TaskKey) -> bool {
        match self.tasks.remove(key) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Abort every task, e.g. on teardown.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// Number of tasks still running.
    pub fn len(&self) -> usize {
        self.tasks
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Done(usize),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            "Done"
        }
    }

    #[test]
    fn test_task_key() {
        let k1 = TaskKey::new("refresh");
        let k2: TaskKey = "refresh".into();

        assert_eq!(k1, k2);
        assert_eq!(k1.name(), "refresh");
    }

    #[tokio::test]
    async fn test_spawn_sends_action() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("refresh", async { TestAction::Done(42) });

        let action = tokio::time::timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert!(matches!(action, TestAction::Done(42)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_replaces_running_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);
        let counter = Arc::new(AtomicUsize::new(0));

        let c1 = counter.clone();
        let replaced = tasks.spawn("refresh", async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            c1.fetch_add(1, Ordering::SeqCst);
            TestAction::Done(1)
        });
        assert!(!replaced);

        let c2 = counter.clone();
        let replaced = tasks.spawn("refresh", async move {
            c2.fetch_add(10, Ordering::SeqCst);
            TestAction::Done(2)
        });
        assert!(replaced);

        let action = rx.recv().await.expect("channel closed");
        assert!(matches!(action, TestAction::Done(2)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_action() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("refresh", async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            TestAction::Done(1)
        });
        assert_eq!(tasks.len(), 1);

        assert!(tasks.cancel(&TaskKey::new("refresh")));
        assert!(tasks.is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_finished_task_is_not_running() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("refresh", async { TestAction::Done(7) });
        let _ = rx.recv().await;
        // Give the task a moment to finish after its send.
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(tasks.is_empty());
        assert!(!tasks.cancel(&TaskKey::new("refresh")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("a", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            TestAction::Done(1)
        });
        tasks.spawn("b", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            TestAction::Done(2)
        });
        assert_eq!(tasks.len(), 2);

        tasks.cancel_all();
        assert!(tasks.is_empty());
    }
}
