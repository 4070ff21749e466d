//! Keystroke debouncing and the request-generation guard used to discard
//! responses for input the user has already moved past.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{
    runtime::{Handle, TryCurrentError},
    task::AbortHandle,
};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(120);

/// Runs only the most recently scheduled task, once `quiet` has elapsed
/// without another call to [`Debouncer::schedule`].
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    runtime: Handle,
    pending: Arc<Mutex<Option<AbortHandle>>>,
}

impl Debouncer {
    /// Binds to the Tokio runtime of the caller; fails outside one.
    pub fn new(quiet: Duration) -> Result<Self, TryCurrentError> {
        Ok(Self {
            quiet,
            runtime: Handle::try_current()?,
            pending: Arc::new(Mutex::new(None)),
        })
    }

    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let quiet = self.quiet;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(quiet).await;
            task.await;
        });

        if let Some(previous) = self.pending.lock().replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }
}

/// Identifies one input generation. Later input gets a larger ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    current: Arc<AtomicU64>,
}

impl RequestGeneration {
    pub fn advance(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn only_last_call_in_window_runs() {
        let debouncer = Debouncer::new(DEFAULT_QUIET_PERIOD).unwrap();
        let runs = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let runs = Arc::clone(&runs);
            debouncer.schedule(async move { runs.lock().push(i) });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*runs.lock(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn calls_spaced_beyond_window_all_run() {
        let debouncer = Debouncer::new(Duration::from_millis(100)).unwrap();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let count = Arc::clone(&count);
            debouncer.schedule(async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(250)).await;
        }

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(100)).unwrap();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn construction_outside_runtime_is_an_error() {
        assert!(Debouncer::new(DEFAULT_QUIET_PERIOD).is_err());
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let generation = RequestGeneration::default();
        let first = generation.advance();
        assert!(generation.is_current(first));

        let second = generation.advance();
        assert!(second > first);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn clones_share_the_counter() {
        let generation = RequestGeneration::default();
        let shared = generation.clone();

        let ticket = generation.advance();
        shared.advance();

        assert!(!generation.is_current(ticket));
    }
}
