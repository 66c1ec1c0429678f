//! Cooperative cancellation for in-flight migrations
//!
//! The executor checks the token between protocol steps. A cancelled
//! operation rolls its unit of work back instead of leaving it open.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared cancel flag with an optional deadline
///
/// Clones share the flag, so a signal handler or watchdog thread can hold
/// one clone while the executor holds another.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that also trips once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Request cancellation for every clone of this token
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let watcher = token.clone();
        assert!(!watcher.is_cancelled());
        token.cancel();
        assert!(watcher.is_cancelled());
    }

    #[test]
    fn test_elapsed_deadline_cancels() {
        let token = CancelToken::new().with_deadline(Instant::now());
        assert!(token.is_cancelled());

        let later = CancelToken::new().with_deadline(Instant::now() + Duration::from_secs(3600));
        assert!(!later.is_cancelled());
    }
}
