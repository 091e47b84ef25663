use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Lifecycle of one algorithm instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    /// `compute` has not run since construction or the last `reset`.
    #[default]
    NotStarted,
    /// The last `compute` ran to completion.
    Completed,
    /// The last `compute` stopped early because its [`AbortFlag`] was raised.
    /// Whatever output it left behind is partial and must not be trusted.
    Aborted,
}

impl RunState {
    pub fn is_completed(self) -> bool {
        self == RunState::Completed
    }
}

/// Cooperative cancellation flag shared between a running traversal and
/// whoever wants to stop it.
///
/// Engines poll the flag at every loop boundary (dequeue, edge scan,
/// descent), so cancellation takes effect promptly but not instantly.  A
/// caller that needs a timeout polls the clock itself and calls
/// [`AbortFlag::abort`].
#[derive(Clone, Debug, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Lowers the flag so the next run may proceed.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_is_shared_between_clones() {
        let flag = AbortFlag::new();
        let other = flag.clone();
        assert!(!other.is_aborted());
        flag.abort();
        assert!(other.is_aborted());
        other.clear();
        assert!(!flag.is_aborted());
    }

    #[test]
    fn test_default_state() {
        assert_eq!(RunState::default(), RunState::NotStarted);
        assert!(RunState::Completed.is_completed());
        assert!(!RunState::Aborted.is_completed());
    }
}
