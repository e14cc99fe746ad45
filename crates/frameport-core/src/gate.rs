//! Single-resolution readiness gate.
//!
//! The gate starts pending and resolves at most once. Any number of callers
//! can wait on it; all of them observe the same resolved value, and resolving
//! again has no effect. Built on a `tokio::sync::watch` channel, which needs
//! no runtime and wakes every waiter on the one transition.

use std::future::Future;

use tokio::sync::watch;

/// A value that becomes available exactly once.
#[derive(Debug)]
pub struct ReadinessGate<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> ReadinessGate<T> {
    /// Create a pending gate.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Whether the gate has resolved.
    pub fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Resolved value, if any.
    pub fn value(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Resolve the gate.
    ///
    /// Returns `true` if this call resolved it, `false` if it was already
    /// resolved (in which case `value` is discarded).
    pub fn resolve(&self, value: T) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        })
    }
}

impl<T: Clone + Send + Sync + 'static> ReadinessGate<T> {
    /// Wait for the gate to resolve.
    ///
    /// The returned future does not borrow the gate. If the gate is dropped
    /// while still pending, the future never completes.
    pub fn wait(&self) -> impl Future<Output = T> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            loop {
                let current = rx.borrow_and_update().clone();
                if let Some(value) = current {
                    return value;
                }
                if rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        }
    }
}

impl<T: Clone> Default for ReadinessGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn resolves_once() {
        let gate = ReadinessGate::new();
        assert!(!gate.is_resolved());
        assert_eq!(gate.value(), None);

        assert!(gate.resolve(1));
        assert!(!gate.resolve(2));

        assert!(gate.is_resolved());
        assert_eq!(gate.value(), Some(1));
    }

    #[tokio::test]
    async fn waiters_see_the_first_value() {
        let gate = ReadinessGate::new();
        let first = gate.wait();
        let second = gate.wait();

        gate.resolve("ready");
        gate.resolve("again");

        assert_eq!(first.await, "ready");
        assert_eq!(second.await, "ready");
    }

    #[tokio::test]
    async fn wait_after_resolution_completes_immediately() {
        let gate = ReadinessGate::new();
        gate.resolve(7u32);
        assert_eq!(gate.wait().await, 7);
    }

    #[tokio::test]
    async fn pending_gate_never_completes() {
        let gate = ReadinessGate::<u32>::new();
        let waited = tokio::time::timeout(Duration::from_millis(20), gate.wait()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn dropped_pending_gate_keeps_waiter_pending() {
        let gate = ReadinessGate::<u32>::new();
        let waiter = gate.wait();
        drop(gate);

        let waited = tokio::time::timeout(Duration::from_millis(20), waiter).await;
        assert!(waited.is_err());
    }
}
