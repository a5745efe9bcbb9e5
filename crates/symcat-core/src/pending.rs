//! Settle-once result shared between a refresh cycle and its waiters.

use std::sync::Arc;

use tokio::sync::watch;

/// A value that is settled exactly once and observed by any number of
/// waiters. Waiters arriving after settlement resolve immediately.
#[derive(Debug)]
pub struct PendingResult<T> {
    slot: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for PendingResult<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for PendingResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PendingResult<T> {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Stores `value` and wakes every waiter. Returns false, dropping
    /// `value`, when the slot was already settled.
    pub fn settle(&self, value: T) -> bool {
        let mut value = Some(value);
        self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = value.take();
            true
        })
    }

    pub fn is_settled(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// True when both handles observe the same slot.
    pub fn same_slot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T: Clone> PendingResult<T> {
    /// Suspends until the slot is settled and returns the settled value.
    pub async fn wait(&self) -> Option<T> {
        let mut receiver = self.slot.subscribe();
        let settled = receiver.wait_for(Option::is_some).await.ok()?;
        (*settled).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn waiter_after_settlement_resolves_immediately() {
        let pending = PendingResult::new();

        assert!(pending.settle(7_u32));

        assert!(pending.is_settled());
        assert_eq!(pending.wait().await, Some(7));
    }

    #[tokio::test]
    async fn only_first_settlement_counts() {
        let pending = PendingResult::new();

        assert!(pending.settle("first"));
        assert!(!pending.settle("second"));

        assert_eq!(pending.wait().await, Some("first"));
    }

    #[tokio::test]
    async fn concurrent_waiters_observe_same_value() {
        let pending = PendingResult::<Arc<String>>::new();
        let waiters = (0..4)
            .map(|_| {
                let pending = pending.clone();
                tokio::spawn(async move { pending.wait().await })
            })
            .collect::<Vec<_>>();

        tokio::task::yield_now().await;
        pending.settle(Arc::new(String::from("catalog")));

        for waiter in waiters {
            let value = waiter.await.expect("waiter joins").expect("value settled");
            assert_eq!(value.as_str(), "catalog");
        }
    }

    #[test]
    fn clones_share_one_slot() {
        let pending = PendingResult::<u8>::new();
        let other = pending.clone();

        assert!(pending.same_slot(&other));
        assert!(!pending.same_slot(&PendingResult::new()));
    }
}
