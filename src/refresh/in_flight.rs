use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// The four targets refreshed on every scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTarget {
    Stats,
    ProtocolDistribution,
    TopTalkers,
    Packets,
}

/// Targets whose tick fetch has not come back yet.
///
/// Ticks skip a target that is still pending, so a hung endpoint holds at most one request.
#[derive(Debug, Default)]
pub struct InFlight {
    pending: Mutex<HashSet<RefreshTarget>>,
}

impl InFlight {
    /// Marks `target` as pending. `None` when it already is.
    pub fn try_claim(self: &Arc<Self>, target: RefreshTarget) -> Option<InFlightGuard> {
        if !self.lock().insert(target) {
            return None;
        }
        Some(InFlightGuard {
            owner: Arc::clone(self),
            target,
        })
    }

    pub fn is_pending(&self, target: RefreshTarget) -> bool {
        self.lock().contains(&target)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<RefreshTarget>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases the claim on drop, whether the fetch succeeded, failed or was cancelled.
#[derive(Debug)]
pub struct InFlightGuard {
    owner: Arc<InFlight>,
    target: RefreshTarget,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner.lock().remove(&self.target);
    }
}
