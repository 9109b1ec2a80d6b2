//! Network reachability as pushed by an external monitor.
//!
//! The client never polls. A platform monitor calls
//! [`CloudClient::report_reachability`](crate::CloudClient::report_reachability)
//! and the registered [`ClientDelegate`] is told about every change.

use std::sync::{Arc, RwLock};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReachabilityStatus {
    #[default]
    Unknown,
    NotReachable,
    ReachableEthernetOrWiFi,
    ReachableCellular,
}

impl ReachabilityStatus {
    pub fn is_reachable(self) -> bool {
        matches!(
            self,
            ReachabilityStatus::ReachableEthernetOrWiFi | ReachabilityStatus::ReachableCellular
        )
    }
}

/// Hooks the embedding application may implement. Every method has a no-op default.
pub trait ClientDelegate: Send + Sync {
    fn network_reachability_changed(&self, _status: ReachabilityStatus) {}
}

/// Last reported status plus the delegate to notify. Clones share state.
#[derive(Clone, Default)]
pub struct Reachability {
    status: Arc<RwLock<ReachabilityStatus>>,
    delegate: Arc<RwLock<Option<Arc<dyn ClientDelegate>>>>,
}

impl std::fmt::Debug for Reachability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reachability")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl Reachability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_delegate(&self, delegate: Option<Arc<dyn ClientDelegate>>) {
        if let Ok(mut guard) = self.delegate.write() {
            *guard = delegate;
        }
    }

    pub fn status(&self) -> ReachabilityStatus {
        self.status.read().map(|s| *s).unwrap_or_default()
    }

    /// Record `status` and notify the delegate. Every report is forwarded,
    /// repeated ones included.
    pub fn report(&self, status: ReachabilityStatus) {
        if let Ok(mut guard) = self.status.write() {
            *guard = status;
        }
        debug!(?status, "network reachability changed");

        let delegate = self.delegate.read().ok().and_then(|d| d.clone());
        if let Some(delegate) = delegate {
            delegate.network_reachability_changed(status);
        }
    }
}
