//! Observer registry for classification and matching requests.
//!
//! An explicit object owned by whoever assembles the classifier/matchers and
//! passed in at construction — there is no ambient global list. Monitors run
//! synchronously inline with the request, in registration order; a monitor
//! that panics aborts the request in progress.

use ontoframe_model::Identity;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hooks around reasoning requests. Every method has an empty default so
/// monitors implement only what they observe.
#[allow(unused_variables)]
pub trait ReasoningMonitor: Send + Sync {
    fn on_classify_start(&self, request: u64) {}
    fn on_types_inferred(&self, request: u64, inferred: &BTreeSet<Identity>) {}
    fn on_types_suggested(&self, request: u64, suggested: &BTreeSet<Identity>) {}
    fn on_classify_done(&self, request: u64) {}

    fn on_match_start(&self, request: u64) {}
    fn on_matches_found(&self, request: u64, count: usize) {}
    fn on_match_done(&self, request: u64) {}

    fn on_stop(&self) {}
}

/// Handle returned by [`MonitorRegistry::register`], used to deregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonitorId(u64);

#[derive(Default)]
pub struct MonitorRegistry {
    monitors: RwLock<Vec<(MonitorId, Arc<dyn ReasoningMonitor>)>>,
    next_monitor: AtomicU64,
    next_request: AtomicU64,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, monitor: Arc<dyn ReasoningMonitor>) -> MonitorId {
        let id = MonitorId(self.next_monitor.fetch_add(1, Ordering::SeqCst));
        self.monitors.write().push((id, monitor));
        id
    }

    pub fn deregister(&self, id: MonitorId) -> bool {
        let mut monitors = self.monitors.write();
        let before = monitors.len();
        monitors.retain(|(mid, _)| *mid != id);
        monitors.len() != before
    }

    /// Fire `on_stop` on every monitor, then clear the registry.
    pub fn stop(&self) {
        let drained: Vec<_> = std::mem::take(&mut *self.monitors.write());
        for (_, monitor) in &drained {
            monitor.on_stop();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.read().is_empty()
    }

    pub(crate) fn next_request_id(&self) -> u64 {
        self.next_request.fetch_add(1, Ordering::SeqCst)
    }

    /// Invoke `f` on every registered monitor, in registration order.
    pub(crate) fn notify(&self, f: impl Fn(&dyn ReasoningMonitor)) {
        for (_, monitor) in self.monitors.read().iter() {
            f(monitor.as_ref());
        }
    }
}
