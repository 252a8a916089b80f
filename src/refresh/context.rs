use std::sync::Arc;

use super::in_flight::InFlight;
use crate::gateway::BackendGateway;
use crate::notification::NotificationSink;
use crate::view::ViewRenderer;

/// Collaborators shared by every refresh operation.
///
/// Cloning only bumps reference counts, so each scheduler tick or one-shot refresh can take its
/// own copy into a spawned task. Clones share the same [`InFlight`] bookkeeping.
#[derive(Clone)]
pub struct DashboardContext {
    pub gateway: Arc<dyn BackendGateway>,
    pub renderer: Arc<dyn ViewRenderer>,
    pub notifier: Arc<dyn NotificationSink>,
    pub in_flight: Arc<InFlight>,
}

impl DashboardContext {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        renderer: Arc<dyn ViewRenderer>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            gateway,
            renderer,
            notifier,
            in_flight: Arc::new(InFlight::default()),
        }
    }
}
