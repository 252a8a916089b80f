//! Notification sink with timed expiry.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, error, info, warn};

use super::types::{Notification, Severity};

/// Where refresh and control operations send user-visible messages.
///
/// Fire-and-forget: `notify` never fails and never blocks on the user.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Keeps the currently visible notifications and drops each one after `ttl`.
///
/// The dashboard frame draws [`NotificationCenter::active`]. Every notification is also
/// mirrored to the log, which is the only other place it goes.
pub struct NotificationCenter {
    active: Arc<Mutex<Vec<Notification>>>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            active: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    /// Snapshot of the notifications still on screen, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        lock(&self.active).clone()
    }
}

impl NotificationSink for NotificationCenter {
    fn notify(&self, message: &str, severity: Severity) {
        let notification = Notification::new(message, severity);
        match severity {
            Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Success | Severity::Info => info!("{}", message),
        }

        let id = notification.id;
        lock(&self.active).push(notification);

        let active = Arc::clone(&self.active);
        let ttl = self.ttl;
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    lock(&active).retain(|n| n.id != id);
                });
            }
            Err(_) => debug!("No runtime available, notification {} will not expire", id),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
