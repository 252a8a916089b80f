//! Transient user-visible messages.

pub mod notification_center;
pub mod types;

pub use notification_center::{NotificationCenter, NotificationSink};
pub use types::{Notification, Severity};
