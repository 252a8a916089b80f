pub mod refresh_scheduler;

pub use refresh_scheduler::{RefreshJobHandle, RefreshScheduler};
