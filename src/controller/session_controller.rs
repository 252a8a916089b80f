//! Capture Session Controller
//!
//! The controller is the only owner of the client-side session state and of the refresh
//! scheduler. User actions (start, stop, reset, export, scan) come in here, talk to the backend
//! through the gateway, and decide whether polling runs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌────────────────────────────┐    ┌──────────────────┐
//! │ User action  │───▶│ CaptureSessionController   │───▶│ RefreshScheduler │
//! └──────────────┘    │                            │    │ (single slot)    │
//!                     │ - SessionState             │    └────────┬─────────┘
//!                     │ - one-shot refreshes       │             │ every tick
//!                     └─────────────┬──────────────┘             ▼
//!                                   │                  ┌──────────────────┐
//!                                   └─────────────────▶│ refresh ops      │──▶ renderer
//!                                                      └──────────────────┘──▶ notifications
//! ```
//!
//! Every failure is reported to the notification sink before the method returns, the returned
//! `ControlError` is informational for the caller.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, error, info};

use super::confirmation::ConfirmationGate;
use crate::configuration::Config;
use crate::error_handling::types::{ControlError, GatewayError};
use crate::gateway::types::ControlAck;
use crate::gateway::Navigator;
use crate::notification::Severity;
use crate::refresh::{refresh_device_table, refresh_stats, spawn_full_refresh, DashboardContext};
use crate::scheduler::RefreshScheduler;
use crate::view::types::CaptureControls;
use crate::view::ViewRenderer;

pub const START_SUCCESS: &str = "Packet capture started!";
pub const START_FAILURE: &str = "Failed to start capture";
pub const STOP_SUCCESS: &str = "Packet capture stopped!";
pub const STOP_FAILURE: &str = "Failed to stop capture";
pub const SCAN_IN_PROGRESS: &str = "Scanning network...";
pub const SCAN_FAILURE: &str = "Failed to scan network";
pub const EXPORT_IN_PROGRESS: &str = "Exporting data...";
pub const EXPORT_SUCCESS: &str = "Data exported successfully!";
pub const EXPORT_FAILURE: &str = "Failed to export data";
pub const RESET_SUCCESS: &str = "Data reset successfully!";
pub const RESET_FAILURE: &str = "Failed to reset data";
pub const RESET_PROMPT: &str = "Are you sure you want to reset all data? This cannot be undone.";

/// Client-side capture state.
///
/// `capturing` is true exactly when the controller's scheduler holds a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub capturing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub poll_interval: Duration,
    pub export_feedback_delay: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            export_feedback_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            export_feedback_delay: config.export_feedback_delay(),
        }
    }
}

/// Re-enables the scan control and hides the loading indicator when dropped, whatever way the
/// scan ends.
struct ScanBusyGuard<'a> {
    renderer: &'a dyn ViewRenderer,
}

impl<'a> ScanBusyGuard<'a> {
    fn engage(renderer: &'a dyn ViewRenderer) -> Self {
        renderer.set_scan_busy(true);
        Self { renderer }
    }
}

impl Drop for ScanBusyGuard<'_> {
    fn drop(&mut self) {
        self.renderer.set_scan_busy(false);
    }
}

fn acknowledged(
    response: Result<ControlAck, GatewayError>,
    expected: &str,
) -> Result<(), ControlError> {
    response?.expect_status(expected)
}

/// State and scheduler change together under one lock.
struct Session {
    state: SessionState,
    scheduler: RefreshScheduler,
}

/// Shared as `Arc<CaptureSessionController>` by the front end: every method takes `&self` and
/// the session lock is never held across a backend call, so a hung request leaves the other
/// actions available.
pub struct CaptureSessionController {
    session: Mutex<Session>,
    ctx: DashboardContext,
    confirmation: Arc<dyn ConfirmationGate>,
    navigator: Arc<dyn Navigator>,
    settings: ControllerSettings,
}

impl CaptureSessionController {
    pub fn new(
        ctx: DashboardContext,
        confirmation: Arc<dyn ConfirmationGate>,
        navigator: Arc<dyn Navigator>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            session: Mutex::new(Session {
                state: SessionState::default(),
                scheduler: RefreshScheduler::new(),
            }),
            ctx,
            confirmation,
            navigator,
            settings,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session().state
    }

    pub fn is_capturing(&self) -> bool {
        self.session().state.capturing
    }

    pub fn is_polling(&self) -> bool {
        self.session().scheduler.is_running()
    }

    pub fn context(&self) -> &DashboardContext {
        &self.ctx
    }

    /// Initial fill of the dashboard: stats and device table.
    pub async fn load(&self) {
        info!("Loading initial dashboard state");
        tokio::join!(refresh_stats(&self.ctx), refresh_device_table(&self.ctx));
    }

    pub async fn start_capture(&self) -> Result<(), ControlError> {
        info!("Requesting capture start");
        let response = self.ctx.gateway.start_capture().await;
        if let Err(e) = acknowledged(response, "started") {
            return Err(self.report(START_FAILURE, e));
        }

        {
            let mut session = self.session();
            session.state.capturing = true;
            if !session.scheduler.start(&self.ctx, self.settings.poll_interval) {
                debug!("Capture was already running, keeping the current refresh job");
            }
            debug_assert_eq!(session.state.capturing, session.scheduler.is_running());
        }
        self.ctx
            .renderer
            .set_capture_controls(CaptureControls::for_capturing(true));

        self.ctx.notifier.notify(START_SUCCESS, Severity::Success);
        Ok(())
    }

    pub async fn stop_capture(&self) -> Result<(), ControlError> {
        info!("Requesting capture stop");
        let response = self.ctx.gateway.stop_capture().await;
        if let Err(e) = acknowledged(response, "stopped") {
            return Err(self.report(STOP_FAILURE, e));
        }

        {
            let mut session = self.session();
            session.state.capturing = false;
            session.scheduler.stop();
            debug_assert_eq!(session.state.capturing, session.scheduler.is_running());
        }
        self.ctx
            .renderer
            .set_capture_controls(CaptureControls::for_capturing(false));

        // Last look at the counters, whether or not a tick already ran this cycle
        spawn_full_refresh(&self.ctx);

        self.ctx.notifier.notify(STOP_SUCCESS, Severity::Info);
        Ok(())
    }

    /// Clears all captured data on the backend after a yes/no confirmation.
    ///
    /// Capture state is left alone: the status indicator follows `is_capturing` from the stats
    /// refresh that runs right after the reset.
    pub async fn reset_data(&self) -> Result<(), ControlError> {
        if !self.confirmation.confirm(RESET_PROMPT).await {
            info!("Reset declined by the user");
            return Err(ControlError::UserDeclined);
        }

        info!("Requesting data reset");
        let response = self.ctx.gateway.reset_data().await;
        if let Err(e) = acknowledged(response, "reset") {
            return Err(self.report(RESET_FAILURE, e));
        }

        spawn_full_refresh(&self.ctx);
        self.ctx.notifier.notify(RESET_SUCCESS, Severity::Success);
        Ok(())
    }

    /// Hands the export URL to the navigator and announces success after a fixed delay.
    ///
    /// The success message is optimistic, nothing checks that the download finished.
    pub fn export_data(&self) -> Result<(), ControlError> {
        self.ctx.notifier.notify(EXPORT_IN_PROGRESS, Severity::Info);

        let url = self.ctx.gateway.export_url();
        info!("Exporting capture from {}", url);
        if let Err(e) = self.navigator.navigate(&url) {
            return Err(self.report(EXPORT_FAILURE, e.into()));
        }

        let notifier = Arc::clone(&self.ctx.notifier);
        let delay = self.settings.export_feedback_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.notify(EXPORT_SUCCESS, Severity::Success);
        });
        Ok(())
    }

    /// One-shot network scan. Returns the number of devices the backend reported.
    pub async fn scan_network(&self) -> Result<u64, ControlError> {
        let busy = ScanBusyGuard::engage(self.ctx.renderer.as_ref());
        self.ctx.notifier.notify(SCAN_IN_PROGRESS, Severity::Info);

        info!("Requesting network scan");
        let response = self.ctx.gateway.scan_network().await;
        drop(busy);

        match response {
            Ok(summary) => {
                info!("Network scan found {} devices", summary.count);
                refresh_device_table(&self.ctx).await;
                self.ctx
                    .notifier
                    .notify(&format!("Found {} devices!", summary.count), Severity::Success);
                Ok(summary.count)
            }
            Err(e) => Err(self.report(SCAN_FAILURE, e.into())),
        }
    }

    /// Stops polling for good, used when the dashboard exits.
    pub fn shutdown(&self) {
        let mut session = self.session();
        if session.scheduler.stop() {
            info!("Polling stopped on shutdown");
        }
        session.state.capturing = false;
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn report(&self, message: &str, err: ControlError) -> ControlError {
        error!("{}: {}", message, err);
        self.ctx.notifier.notify(message, Severity::Error);
        err
    }
}
