//! Single-slot recurring refresh.
//!
//! ```text
//!            start()                      stop()
//!   Idle ─────────────▶ Running(handle) ─────────▶ Idle
//!                         │    ▲
//!                         └────┘ start() is a no-op
//! ```
//!
//! Every tick spawns a detached refresh pass. Cancelling the job stops future ticks only: a
//! pass already spawned keeps running and applies its result. A target whose fetch from an
//! earlier tick is still pending is skipped, so a hung endpoint does not pile up requests.

use std::time::Duration;

use log::{debug, info, trace};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::refresh::{spawn_tick_refresh, DashboardContext};

/// Owns the ticker task of one recurring refresh job. Dropping the handle cancels the job.
pub struct RefreshJobHandle {
    id: Uuid,
    period: Duration,
    task: JoinHandle<()>,
}

impl RefreshJobHandle {
    fn spawn(ctx: DashboardContext, period: Duration) -> Self {
        let id = Uuid::new_v4();
        let task = tokio::spawn(async move {
            // First tick one full period after start, like a browser interval timer
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                trace!("[{}] refresh tick", id);
                spawn_tick_refresh(&ctx);
            }
        });
        Self { id, period, task }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for RefreshJobHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Holds at most one [`RefreshJobHandle`].
///
/// On a current-thread runtime `stop` is deterministic: the ticker is never polled again once
/// it returns.
#[derive(Default)]
pub struct RefreshScheduler {
    job: Option<RefreshJobHandle>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self { job: None }
    }

    /// Starts the recurring job. Returns `false` and leaves the running job alone if there is
    /// one already.
    pub fn start(&mut self, ctx: &DashboardContext, period: Duration) -> bool {
        if let Some(job) = &self.job {
            debug!("Refresh job {} already running, not starting another", job.id());
            return false;
        }
        let job = RefreshJobHandle::spawn(ctx.clone(), period);
        info!("Refresh job {} started, period {:?}", job.id(), period);
        self.job = Some(job);
        true
    }

    /// Cancels the recurring job. Returns `false` when there was none.
    pub fn stop(&mut self) -> bool {
        match self.job.take() {
            Some(job) => {
                info!("Refresh job {} stopped", job.id());
                true
            }
            None => {
                debug!("No refresh job to stop");
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.job.is_some()
    }

    pub fn job_id(&self) -> Option<Uuid> {
        self.job.as_ref().map(RefreshJobHandle::id)
    }
}
