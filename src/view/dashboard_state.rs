//! Widget state of the terminal dashboard.
//!
//! [`TuiRenderer`] is the [`ViewRenderer`] the refresh operations talk to. It only swaps the
//! content of the addressed widget and wakes the frame loop, which then redraws the whole
//! screen from a [`DashboardState`] snapshot. Nothing from an earlier render survives on
//! screen once its widget has been replaced.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;

use super::builders::{device_table, packet_table};
use super::renderer::ViewRenderer;
use super::types::*;

/// Chart widget state. Updating it always replaces labels and values together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
    kind: ChartKind,
    labels: Vec<String>,
    values: Vec<u64>,
}

impl ChartHandle {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn replace(&mut self, update: &ChartUpdate) {
        self.kind = update.kind;
        self.labels = update.labels.clone();
        self.values = update.values.clone();
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, value, percent of total)` rows, the way a pie chart legend reads.
    pub fn shares(&self) -> Vec<(&str, u64, f64)> {
        let total: u64 = self.values.iter().sum();
        self.labels
            .iter()
            .zip(&self.values)
            .map(|(label, value)| {
                let share = if total == 0 {
                    0.0
                } else {
                    *value as f64 * 100.0 / total as f64
                };
                (label.as_str(), *value, share)
            })
            .collect()
    }
}

/// Everything the dashboard frame shows, apart from notifications and overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub stats: Option<StatsView>,
    pub protocol_chart: ChartHandle,
    pub talkers_chart: ChartHandle,
    pub packets: TableBody,
    pub devices: TableBody,
    pub controls: CaptureControls,
    pub scan_busy: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            stats: None,
            protocol_chart: ChartHandle::new(ChartKind::Pie),
            talkers_chart: ChartHandle::new(ChartKind::Bar),
            packets: packet_table(&[]),
            devices: device_table(&[]),
            controls: CaptureControls::for_capturing(false),
            scan_busy: false,
        }
    }
}

impl DashboardState {
    pub fn chart(&self, target: ChartTarget) -> &ChartHandle {
        match target {
            ChartTarget::ProtocolDistribution => &self.protocol_chart,
            ChartTarget::TopTalkers => &self.talkers_chart,
        }
    }

    pub fn table(&self, target: TableTarget) -> &TableBody {
        match target {
            TableTarget::Packets => &self.packets,
            TableTarget::Devices => &self.devices,
        }
    }
}

#[derive(Default)]
pub struct TuiRenderer {
    state: Mutex<DashboardState>,
    changed: Notify,
}

impl TuiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.lock().clone()
    }

    /// Resolves once something was rendered since the last wake-up. Several renders in a row
    /// coalesce into a single wake-up.
    pub async fn changed(&self) {
        self.changed.notified().await
    }

    fn update(&self, apply: impl FnOnce(&mut DashboardState)) {
        apply(&mut self.lock());
        self.changed.notify_one();
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ViewRenderer for TuiRenderer {
    fn render_stats(&self, stats: &StatsView) {
        self.update(|state| state.stats = Some(stats.clone()));
    }

    fn render_chart(&self, target: ChartTarget, update: &ChartUpdate) {
        self.update(|state| match target {
            ChartTarget::ProtocolDistribution => state.protocol_chart.replace(update),
            ChartTarget::TopTalkers => state.talkers_chart.replace(update),
        });
    }

    fn render_table(&self, target: TableTarget, body: &TableBody) {
        self.update(|state| match target {
            TableTarget::Packets => state.packets = body.clone(),
            TableTarget::Devices => state.devices = body.clone(),
        });
    }

    fn set_capture_controls(&self, controls: CaptureControls) {
        self.update(|state| state.controls = controls);
    }

    fn set_scan_busy(&self, busy: bool) {
        self.update(|state| state.scan_busy = busy);
    }
}
