use super::types::{CaptureControls, ChartTarget, ChartUpdate, StatsView, TableBody, TableTarget};

/// Presentation side of the dashboard.
///
/// Implementations own whatever widgets they draw with (chart handles included). Calls are
/// idempotent: rendering the same instruction twice displays the same thing.
pub trait ViewRenderer: Send + Sync {
    fn render_stats(&self, stats: &StatsView);

    /// Replaces labels and values of `target` with the content of `update`.
    fn render_chart(&self, target: ChartTarget, update: &ChartUpdate);

    /// Replaces the whole body of `target`.
    fn render_table(&self, target: TableTarget, body: &TableBody);

    fn set_capture_controls(&self, controls: CaptureControls);

    /// Disables the scan control and shows the loading indicator while `busy`.
    fn set_scan_busy(&self, busy: bool);
}
