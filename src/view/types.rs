//! Render instructions handed to a [`ViewRenderer`](super::renderer::ViewRenderer).
//!
//! These are plain data. Every instruction describes the complete new content of its target,
//! a renderer never has to merge it with what it displayed before.

pub const CAPTURING_COLOR: &str = "#10b981";
pub const IDLE_COLOR: &str = "#f59e0b";

pub const PACKETS_EMPTY_MESSAGE: &str = "No packets captured yet";
pub const DEVICES_EMPTY_MESSAGE: &str = "Click \"Scan Network\" to discover devices";
pub const PACKET_COLUMNS: usize = 7;
pub const DEVICE_COLUMNS: usize = 3;

/// Text and color of the capture status indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLabel {
    pub text: String,
    pub color: String,
}

/// Formatted aggregate counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub total_packets: String,
    pub total_data: String,
    pub active_ips: String,
    pub duration: String,
    pub status: StatusLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartTarget {
    ProtocolDistribution,
    TopTalkers,
}

/// Full replacement of a chart's labels and values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartUpdate {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableTarget {
    Packets,
    Devices,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Record(Vec<String>),
    EmptyState { message: String, colspan: usize },
}

/// The whole body of a table, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBody {
    pub rows: Vec<TableRow>,
}

impl TableBody {
    pub fn empty_state(message: &str, colspan: usize) -> Self {
        Self {
            rows: vec![TableRow::EmptyState {
                message: message.to_string(),
                colspan,
            }],
        }
    }

    pub fn is_empty_state(&self) -> bool {
        matches!(self.rows.as_slice(), [TableRow::EmptyState { .. }])
    }

    /// Number of per-record rows, the empty-state placeholder excluded.
    pub fn record_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, TableRow::Record(_)))
            .count()
    }
}

/// Enabled state of the start / stop controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureControls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl CaptureControls {
    pub fn for_capturing(capturing: bool) -> Self {
        Self {
            start_enabled: !capturing,
            stop_enabled: capturing,
        }
    }
}
