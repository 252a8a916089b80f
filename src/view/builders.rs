//! Pure functions from backend payloads to render instructions.

use super::format::{format_count, format_duration, format_megabytes, status_label};
use super::types::*;
use crate::gateway::types::{
    DeviceRecord, PacketRecord, ProtocolDistribution, StatsSnapshot, TopTalker,
};

pub fn stats_view(stats: &StatsSnapshot) -> StatsView {
    StatsView {
        total_packets: format_count(stats.total_packets),
        total_data: format_megabytes(stats.total_bytes),
        active_ips: stats.active_ips.to_string(),
        duration: format_duration(stats.duration_seconds),
        status: status_label(stats.is_capturing),
    }
}

/// Pie chart in the backend's key order.
pub fn protocol_chart(distribution: &ProtocolDistribution) -> ChartUpdate {
    let (labels, values) = distribution.entries.iter().cloned().unzip();
    ChartUpdate {
        kind: ChartKind::Pie,
        labels,
        values,
    }
}

/// Bar chart in the order the backend ranked the talkers.
pub fn talkers_chart(talkers: &[TopTalker]) -> ChartUpdate {
    ChartUpdate {
        kind: ChartKind::Bar,
        labels: talkers.iter().map(|t| t.ip.clone()).collect(),
        values: talkers.iter().map(|t| t.count).collect(),
    }
}

/// Packet table, most recent first.
///
/// The backend lists packets oldest first, so the display order is simply the reverse of the
/// response order.
pub fn packet_table(packets: &[PacketRecord]) -> TableBody {
    if packets.is_empty() {
        return TableBody::empty_state(PACKETS_EMPTY_MESSAGE, PACKET_COLUMNS);
    }

    let rows = packets
        .iter()
        .rev()
        .map(|p| {
            TableRow::Record(vec![
                p.timestamp.clone(),
                p.source_ip.clone(),
                p.source_port.to_string(),
                p.dest_ip.clone(),
                p.dest_port.to_string(),
                p.protocol.clone(),
                format!("{} B", p.size_bytes),
            ])
        })
        .collect();
    TableBody { rows }
}

pub fn device_table(devices: &[DeviceRecord]) -> TableBody {
    if devices.is_empty() {
        return TableBody::empty_state(DEVICES_EMPTY_MESSAGE, DEVICE_COLUMNS);
    }

    let rows = devices
        .iter()
        .map(|d| TableRow::Record(vec![d.ip.clone(), d.mac.clone(), d.hostname.clone()]))
        .collect();
    TableBody { rows }
}
