//! Backend Gateway trait
//!
//! This module defines the `BackendGateway` trait, the fixed contract between the dashboard and
//! the packet-capture backend.
//!
//! Implementors of this trait are responsible for:
//! - Fetching the polled views (stats, protocol distribution, top talkers, packets)
//! - Fetching the device list
//! - Issuing the control requests (start, stop, scan, reset)
//! - Telling where the export download lives
//!
//! All methods return a `Result` so the caller decides how a failure is surfaced.

use async_trait::async_trait;

use crate::error_handling::types::GatewayError;
use crate::gateway::types::{
    ControlAck, DeviceList, PacketRecord, ProtocolDistribution, ScanSummary, StatsSnapshot,
    TopTalker,
};

/// Request/response contract of the capture backend.
///
/// Shared as `Arc<dyn BackendGateway>` between the controller, the scheduler ticks and the
/// one-shot refreshes, hence the `Send + Sync` bound.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// `GET /api/stats`
    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError>;

    /// `GET /api/protocol-dist`
    async fn fetch_protocol_distribution(&self) -> Result<ProtocolDistribution, GatewayError>;

    /// `GET /api/top-talkers`
    async fn fetch_top_talkers(&self) -> Result<Vec<TopTalker>, GatewayError>;

    /// `GET /api/packets`
    async fn fetch_packets(&self) -> Result<Vec<PacketRecord>, GatewayError>;

    /// `GET /api/devices`
    async fn fetch_devices(&self) -> Result<DeviceList, GatewayError>;

    /// `POST /api/start`
    async fn start_capture(&self) -> Result<ControlAck, GatewayError>;

    /// `POST /api/stop`
    async fn stop_capture(&self) -> Result<ControlAck, GatewayError>;

    /// `POST /api/scan`
    async fn scan_network(&self) -> Result<ScanSummary, GatewayError>;

    /// `POST /api/reset`
    async fn reset_data(&self) -> Result<ControlAck, GatewayError>;

    /// Absolute URL of `GET /api/export`. Export is a navigation, not a fetch.
    fn export_url(&self) -> String;
}
