//! HTTP implementation of [`BackendGateway`] on top of `reqwest`.

use async_trait::async_trait;
use log::trace;
use serde::de::DeserializeOwned;

use crate::error_handling::types::GatewayError;
use crate::gateway::backend::BackendGateway;
use crate::gateway::types::{
    ControlAck, DeviceList, PacketRecord, ProtocolDistribution, ScanSummary, StatsSnapshot,
    TopTalker,
};

pub const STATS_PATH: &str = "/api/stats";
pub const PROTOCOL_DIST_PATH: &str = "/api/protocol-dist";
pub const TOP_TALKERS_PATH: &str = "/api/top-talkers";
pub const PACKETS_PATH: &str = "/api/packets";
pub const DEVICES_PATH: &str = "/api/devices";
pub const START_PATH: &str = "/api/start";
pub const STOP_PATH: &str = "/api/stop";
pub const SCAN_PATH: &str = "/api/scan";
pub const EXPORT_PATH: &str = "/api/export";
pub const RESET_PATH: &str = "/api/reset";

/// Talks JSON over HTTP to the capture backend.
///
/// No request timeout is set: a hung call only stalls the view target that issued it.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("capview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.endpoint(path);
        trace!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        read_body(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.endpoint(path);
        trace!("POST {}", url);
        let response = self.client.post(&url).send().await?;
        read_body(response).await
    }
}

async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        return Err(GatewayError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    decode_body(&bytes)
}

/// Decodes a JSON response body into one of the wire types.
pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, GatewayError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError> {
        self.get_json(STATS_PATH).await
    }

    async fn fetch_protocol_distribution(&self) -> Result<ProtocolDistribution, GatewayError> {
        self.get_json(PROTOCOL_DIST_PATH).await
    }

    async fn fetch_top_talkers(&self) -> Result<Vec<TopTalker>, GatewayError> {
        self.get_json(TOP_TALKERS_PATH).await
    }

    async fn fetch_packets(&self) -> Result<Vec<PacketRecord>, GatewayError> {
        self.get_json(PACKETS_PATH).await
    }

    async fn fetch_devices(&self) -> Result<DeviceList, GatewayError> {
        self.get_json(DEVICES_PATH).await
    }

    async fn start_capture(&self) -> Result<ControlAck, GatewayError> {
        self.post_json(START_PATH).await
    }

    async fn stop_capture(&self) -> Result<ControlAck, GatewayError> {
        self.post_json(STOP_PATH).await
    }

    async fn scan_network(&self) -> Result<ScanSummary, GatewayError> {
        self.post_json(SCAN_PATH).await
    }

    async fn reset_data(&self) -> Result<ControlAck, GatewayError> {
        self.post_json(RESET_PATH).await
    }

    fn export_url(&self) -> String {
        self.endpoint(EXPORT_PATH)
    }
}
