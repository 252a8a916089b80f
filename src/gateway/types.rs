//! Wire types exchanged with the capture backend.
//!
//! Every fetch produces a fresh value that replaces the previous one wholesale, nothing here is
//! merged across polls.

use crate::error_handling::types::ControlError;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Aggregate counters returned by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_packets: u64,
    pub total_bytes: u64,
    pub active_ips: u64,
    pub duration_seconds: u64,
    pub is_capturing: bool,
}

/// Packet count per protocol name, in the order the backend listed them.
///
/// The JSON payload is an object whose keys depend on the observed traffic. Entries keep the
/// document order, they are never sorted on the client side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolDistribution {
    pub entries: Vec<(String, u64)>,
}

impl ProtocolDistribution {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'de> Deserialize<'de> for ProtocolDistribution {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = ProtocolDistribution;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of protocol name to packet count")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((protocol, count)) = access.next_entry::<String, u64>()? {
                    entries.push((protocol, count));
                }
                Ok(ProtocolDistribution { entries })
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// One entry of `GET /api/top-talkers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTalker {
    pub ip: String,
    pub count: u64,
}

/// One captured packet as listed by `GET /api/packets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketRecord {
    pub timestamp: String,
    pub source_ip: String,
    pub source_port: u16,
    pub dest_ip: String,
    pub dest_port: u16,
    pub protocol: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
}

/// A device discovered by a network scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub ip: String,
    pub mac: String,
    pub hostname: String,
}

/// Envelope of `GET /api/devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceRecord>,
}

/// Answer of `POST /api/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub count: u64,
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

/// Acknowledgement of the start / stop / reset control endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ControlAck {
    pub fn with_status(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            message: None,
        }
    }

    /// Checks that the backend acknowledged with the `expected` status value.
    pub fn expect_status(&self, expected: &str) -> Result<(), ControlError> {
        match self.status.as_deref() {
            Some(status) if status == expected => Ok(()),
            other => Err(ControlError::UnexpectedResponse {
                expected: expected.to_string(),
                got: other.map(str::to_string),
            }),
        }
    }
}
