//! In-crate test doubles shared by the unit and scenario tests.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::controller::confirmation::ConfirmationGate;
use crate::error_handling::types::{ExportError, GatewayError};
use crate::gateway::types::*;
use crate::gateway::{BackendGateway, Navigator};
use crate::notification::{NotificationSink, Severity};
use crate::refresh::DashboardContext;
use crate::view::types::*;
use crate::view::ViewRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Stats,
    ProtocolDistribution,
    TopTalkers,
    Packets,
    Devices,
    Start,
    Stop,
    Scan,
    Reset,
}

struct MockState {
    stats: StatsSnapshot,
    distribution: ProtocolDistribution,
    talkers: Vec<TopTalker>,
    packets: Vec<PacketRecord>,
    devices: DeviceList,
    scan: ScanSummary,
    start_ack: ControlAck,
    stop_ack: ControlAck,
    reset_ack: ControlAck,
    calls: HashMap<Endpoint, usize>,
    failing: HashSet<Endpoint>,
    delays: HashMap<Endpoint, Duration>,
}

/// Backend double: canned answers, per-endpoint call counters, injectable failures and delays.
///
/// Start and stop flip `is_capturing` in the stats payload and reset zeroes the counters, the
/// way the real backend does.
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                stats: StatsSnapshot {
                    total_packets: 0,
                    total_bytes: 0,
                    active_ips: 0,
                    duration_seconds: 0,
                    is_capturing: false,
                },
                distribution: ProtocolDistribution {
                    entries: vec![("TCP".to_string(), 10), ("UDP".to_string(), 5)],
                },
                talkers: vec![
                    TopTalker {
                        ip: "10.0.0.1".to_string(),
                        count: 12,
                    },
                    TopTalker {
                        ip: "10.0.0.2".to_string(),
                        count: 3,
                    },
                ],
                packets: Vec::new(),
                devices: DeviceList::default(),
                scan: ScanSummary {
                    count: 0,
                    devices: Vec::new(),
                },
                start_ack: ControlAck::with_status("started"),
                stop_ack: ControlAck::with_status("stopped"),
                reset_ack: ControlAck::with_status("reset"),
                calls: HashMap::new(),
                failing: HashSet::new(),
                delays: HashMap::new(),
            }),
        }
    }

    pub fn sample_devices(n: usize) -> Vec<DeviceRecord> {
        (1..=n)
            .map(|i| DeviceRecord {
                ip: format!("192.168.1.{}", i),
                mac: format!("aa:bb:cc:dd:ee:{:02x}", i),
                hostname: format!("device-{}", i),
            })
            .collect()
    }

    pub fn sample_packets(n: usize) -> Vec<PacketRecord> {
        (1..=n)
            .map(|i| PacketRecord {
                timestamp: format!("2024-05-01 10:00:{:02}.000", i),
                source_ip: format!("10.0.0.{}", i),
                source_port: 40000 + i as u16,
                dest_ip: "10.0.0.254".to_string(),
                dest_port: 53,
                protocol: "DNS".to_string(),
                size_bytes: 80,
            })
            .collect()
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.state().calls.get(&endpoint).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.state().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state().failing.remove(&endpoint);
    }

    pub fn delay(&self, endpoint: Endpoint, delay: Duration) {
        self.state().delays.insert(endpoint, delay);
    }

    pub fn set_stats(&self, stats: StatsSnapshot) {
        self.state().stats = stats;
    }

    pub fn set_packets(&self, packets: Vec<PacketRecord>) {
        self.state().packets = packets;
    }

    pub fn set_devices(&self, devices: DeviceList) {
        self.state().devices = devices;
    }

    pub fn set_scan(&self, scan: ScanSummary) {
        self.state().scan = scan;
    }

    pub fn set_start_ack(&self, ack: ControlAck) {
        self.state().start_ack = ack;
    }

    pub fn set_stop_ack(&self, ack: ControlAck) {
        self.state().stop_ack = ack;
    }

    pub fn set_reset_ack(&self, ack: ControlAck) {
        self.state().reset_ack = ack;
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    async fn enter(&self, endpoint: Endpoint) -> Result<(), GatewayError> {
        let delay = {
            let mut state = self.state();
            *state.calls.entry(endpoint).or_insert(0) += 1;
            state.delays.get(&endpoint).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.state().failing.contains(&endpoint) {
            return Err(GatewayError::Transport(format!("{:?} unreachable", endpoint)));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, GatewayError> {
        self.enter(Endpoint::Stats).await?;
        Ok(self.state().stats.clone())
    }

    async fn fetch_protocol_distribution(&self) -> Result<ProtocolDistribution, GatewayError> {
        self.enter(Endpoint::ProtocolDistribution).await?;
        Ok(self.state().distribution.clone())
    }

    async fn fetch_top_talkers(&self) -> Result<Vec<TopTalker>, GatewayError> {
        self.enter(Endpoint::TopTalkers).await?;
        Ok(self.state().talkers.clone())
    }

    async fn fetch_packets(&self) -> Result<Vec<PacketRecord>, GatewayError> {
        self.enter(Endpoint::Packets).await?;
        Ok(self.state().packets.clone())
    }

    async fn fetch_devices(&self) -> Result<DeviceList, GatewayError> {
        self.enter(Endpoint::Devices).await?;
        Ok(self.state().devices.clone())
    }

    async fn start_capture(&self) -> Result<ControlAck, GatewayError> {
        self.enter(Endpoint::Start).await?;
        let mut state = self.state();
        state.stats.is_capturing = true;
        Ok(state.start_ack.clone())
    }

    async fn stop_capture(&self) -> Result<ControlAck, GatewayError> {
        self.enter(Endpoint::Stop).await?;
        let mut state = self.state();
        state.stats.is_capturing = false;
        Ok(state.stop_ack.clone())
    }

    async fn scan_network(&self) -> Result<ScanSummary, GatewayError> {
        self.enter(Endpoint::Scan).await?;
        Ok(self.state().scan.clone())
    }

    async fn reset_data(&self) -> Result<ControlAck, GatewayError> {
        self.enter(Endpoint::Reset).await?;
        let mut state = self.state();
        state.stats.total_packets = 0;
        state.stats.total_bytes = 0;
        state.stats.active_ips = 0;
        state.stats.duration_seconds = 0;
        state.packets.clear();
        Ok(state.reset_ack.clone())
    }

    fn export_url(&self) -> String {
        "http://backend.test/api/export".to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Stats(StatsView),
    Chart(ChartTarget, ChartUpdate),
    Table(TableTarget, TableBody),
    Controls(CaptureControls),
    ScanBusy(bool),
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last_stats(&self) -> Option<StatsView> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Stats(s) => Some(s),
            _ => None,
        })
    }

    pub fn stats_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, RenderEvent::Stats(_)))
            .count()
    }

    pub fn last_chart(&self, target: ChartTarget) -> Option<ChartUpdate> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Chart(t, update) if t == target => Some(update),
            _ => None,
        })
    }

    pub fn last_table(&self, target: TableTarget) -> Option<TableBody> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Table(t, body) if t == target => Some(body),
            _ => None,
        })
    }

    pub fn table_count(&self, target: TableTarget) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, RenderEvent::Table(t, _) if *t == target))
            .count()
    }

    pub fn last_controls(&self) -> Option<CaptureControls> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Controls(c) => Some(c),
            _ => None,
        })
    }

    pub fn scan_busy_history(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RenderEvent::ScanBusy(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ViewRenderer for RecordingRenderer {
    fn render_stats(&self, stats: &StatsView) {
        self.push(RenderEvent::Stats(stats.clone()));
    }

    fn render_chart(&self, target: ChartTarget, update: &ChartUpdate) {
        self.push(RenderEvent::Chart(target, update.clone()));
    }

    fn render_table(&self, target: TableTarget, body: &TableBody) {
        self.push(RenderEvent::Table(target, body.clone()));
    }

    fn set_capture_controls(&self, controls: CaptureControls) {
        self.push(RenderEvent::Controls(controls));
    }

    fn set_scan_busy(&self, busy: bool) {
        self.push(RenderEvent::ScanBusy(busy));
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

/// Confirmation gate with a fixed answer that remembers what it was asked.
pub struct FixedConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl FixedConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationGate for FixedConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    urls: Mutex<Vec<String>>,
    broken: bool,
}

impl RecordingNavigator {
    pub fn broken() -> Self {
        Self {
            urls: Mutex::new(Vec::new()),
            broken: true,
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> Result<(), ExportError> {
        if self.broken {
            return Err(ExportError::Download("navigation refused".to_string()));
        }
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn context(
    gateway: &Arc<MockGateway>,
    renderer: &Arc<RecordingRenderer>,
    notifier: &Arc<RecordingNotifier>,
) -> DashboardContext {
    DashboardContext::new(gateway.clone(), renderer.clone(), notifier.clone())
}

/// Flattens a terminal buffer into text, one line per row.
pub fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buffer.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

/// Serves exactly one HTTP response on an ephemeral local port.
pub async fn serve_once(status: &str, headers: &[(&str, &str)], body: &str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");
    response.push_str(body);

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    addr
}
