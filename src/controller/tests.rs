use std::sync::Arc;
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};

use super::session_controller::*;
use crate::error_handling::types::{ControlError, GatewayError};
use crate::gateway::types::{ControlAck, DeviceList, ScanSummary, StatsSnapshot};
use crate::notification::Severity;
use crate::test_support::*;
use crate::view::types::{CaptureControls, TableTarget};

struct Harness {
    gateway: Arc<MockGateway>,
    renderer: Arc<RecordingRenderer>,
    notifier: Arc<RecordingNotifier>,
    confirmation: Arc<FixedConfirmation>,
    navigator: Arc<RecordingNavigator>,
    controller: CaptureSessionController,
}

fn harness_with(confirm: bool, navigator: RecordingNavigator) -> Harness {
    let gateway = Arc::new(MockGateway::new());
    let renderer = Arc::new(RecordingRenderer::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let confirmation = Arc::new(FixedConfirmation::new(confirm));
    let navigator = Arc::new(navigator);
    let controller = CaptureSessionController::new(
        context(&gateway, &renderer, &notifier),
        confirmation.clone(),
        navigator.clone(),
        ControllerSettings::default(),
    );
    Harness {
        gateway,
        renderer,
        notifier,
        confirmation,
        navigator,
        controller,
    }
}

fn harness() -> Harness {
    harness_with(true, RecordingNavigator::default())
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

fn polled_calls(gateway: &MockGateway) -> [usize; 4] {
    [
        gateway.calls(Endpoint::Stats),
        gateway.calls(Endpoint::ProtocolDistribution),
        gateway.calls(Endpoint::TopTalkers),
        gateway.calls(Endpoint::Packets),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_load_fills_stats_and_devices() {
    let h = harness();
    h.gateway.set_devices(DeviceList {
        devices: MockGateway::sample_devices(2),
    });

    h.controller.load().await;

    assert_eq!(h.renderer.stats_count(), 1);
    assert_eq!(h.renderer.last_stats().unwrap().status.text, "Idle");
    assert_eq!(
        h.renderer
            .last_table(TableTarget::Devices)
            .unwrap()
            .record_count(),
        2
    );
    assert_eq!(h.gateway.calls(Endpoint::Packets), 0);
    assert!(!h.controller.is_polling());
}

#[tokio::test(start_paused = true)]
async fn test_start_capture_begins_polling() {
    let h = harness();

    assert_ok!(h.controller.start_capture().await);

    assert!(h.controller.is_capturing());
    assert!(h.controller.is_polling());
    assert_eq!(
        h.renderer.last_controls(),
        Some(CaptureControls {
            start_enabled: false,
            stop_enabled: true
        })
    );
    assert_eq!(
        h.notifier.messages(),
        vec![(START_SUCCESS.to_string(), Severity::Success)]
    );

    advance(2001).await;
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);
    assert_eq!(h.renderer.last_stats().unwrap().status.text, "Capturing");
}

#[tokio::test(start_paused = true)]
async fn test_double_start_keeps_one_job() {
    let h = harness();

    assert_ok!(h.controller.start_capture().await);
    assert_ok!(h.controller.start_capture().await);
    assert_eq!(h.gateway.calls(Endpoint::Start), 2);

    advance(2001).await;
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);
    advance(2000).await;
    assert_eq!(polled_calls(&h.gateway), [2, 2, 2, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_start_transport_failure_leaves_state() {
    let h = harness();
    h.gateway.fail(Endpoint::Start);

    let err = assert_err!(h.controller.start_capture().await);
    assert!(matches!(err, ControlError::Gateway(GatewayError::Transport(_))));

    assert!(!h.controller.is_capturing());
    assert!(!h.controller.is_polling());
    assert_eq!(h.renderer.last_controls(), None);
    assert_eq!(
        h.notifier.messages(),
        vec![(START_FAILURE.to_string(), Severity::Error)]
    );

    advance(5000).await;
    assert_eq!(polled_calls(&h.gateway), [0, 0, 0, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_start_unexpected_status_is_an_error() {
    let h = harness();
    h.gateway.set_start_ack(ControlAck::default());

    let err = assert_err!(h.controller.start_capture().await);
    assert!(matches!(err, ControlError::UnexpectedResponse { .. }));
    assert!(!h.controller.is_capturing());
    assert!(!h.controller.is_polling());
    assert_eq!(
        h.notifier.messages(),
        vec![(START_FAILURE.to_string(), Severity::Error)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_runs_exactly_one_final_pass() {
    let h = harness();
    assert_ok!(h.controller.start_capture().await);
    advance(2001).await;
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);

    assert_ok!(h.controller.stop_capture().await);
    assert!(!h.controller.is_capturing());
    assert!(!h.controller.is_polling());
    assert_eq!(
        h.renderer.last_controls(),
        Some(CaptureControls::for_capturing(false))
    );

    advance(10).await;
    assert_eq!(polled_calls(&h.gateway), [2, 2, 2, 2]);
    assert_eq!(h.renderer.last_stats().unwrap().status.text, "Idle");

    advance(10_000).await;
    assert_eq!(polled_calls(&h.gateway), [2, 2, 2, 2]);
    assert_eq!(
        h.notifier.messages().last(),
        Some(&(STOP_SUCCESS.to_string(), Severity::Info))
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_first_tick_still_refreshes() {
    let h = harness();
    assert_ok!(h.controller.start_capture().await);
    advance(500).await;

    assert_ok!(h.controller.stop_capture().await);
    advance(10_000).await;
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_capture_tolerates_missing_job() {
    let h = harness();

    assert_ok!(h.controller.stop_capture().await);
    advance(10).await;

    assert!(!h.controller.is_polling());
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_failure_keeps_polling() {
    let h = harness();
    assert_ok!(h.controller.start_capture().await);
    h.gateway.set_stop_ack(ControlAck::with_status("busy"));

    let err = assert_err!(h.controller.stop_capture().await);
    assert!(matches!(err, ControlError::UnexpectedResponse { .. }));
    assert!(h.controller.is_capturing());
    assert!(h.controller.is_polling());
    assert_eq!(
        h.notifier.messages().last(),
        Some(&(STOP_FAILURE.to_string(), Severity::Error))
    );

    advance(2001).await;
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_reset_declined_is_silent() {
    let h = harness_with(false, RecordingNavigator::default());

    let err = assert_err!(h.controller.reset_data().await);
    assert!(matches!(err, ControlError::UserDeclined));

    advance(100).await;
    assert_eq!(h.confirmation.prompts(), vec![RESET_PROMPT.to_string()]);
    assert_eq!(h.gateway.total_calls(), 0);
    assert!(h.notifier.messages().is_empty());
    assert!(h.renderer.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reset_confirmed_refreshes_and_keeps_capture() {
    let h = harness();
    assert_ok!(h.controller.start_capture().await);
    h.gateway.set_stats(StatsSnapshot {
        total_packets: 900,
        total_bytes: 4096,
        active_ips: 4,
        duration_seconds: 30,
        is_capturing: true,
    });
    h.gateway.set_packets(MockGateway::sample_packets(3));

    assert_ok!(h.controller.reset_data().await);
    advance(10).await;

    assert_eq!(h.gateway.calls(Endpoint::Reset), 1);
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);
    assert!(h.controller.is_capturing());
    assert!(h.controller.is_polling());

    let stats = h.renderer.last_stats().unwrap();
    assert_eq!(stats.total_packets, "0");
    assert_eq!(stats.status.text, "Capturing");
    assert!(h
        .renderer
        .last_table(TableTarget::Packets)
        .unwrap()
        .is_empty_state());
    assert_eq!(
        h.notifier.messages().last(),
        Some(&(RESET_SUCCESS.to_string(), Severity::Success))
    );

    advance(2000).await;
    assert_eq!(polled_calls(&h.gateway), [2, 2, 2, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_reset_failure_skips_refresh() {
    let h = harness();
    h.gateway.fail(Endpoint::Reset);

    assert_err!(h.controller.reset_data().await);
    advance(10).await;

    assert_eq!(polled_calls(&h.gateway), [0, 0, 0, 0]);
    assert_eq!(
        h.notifier.messages(),
        vec![(RESET_FAILURE.to_string(), Severity::Error)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_export_is_optimistic() {
    let h = harness();

    assert_ok!(h.controller.export_data());
    assert_eq!(h.navigator.urls(), vec!["http://backend.test/api/export"]);
    assert_eq!(
        h.notifier.messages(),
        vec![(EXPORT_IN_PROGRESS.to_string(), Severity::Info)]
    );

    advance(999).await;
    assert_eq!(h.notifier.messages().len(), 1);

    advance(2).await;
    assert_eq!(
        h.notifier.messages().last(),
        Some(&(EXPORT_SUCCESS.to_string(), Severity::Success))
    );
    assert_eq!(h.gateway.total_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_export_navigation_failure() {
    let h = harness_with(true, RecordingNavigator::broken());

    let err = assert_err!(h.controller.export_data());
    assert!(matches!(err, ControlError::Export(_)));

    advance(5000).await;
    assert_eq!(
        h.notifier.messages(),
        vec![
            (EXPORT_IN_PROGRESS.to_string(), Severity::Info),
            (EXPORT_FAILURE.to_string(), Severity::Error)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_scan_reports_device_count() {
    let h = harness();
    let devices = MockGateway::sample_devices(4);
    h.gateway.set_scan(ScanSummary {
        count: 4,
        devices: devices.clone(),
    });
    h.gateway.set_devices(DeviceList { devices });

    let count = assert_ok!(h.controller.scan_network().await);
    assert_eq!(count, 4);

    assert_eq!(h.renderer.scan_busy_history(), vec![true, false]);
    assert_eq!(
        h.renderer
            .last_table(TableTarget::Devices)
            .unwrap()
            .record_count(),
        4
    );
    assert_eq!(
        h.notifier.messages(),
        vec![
            (SCAN_IN_PROGRESS.to_string(), Severity::Info),
            ("Found 4 devices!".to_string(), Severity::Success)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_scan_failure_restores_controls() {
    let h = harness();
    h.gateway.fail(Endpoint::Scan);

    let err = assert_err!(h.controller.scan_network().await);
    assert!(matches!(err, ControlError::Gateway(_)));

    assert_eq!(h.renderer.scan_busy_history(), vec![true, false]);
    assert_eq!(h.gateway.calls(Endpoint::Devices), 0);
    assert_eq!(
        h.notifier.messages().last(),
        Some(&(SCAN_FAILURE.to_string(), Severity::Error))
    );
}

#[tokio::test(start_paused = true)]
async fn test_scan_does_not_touch_capture_state() {
    let h = harness();
    assert_ok!(h.controller.start_capture().await);

    assert_ok!(h.controller.scan_network().await);
    assert!(h.controller.is_capturing());
    assert!(h.controller.is_polling());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_polling() {
    let h = harness();
    assert_ok!(h.controller.start_capture().await);

    h.controller.shutdown();
    assert!(!h.controller.is_polling());
    assert!(!h.controller.is_capturing());

    advance(10_000).await;
    assert_eq!(polled_calls(&h.gateway), [0, 0, 0, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_recovered_endpoint_is_picked_up_by_next_tick() {
    let h = harness();
    h.gateway.fail(Endpoint::TopTalkers);
    assert_ok!(h.controller.start_capture().await);

    advance(2001).await;
    assert!(h
        .renderer
        .last_chart(crate::view::types::ChartTarget::TopTalkers)
        .is_none());

    h.gateway.recover(Endpoint::TopTalkers);
    advance(2000).await;
    let chart = h
        .renderer
        .last_chart(crate::view::types::ChartTarget::TopTalkers)
        .unwrap();
    assert_eq!(chart.labels, vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(chart.values, vec![12, 3]);
}

#[tokio::test(start_paused = true)]
async fn test_hung_scan_does_not_block_stop() {
    let h = harness();
    h.gateway.delay(Endpoint::Scan, Duration::from_secs(3600));
    let controller = Arc::new(h.controller);
    assert_ok!(controller.start_capture().await);

    let scanning = Arc::clone(&controller);
    let scan = tokio::spawn(async move { scanning.scan_network().await });
    advance(10).await;
    assert_eq!(h.renderer.scan_busy_history(), vec![true]);

    assert_ok!(controller.stop_capture().await);
    assert!(!controller.is_polling());
    assert!(!scan.is_finished());

    advance(60_000).await;
    assert_eq!(h.gateway.calls(Endpoint::Scan), 1);
    assert_eq!(polled_calls(&h.gateway), [1, 1, 1, 1]);
}
