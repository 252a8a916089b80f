//! Data refresh operations.
//!
//! Each operation is fetch -> decode -> build render instruction -> render, and only touches its
//! own view target. Failures never escape: they are logged and turned into an error
//! notification, so one broken endpoint cannot stop its siblings or the next tick.

use std::future::Future;

use log::{debug, trace, warn};
use tokio::task::JoinHandle;

use super::context::DashboardContext;
use super::in_flight::{InFlightGuard, RefreshTarget};
use crate::error_handling::types::GatewayError;
use crate::notification::Severity;
use crate::view::builders::{device_table, packet_table, protocol_chart, stats_view, talkers_chart};
use crate::view::types::{ChartTarget, TableTarget};

pub const STATS_FAILURE: &str = "Failed to update statistics";
pub const PROTOCOL_FAILURE: &str = "Failed to update protocol distribution";
pub const TALKERS_FAILURE: &str = "Failed to update top talkers";
pub const PACKETS_FAILURE: &str = "Failed to update packet table";
pub const DEVICES_FAILURE: &str = "Failed to update device table";

fn report(ctx: &DashboardContext, what: &str, err: GatewayError) {
    warn!("{}: {}", what, err);
    ctx.notifier.notify(what, Severity::Error);
}

pub async fn refresh_stats(ctx: &DashboardContext) {
    match ctx.gateway.fetch_stats().await {
        Ok(stats) => {
            trace!("Stats: {:?}", stats);
            ctx.renderer.render_stats(&stats_view(&stats));
        }
        Err(e) => report(ctx, STATS_FAILURE, e),
    }
}

pub async fn refresh_protocol_distribution(ctx: &DashboardContext) {
    match ctx.gateway.fetch_protocol_distribution().await {
        Ok(distribution) => {
            trace!("Protocol distribution: {} protocols", distribution.len());
            ctx.renderer
                .render_chart(ChartTarget::ProtocolDistribution, &protocol_chart(&distribution));
        }
        Err(e) => report(ctx, PROTOCOL_FAILURE, e),
    }
}

pub async fn refresh_top_talkers(ctx: &DashboardContext) {
    match ctx.gateway.fetch_top_talkers().await {
        Ok(talkers) => {
            trace!("Top talkers: {} entries", talkers.len());
            ctx.renderer
                .render_chart(ChartTarget::TopTalkers, &talkers_chart(&talkers));
        }
        Err(e) => report(ctx, TALKERS_FAILURE, e),
    }
}

pub async fn refresh_packet_table(ctx: &DashboardContext) {
    match ctx.gateway.fetch_packets().await {
        Ok(packets) => {
            trace!("Packets: {} records", packets.len());
            ctx.renderer
                .render_table(TableTarget::Packets, &packet_table(&packets));
        }
        Err(e) => report(ctx, PACKETS_FAILURE, e),
    }
}

pub async fn refresh_device_table(ctx: &DashboardContext) {
    match ctx.gateway.fetch_devices().await {
        Ok(list) => {
            trace!("Devices: {} records", list.devices.len());
            ctx.renderer
                .render_table(TableTarget::Devices, &device_table(&list.devices));
        }
        Err(e) => report(ctx, DEVICES_FAILURE, e),
    }
}

/// Runs the four polled refreshes (stats, protocol distribution, top talkers, packet table)
/// concurrently. Completion order is unspecified.
pub async fn full_refresh(ctx: &DashboardContext) {
    debug!("Running full refresh pass");
    tokio::join!(
        refresh_stats(ctx),
        refresh_protocol_distribution(ctx),
        refresh_top_talkers(ctx),
        refresh_packet_table(ctx),
    );
}

/// Same as [`full_refresh`] on a detached task, so the caller never waits on the network.
pub fn spawn_full_refresh(ctx: &DashboardContext) -> JoinHandle<()> {
    let ctx = ctx.clone();
    tokio::spawn(async move { full_refresh(&ctx).await })
}

async fn guarded<F: Future<Output = ()>>(
    target: RefreshTarget,
    claim: Option<InFlightGuard>,
    refresh: F,
) {
    match claim {
        Some(_guard) => refresh.await,
        None => debug!("{:?} refresh still pending from an earlier tick, skipping", target),
    }
}

/// Scheduler flavour of [`full_refresh`]: a target whose previous tick fetch is still pending
/// is skipped this time.
pub async fn tick_refresh(ctx: &DashboardContext) {
    let in_flight = &ctx.in_flight;
    tokio::join!(
        guarded(
            RefreshTarget::Stats,
            in_flight.try_claim(RefreshTarget::Stats),
            refresh_stats(ctx),
        ),
        guarded(
            RefreshTarget::ProtocolDistribution,
            in_flight.try_claim(RefreshTarget::ProtocolDistribution),
            refresh_protocol_distribution(ctx),
        ),
        guarded(
            RefreshTarget::TopTalkers,
            in_flight.try_claim(RefreshTarget::TopTalkers),
            refresh_top_talkers(ctx),
        ),
        guarded(
            RefreshTarget::Packets,
            in_flight.try_claim(RefreshTarget::Packets),
            refresh_packet_table(ctx),
        ),
    );
}

pub fn spawn_tick_refresh(ctx: &DashboardContext) -> JoinHandle<()> {
    let ctx = ctx.clone();
    tokio::spawn(async move { tick_refresh(&ctx).await })
}
