//! Data refresh operations and the context object they run against.

pub mod context;
pub mod in_flight;
pub mod operations;

pub use context::DashboardContext;
pub use in_flight::{InFlight, RefreshTarget};
pub use operations::{
    full_refresh, refresh_device_table, refresh_packet_table, refresh_protocol_distribution,
    refresh_stats, refresh_top_talkers, spawn_full_refresh, spawn_tick_refresh, tick_refresh,
};
