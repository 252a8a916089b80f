//! View side of the dashboard.
//!
//! - `types`: render instructions (stats block, chart updates, table bodies, control states)
//! - `format`: number, size and duration formatting
//! - `builders`: pure functions turning backend payloads into render instructions
//! - `renderer`: the `ViewRenderer` trait consumed by the refresh operations
//! - `dashboard_state`: widget state behind the terminal `ViewRenderer`
//! - `widgets`: the ratatui frame drawn from that state

pub mod builders;
pub mod dashboard_state;
pub mod format;
pub mod renderer;
pub mod types;
pub mod widgets;

pub use dashboard_state::{DashboardState, TuiRenderer};
pub use renderer::ViewRenderer;
