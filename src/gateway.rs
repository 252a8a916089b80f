//! Access to the packet-capture backend.
//!
//! Components:
//! - `types`: JSON wire types of the backend API.
//! - `backend`: the `BackendGateway` trait every refresh and control operation goes through.
//! - `http_gateway`: `reqwest` implementation of the trait.
//! - `export_download`: the `Navigator` seam used by export, and its download implementation.

pub mod backend;
pub mod export_download;
pub mod http_gateway;
pub mod types;

pub use backend::BackendGateway;
pub use export_download::{DownloadNavigator, Navigator};
pub use http_gateway::HttpGateway;
