pub mod types;

pub use types::{ConfigError, ControlError, ExportError, GatewayError};
