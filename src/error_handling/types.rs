use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    InvalidUrl(String),
    DirectoryDoesNotExist(String),
    NotInRange(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::InvalidUrl(e) => write!(f, "Backend URL error: {}", e),
            ConfigError::DirectoryDoesNotExist(e) => write!(f, "Directory error: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Failures talking to the capture backend.
///
/// All variants belong to the same class from the dashboard's point of view: the request did
/// not produce a usable payload.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Connection refused, reset, DNS failure, body read failure...
    Transport(String),
    /// The backend answered with a non-2xx status code
    Status(u16),
    /// The body was not the JSON shape we expected
    Decode(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Transport(e) => write!(f, "Transport error: {}", e),
            GatewayError::Status(code) => write!(f, "Backend answered with HTTP {}", code),
            GatewayError::Decode(e) => write!(f, "Unable to decode backend payload: {}", e),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => GatewayError::Status(status.as_u16()),
            None => GatewayError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

#[derive(Debug)]
pub enum ExportError {
    InvalidUrl(String),
    IoError(std::io::Error),
    Download(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidUrl(e) => write!(f, "Invalid export URL: {}", e),
            ExportError::IoError(e) => write!(f, "Export IO error: {}", e),
            ExportError::Download(e) => write!(f, "Export download failed: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err)
    }
}

/// Outcome of a user-triggered control action that did not go through.
///
/// By the time a caller sees one of these, the failure has already been reported to the
/// notification sink (except `UserDeclined`, which is silent).
#[derive(Debug)]
pub enum ControlError {
    Gateway(GatewayError),
    UnexpectedResponse { expected: String, got: Option<String> },
    UserDeclined,
    Export(ExportError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::Gateway(e) => write!(f, "Gateway error: {}", e),
            ControlError::UnexpectedResponse { expected, got } => match got {
                Some(got) => write!(f, "Expected status \"{}\", got \"{}\"", expected, got),
                None => write!(f, "Expected status \"{}\", got no status field", expected),
            },
            ControlError::UserDeclined => write!(f, "Declined by the user"),
            ControlError::Export(e) => write!(f, "Export error: {}", e),
        }
    }
}

impl std::error::Error for ControlError {}

impl From<GatewayError> for ControlError {
    fn from(err: GatewayError) -> Self {
        ControlError::Gateway(err)
    }
}

impl From<ExportError> for ControlError {
    fn from(err: ExportError) -> Self {
        ControlError::Export(err)
    }
}
