//! Capture session control.
//!
//! - `session_controller`: `CaptureSessionController`, owner of the session state and of the
//!   refresh scheduler
//! - `confirmation`: the yes/no gate guarding reset

pub mod confirmation;
pub mod session_controller;

#[cfg(test)]
mod tests;

pub use confirmation::{AutoConfirm, ConfirmationGate};
pub use session_controller::{CaptureSessionController, ControllerSettings, SessionState};
