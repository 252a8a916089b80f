//! Terminal front end: the key map standing in for the dashboard buttons, the modal reset
//! confirmation, and the frame loop tying input, commands and redraws together.

pub mod confirmation;
pub mod dashboard_app;
pub mod keymap;

pub use confirmation::{ConfirmRequest, TuiConfirmation};
pub use dashboard_app::DashboardApp;
pub use keymap::{Command, KEY_BINDINGS};
