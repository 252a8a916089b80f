use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// `(key, action)` pairs listed by the help overlay.
pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("s", "start packet capture and live polling"),
    ("t", "stop packet capture"),
    ("n", "scan the local network for devices"),
    ("e", "download the captured packets as CSV"),
    ("r", "clear all captured data (asks first)"),
    ("?", "show or hide this help"),
    ("q", "leave the dashboard (also Esc, Ctrl-C)"),
];

/// A key press, understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Scan,
    Export,
    Reset,
    Help,
    Quit,
}

impl Command {
    /// Letters are case-insensitive. Control combinations other than Ctrl-C are ignored.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Self::Quit),
                _ => None,
            };
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            return None;
        }

        match key.code {
            KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                's' => Some(Self::Start),
                't' => Some(Self::Stop),
                'n' => Some(Self::Scan),
                'e' => Some(Self::Export),
                'r' => Some(Self::Reset),
                '?' | 'h' => Some(Self::Help),
                'q' => Some(Self::Quit),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Scan => "scan",
            Self::Export => "export",
            Self::Reset => "reset",
            Self::Help => "help",
            Self::Quit => "quit",
        };
        write!(f, "{}", name)
    }
}
