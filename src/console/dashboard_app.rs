//! Frame loop of the terminal dashboard.
//!
//! ```text
//!   key events ─┐
//!   renders ────┤                          ┌─▶ JoinSet (one task per command)
//!   prompts ────┼──▶ select! ──▶ handle ───┤
//!   redraw tick ┘        ▲                 └─▶ quit: abort commands, stop polling
//!                        └── draw whole frame from a DashboardState snapshot
//! ```
//!
//! Commands run as their own tasks, so a backend call that hangs never holds up input: stop
//! and quit stay available while a scan is outstanding.

use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::{Stream, StreamExt};
use log::{debug, error, info};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use super::confirmation::ConfirmRequest;
use super::keymap::{Command, KEY_BINDINGS};
use crate::controller::CaptureSessionController;
use crate::notification::NotificationCenter;
use crate::view::widgets::{draw_dashboard, Overlay};
use crate::view::TuiRenderer;

/// Redraw period when nothing else happens, so expired notifications leave the screen.
pub const REDRAW_PERIOD: Duration = Duration::from_millis(250);

pub struct DashboardApp {
    controller: Arc<CaptureSessionController>,
    renderer: Arc<TuiRenderer>,
    notifications: Arc<NotificationCenter>,
    confirmations: mpsc::UnboundedReceiver<ConfirmRequest>,
    pending: Option<ConfirmRequest>,
    show_help: bool,
    commands: JoinSet<()>,
}

impl DashboardApp {
    pub fn new(
        controller: Arc<CaptureSessionController>,
        renderer: Arc<TuiRenderer>,
        notifications: Arc<NotificationCenter>,
        confirmations: mpsc::UnboundedReceiver<ConfirmRequest>,
    ) -> Self {
        Self {
            controller,
            renderer,
            notifications,
            confirmations,
            pending: None,
            show_help: false,
            commands: JoinSet::new(),
        }
    }

    pub fn controller(&self) -> &Arc<CaptureSessionController> {
        &self.controller
    }

    /// Commands still running.
    pub fn outstanding(&self) -> usize {
        self.commands.len()
    }

    /// Draws and reacts to input until quit or end of input, then shuts the session down.
    pub async fn run<B, S>(&mut self, terminal: &mut Terminal<B>, mut events: S) -> io::Result<()>
    where
        B: Backend,
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        let mut redraw = tokio::time::interval(REDRAW_PERIOD);
        redraw.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let result = loop {
            if let Err(e) = self.draw(terminal) {
                error!("Unable to draw the dashboard: {}", e);
                break Err(e);
            }

            let flow = tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => {
                        error!("Unable to read terminal input: {}", e);
                        break Err(e);
                    }
                    None => {
                        info!("End of input, leaving the dashboard");
                        ControlFlow::Break(())
                    }
                },
                Some(request) = self.confirmations.recv() => {
                    debug!("Asking: {}", request.prompt());
                    self.pending = Some(request);
                    ControlFlow::Continue(())
                }
                Some(joined) = self.commands.join_next(), if !self.commands.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            error!("A dashboard command panicked: {}", e);
                        }
                    }
                    ControlFlow::Continue(())
                }
                _ = self.renderer.changed() => ControlFlow::Continue(()),
                _ = redraw.tick() => ControlFlow::Continue(()),
            };

            if flow.is_break() {
                break Ok(());
            }
        };

        self.shutdown().await;
        result
    }

    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let state = self.renderer.snapshot();
        let notifications = self.notifications.active();
        let overlay = match &self.pending {
            Some(request) => Some(Overlay::Confirm(request.prompt())),
            None if self.show_help => Some(Overlay::Help(KEY_BINDINGS)),
            None => None,
        };
        terminal.draw(|frame| draw_dashboard(frame, &state, &notifications, overlay))?;
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> ControlFlow<()> {
        // Resizes and focus changes only need the redraw the loop does anyway
        let Event::Key(key) = event else {
            return ControlFlow::Continue(());
        };
        if key.kind != KeyEventKind::Press {
            return ControlFlow::Continue(());
        }

        if let Some(request) = self.pending.take() {
            return self.answer(request, key);
        }
        match Command::from_key(&key) {
            Some(command) => self.dispatch(command),
            None => ControlFlow::Continue(()),
        }
    }

    /// y accepts, n or Esc declines, Ctrl-C declines and quits. Other keys leave the question up.
    fn answer(&mut self, request: ConfirmRequest, key: KeyEvent) -> ControlFlow<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
                request.answer(false);
                return ControlFlow::Break(());
            }
            self.pending = Some(request);
            return ControlFlow::Continue(());
        }

        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => request.answer(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => request.answer(false),
            _ => self.pending = Some(request),
        }
        ControlFlow::Continue(())
    }

    fn dispatch(&mut self, command: Command) -> ControlFlow<()> {
        let state = self.renderer.snapshot();
        match command {
            Command::Quit => return ControlFlow::Break(()),
            Command::Help => {
                self.show_help = !self.show_help;
                return ControlFlow::Continue(());
            }
            Command::Start if !state.controls.start_enabled => {
                debug!("Capture already running, ignoring start");
                return ControlFlow::Continue(());
            }
            Command::Stop if !state.controls.stop_enabled => {
                debug!("Capture not running, ignoring stop");
                return ControlFlow::Continue(());
            }
            Command::Scan if state.scan_busy => {
                debug!("Scan in progress, ignoring scan");
                return ControlFlow::Continue(());
            }
            _ => {}
        }

        debug!("Executing command {}", command);
        let controller = Arc::clone(&self.controller);
        self.commands.spawn(async move {
            // Failures were already notified by the controller
            let outcome = match command {
                Command::Start => controller.start_capture().await,
                Command::Stop => controller.stop_capture().await,
                Command::Scan => controller.scan_network().await.map(|_| ()),
                Command::Export => controller.export_data(),
                Command::Reset => controller.reset_data().await,
                Command::Help | Command::Quit => Ok(()),
            };
            if let Err(e) = outcome {
                debug!("Command {} ended with: {}", command, e);
            }
        });
        ControlFlow::Continue(())
    }

    /// Cancels outstanding commands first, so a late start answer cannot re-arm polling.
    async fn shutdown(&mut self) {
        if !self.commands.is_empty() {
            info!("Cancelling {} outstanding command(s)", self.commands.len());
        }
        self.commands.shutdown().await;
        if let Some(request) = self.pending.take() {
            request.answer(false);
        }
        self.controller.shutdown();
    }
}
