use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use capview::configuration::{CliArgs, Config};
use capview::console::{DashboardApp, TuiConfirmation};
use capview::controller::{AutoConfirm, CaptureSessionController, ConfirmationGate, ControllerSettings};
use capview::gateway::{DownloadNavigator, HttpGateway};
use capview::notification::NotificationCenter;
use capview::refresh::DashboardContext;
use capview::view::TuiRenderer;
use clap::Parser;
use crossterm::event::EventStream;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use log::{error, info};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

fn init_logging(config: &Config) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let args = CliArgs::parse();

    // The terminal belongs to the dashboard, so nothing is logged before the log file is known
    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Unable to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = init_logging(&config) {
        eprintln!("Unable to open log file {}: {}", config.log_file.display(), e);
        std::process::exit(1);
    }

    info!(
        "capview: live network capture dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Configuration imported successfully, backend at {}", config.backend_url);

    let gateway = match HttpGateway::new(&config.backend_url) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            error!("Unable to create the backend client: {}, exiting...", e);
            eprintln!("Unable to create the backend client: {}", e);
            std::process::exit(1);
        }
    };

    let (prompts, confirmations) = TuiConfirmation::channel();
    let confirmation: Arc<dyn ConfirmationGate> = if config.assume_yes {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(prompts)
    };
    let navigator = Arc::new(DownloadNavigator::new(
        gateway.client().clone(),
        config.export_dir.clone(),
    ));
    let renderer = Arc::new(TuiRenderer::new());
    let notifications = Arc::new(NotificationCenter::new(config.notification_ttl()));

    let ctx = DashboardContext::new(gateway, renderer.clone(), notifications.clone());
    let controller = Arc::new(CaptureSessionController::new(
        ctx,
        confirmation,
        navigator,
        ControllerSettings::from(&config),
    ));
    let mut app = DashboardApp::new(controller.clone(), renderer, notifications, confirmations);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Initial fill happens in the background, the first frames show the empty states
    let loading = Arc::clone(&controller);
    tokio::spawn(async move { loading.load().await });

    let outcome = app.run(&mut terminal, EventStream::new()).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Dashboard closed");
    outcome
}
