//! Gianged HRM - Desktop client for staff, leave and attendance management.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use gianged_hrm as app;
use tracing_subscriber::prelude::*;

use app::api::{ApiClient, HrBackend};
use app::config::{AppConfig, ConfigLoadResult};
use app::session::{FileStore, SessionService};
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop client for staff, leave and attendance management.
#[derive(Parser)]
#[command(name = "gianged-hrm")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,
}

/// Application launch mode.
enum LaunchMode {
    /// Normal operation with valid config.
    Normal(AppConfig),
    /// Setup wizard for first run or invalid config.
    Setup(SetupWizard, Option<String>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr and a daily file under the default data directory.
    let log_dir = AppConfig::default().data_dir().join("logs");
    let file_appender = tracing_appender::rolling::daily(&log_dir, "gianged-hrm.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    tracing::info!("Gianged HRM starting...");

    let config_path = if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };
    tracing::info!("Config path: {:?}", config_path);

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            LaunchMode::Normal(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, starting setup wizard");
            LaunchMode::Setup(SetupWizard::new(), None)
        }
        ConfigLoadResult::Invalid(e, parsed) => {
            tracing::warn!("Config invalid: {}", e);
            let wizard = parsed.map_or_else(SetupWizard::new, SetupWizard::with_config);
            LaunchMode::Setup(wizard, Some(e.to_string()))
        }
    };

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    match launch_mode {
        LaunchMode::Normal(config) => run_main_app(config, rt),
        LaunchMode::Setup(wizard, error) => run_setup_wizard(wizard, error, config_path, rt),
    }
}

/// Run the setup wizard.
fn run_setup_wizard(
    wizard: SetupWizard,
    initial_error: Option<String>,
    config_path: PathBuf,
    rt: tokio::runtime::Runtime,
) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Gianged HRM - Setup")
            .with_inner_size([600.0, 500.0])
            .with_min_inner_size([500.0, 400.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Gianged HRM - Setup",
        options,
        Box::new(|_cc| Ok(Box::new(SetupApp::new(wizard, initial_error, config_path, rt)))),
    )
    .map_err(|e| anyhow::anyhow!("Setup window failed: {e}"))
}

/// Run the main application.
fn run_main_app(config: AppConfig, rt: tokio::runtime::Runtime) -> anyhow::Result<()> {
    let session_dir = config.session_dir();
    let store = FileStore::open(&session_dir)
        .with_context(|| format!("Failed to open session storage at {}", session_dir.display()))?;
    let session = Arc::new(SessionService::new(Arc::new(store)));

    let client = ApiClient::new(&config.api, session.clone()).context("Failed to create API client")?;
    tracing::info!("HR server: {}", client.base_url());
    let backend: Arc<dyn HrBackend> = Arc::new(client);

    // Picks up logins and logouts made by another window.
    session.spawn_watcher(rt.handle(), Duration::from_secs(config.session.watch_interval_secs));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Gianged HRM")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gianged HRM",
        options,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(App::new(config, rt, session, backend)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Main window failed: {e}"))
}
