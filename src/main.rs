//! ProcessFlow - desktop admin console for departments, processes and subprocesses.

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use eframe::egui;
use processflow as app;

use app::api::Api;
use app::config::{AppConfig, ConfigLoadResult};
use app::logging::Logging;
use app::route::Route;
use app::ui::{App, SetupApp, SetupWizard};

/// Desktop admin console for departments, processes and subprocesses.
#[derive(Parser)]
#[command(name = "processflow", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Load configuration from this file
    #[arg(long, value_name = "PATH", conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Override the API base URL for this session
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Open this route instead of the configured start page
    #[arg(long, value_name = "PATH")]
    route: Option<String>,
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

    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else if let Some(path) = &cli.config {
        path.clone()
    } else {
        AppConfig::default_path()
    };

    let launch_mode = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => LaunchMode::Normal(config),
        ConfigLoadResult::Missing => LaunchMode::Setup(SetupWizard::new(), None),
        ConfigLoadResult::Invalid(e) => LaunchMode::Setup(SetupWizard::new(), Some(e.to_string())),
    };

    // Lives until main returns; dropping it stops the log file writer.
    let mut logging = None;

    let mut config = match launch_mode {
        LaunchMode::Normal(config) => config,
        LaunchMode::Setup(wizard, error) => {
            logging = Some(Logging::init(&AppConfig::default().logging, &AppConfig::log_dir()));
            if let Some(e) = &error {
                tracing::warn!("Config invalid: {}", e);
            } else {
                tracing::info!("Config missing, starting setup wizard");
            }
            run_setup_wizard(wizard, error, config_path.clone())?;

            match AppConfig::try_load(&config_path) {
                ConfigLoadResult::Loaded(config) => config,
                ConfigLoadResult::Missing => {
                    tracing::info!("Setup cancelled");
                    return Ok(());
                }
                ConfigLoadResult::Invalid(e) => {
                    return Err(anyhow!("config still invalid after setup: {e}"));
                }
            }
        }
    };

    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate().context("invalid --api-url")?;
    }

    let _logging = match logging {
        Some(logging) => {
            logging.apply(&config.logging);
            logging
        }
        None => Logging::init(&config.logging, &AppConfig::log_dir()),
    };
    tracing::info!("ProcessFlow starting...");
    tracing::info!("Config path: {:?}", config_path);

    let start = Route::parse(cli.route.as_deref().unwrap_or(&config.ui.start_route));
    run_main_app(config, start)
}

/// Run the setup wizard until its window closes.
fn run_setup_wizard(wizard: SetupWizard, initial_error: Option<String>, config_path: PathBuf) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ProcessFlow - Setup")
            .with_inner_size([600.0, 500.0])
            .with_min_inner_size([500.0, 400.0])
            .with_resizable(true),
        ..Default::default()
    };

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    eframe::run_native(
        "ProcessFlow - Setup",
        options,
        Box::new(|_cc| Ok(Box::new(SetupApp::new(wizard, initial_error, config_path, rt)))),
    )
    .map_err(|e| anyhow!("setup window failed: {e}"))
}

/// Run the main application.
fn run_main_app(config: AppConfig, start: Route) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ProcessFlow")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let api = Api::new(&config.api).context("failed to build API client")?;
    tracing::info!("API: {}", config.api.base_url);

    eframe::run_native(
        "ProcessFlow",
        options,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(App::new(api, config, rt, start)))
        }),
    )
    .map_err(|e| anyhow!("main window failed: {e}"))
}
