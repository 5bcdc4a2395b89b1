use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ApiClient, ToastStack};
use shared::domain::WindowIndex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use control_panel::{
    config::{self, load_settings, load_settings_file, normalize_server_url},
    controller::{DashboardAction, DashboardController, SettingsController, Trigger},
    ui::{
        terminal::{decode_data_uri, extension_for_mime, TerminalNotifier, TerminalView},
        InputField, PageView,
    },
};

#[derive(Parser, Debug)]
#[command(name = "control-panel", about = "Drive the screen automation backend from a terminal")]
struct Cli {
    /// Backend base URL; overrides the settings file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Read settings from this file instead of ./control_panel.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show backend status and the open windows.
    Status,
    /// Ask the AI for an action plan, review it, then confirm or cancel.
    Plan {
        instruction: String,
        /// Execute the plan without prompting.
        #[arg(long)]
        yes: bool,
    },
    /// Capture the screen, or one window with --window.
    Capture {
        #[arg(long)]
        window: Option<u32>,
        /// Write the image to this path.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write the image to a timestamped file in the current directory.
        #[arg(long, conflicts_with = "out")]
        save: bool,
    },
    /// Describe the current screen with the AI.
    Analyze {
        /// Ask a specific question instead of the default description.
        #[arg(long)]
        prompt: Option<String>,
    },
    Windows,
    Focus {
        index: u32,
    },
    /// Locate an element by description, optionally clicking it.
    Find {
        description: String,
        #[arg(long)]
        click: bool,
    },
    Type {
        text: String,
    },
    SetApiKey {
        api_key: String,
    },
    TestConnection,
    /// Show the settings page summary.
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = match &cli.config {
        Some(path) => load_settings_file(path)?,
        None => load_settings(),
    };
    if let Some(server_url) = &cli.server_url {
        settings.server_url = server_url.clone();
    }
    let server_url = normalize_server_url(&settings.server_url)?;
    info!(%server_url, "using backend");

    let api = ApiClient::http(server_url);
    let notifier = Arc::new(TerminalNotifier::new(ToastStack::with_ttl(
        settings.notification_ttl(),
    )));

    match cli.command {
        Command::Settings => {
            let mut page = settings_page(&api, &notifier, &settings);
            page.load().await;
        }
        Command::SetApiKey { api_key } => {
            let mut page = settings_page(&api, &notifier, &settings);
            page.view_mut().set_input(InputField::ApiKey, &api_key);
            page.dispatch(Trigger::Click, "saveApiKeyBtn").await;
        }
        Command::TestConnection => {
            let mut page = settings_page(&api, &notifier, &settings);
            page.dispatch(Trigger::Click, "testConnectionBtn").await;
        }
        command => {
            let mut page =
                DashboardController::new(api, TerminalView::new(), Arc::clone(&notifier))
                    .with_focus_refresh_delay(settings.focus_refresh_delay());
            run_dashboard(&mut page, command).await?;
        }
    }

    let failures = notifier.error_count();
    if failures > 0 {
        bail!("{failures} request(s) failed");
    }
    Ok(())
}

type TerminalDashboard = DashboardController<TerminalView, Arc<TerminalNotifier>>;
type TerminalSettings = SettingsController<TerminalView, Arc<TerminalNotifier>>;

fn settings_page(
    api: &ApiClient,
    notifier: &Arc<TerminalNotifier>,
    settings: &config::Settings,
) -> TerminalSettings {
    SettingsController::new(api.clone(), TerminalView::new(), Arc::clone(notifier))
        .with_status_reload_delay(settings.status_reload_delay())
}

async fn run_dashboard(page: &mut TerminalDashboard, command: Command) -> Result<()> {
    match command {
        Command::Status => page.load().await,
        Command::Plan { instruction, yes } => {
            page.view_mut()
                .set_input(InputField::Instruction, &instruction);
            page.dispatch(Trigger::CTRL_ENTER, "instructionInput").await;
            if page.session().pending_actions().is_empty() {
                return Ok(());
            }
            let confirmed = yes || prompt_confirmation("Execute these actions? [y/N] ").await?;
            let element_id = if confirmed {
                "confirmExecutionBtn"
            } else {
                "cancelExecutionBtn"
            };
            page.dispatch(Trigger::Click, element_id).await;
        }
        Command::Capture { window, out, save } => {
            match window {
                Some(index) => {
                    page.run(DashboardAction::CaptureWindow(WindowIndex(index)))
                        .await
                }
                None => {
                    page.dispatch(Trigger::Click, "captureScreenBtn").await;
                }
            }
            let target = match (out, save) {
                (Some(path), _) => Some(path),
                (None, true) => Some(PathBuf::from(default_capture_name())),
                (None, false) => None,
            };
            if let (Some(path), Some(source)) = (target, page.view().last_image()) {
                let written = save_image(source, path)?;
                println!("Saved {}", written.display());
            }
        }
        Command::Analyze { prompt } => {
            if let Some(prompt) = prompt {
                page.view_mut()
                    .set_input(InputField::AnalysisPrompt, &prompt);
            }
            page.dispatch(Trigger::Click, "analyzeScreenBtn").await;
        }
        Command::Windows => {
            page.dispatch(Trigger::Click, "refreshWindowsBtn").await;
        }
        Command::Focus { index } => {
            page.run(DashboardAction::FocusWindow(WindowIndex(index)))
                .await
        }
        Command::Find { description, click } => {
            page.view_mut()
                .set_input(InputField::ElementDescription, &description);
            page.dispatch(Trigger::Click, "findElementBtn").await;
            if click && page.session().located_point().is_some() {
                page.dispatch(Trigger::Click, "clickElementBtn").await;
            }
        }
        Command::Type { text } => {
            page.view_mut().set_input(InputField::QuickTypeText, &text);
            page.dispatch(Trigger::Click, "quickTypeBtn").await;
        }
        Command::SetApiKey { .. } | Command::TestConnection | Command::Settings => {
            bail!("settings commands are not handled by the dashboard")
        }
    }
    Ok(())
}

async fn prompt_confirmation(question: &str) -> Result<bool> {
    println!("{question}");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read confirmation from stdin")?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn default_capture_name() -> String {
    format!("capture-{}", chrono::Local::now().format("%Y%m%d-%H%M%S"))
}

/// Writes a data-URI image. Paths without an extension get one from the MIME type.
fn save_image(source: &str, path: PathBuf) -> Result<PathBuf> {
    let (mime, bytes) = decode_data_uri(source)?;
    let path = if path.extension().is_none() {
        path.with_extension(extension_for_mime(&mime))
    } else {
        path
    };
    std::fs::write(&path, bytes)
        .with_context(|| format!("failed to write image to '{}'", path.display()))?;
    Ok(path)
}
