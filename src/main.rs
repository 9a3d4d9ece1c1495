#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use classifier_console::adapters::terminal::{AssumeYes, StdinConfirmation, TerminalNavigator};
use classifier_console::config::Config;
use classifier_console::console::{Console, Section};
use classifier_console::domain::inference::InferenceConfigUpdate;
use classifier_console::domain::settings::SettingsPatch;
use classifier_console::services::session_service::{Confirmation, SessionService};
use classifier_console::storage::{FileStore, KeyValueStore};
use classifier_console::telemetry;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Debug, Parser)]
#[command(version, about = "Terminal console for the image classification API", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Answer yes to confirmation prompts
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long, env = "CLASSIFIER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out after confirmation
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check API health
    Status,
    /// Every statistics section for the current surface
    Dashboard {
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// A single dashboard section
    Stats {
        #[arg(value_enum)]
        section: Section,
    },
    /// Classify an image file
    Classify {
        file: PathBuf,
        /// Also print the full JSON response
        #[arg(long)]
        raw: bool,
    },
    /// Nearest city to a coordinate
    NearestCity {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Cities around a coordinate, nearest first
    NearbyCities {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        max_distance_km: Option<f64>,
    },
    /// City database coverage and query counts
    LocationStats,
    /// Server-side inference switches
    Inference {
        #[command(subcommand)]
        action: InferenceAction,
    },
    /// Locally stored console settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
enum InferenceAction {
    Get,
    Set {
        /// Use the on-device models instead of the LLM
        #[arg(long)]
        local: Option<bool>,
        /// Fall back to the on-device models when the LLM fails
        #[arg(long)]
        fallback: Option<bool>,
    },
    Reset,
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    Show,
    Set {
        /// Stored API base URL
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long, conflicts_with = "prompt_file")]
        prompt: Option<String>,
        #[arg(long)]
        prompt_file: Option<PathBuf>,
        #[arg(long)]
        local: Option<bool>,
        #[arg(long)]
        fallback: Option<bool>,
    },
    ResetPrompt,
}

impl Command {
    /// Page actions that need a session on the admin surface.
    const fn guarded(&self) -> bool {
        matches!(
            self,
            Self::Dashboard { .. }
                | Self::Stats { .. }
                | Self::Classify { .. }
                | Self::NearestCity { .. }
                | Self::NearbyCities { .. }
                | Self::LocationStats
                | Self::Inference { .. }
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(&cli.config.telemetry)?;

    let state_dir = cli.config.resolve_state_dir();
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&state_dir).with_context(|| format!("opening state in {}", state_dir.display()))?,
    );
    let confirmation: Arc<dyn Confirmation> = if cli.yes { Arc::new(AssumeYes) } else { Arc::new(StdinConfirmation) };
    let session = SessionService::new(store, Arc::new(TerminalNavigator), confirmation, cli.config.login_url.clone());
    let console = Console::new(&cli.config, session)?;

    if cli.command.guarded() && !console.open() {
        anyhow::bail!("not signed in");
    }

    let span = tracing::info_span!("command", surface = cli.config.surface.as_str());
    let output = run(&console, cli.command).instrument(span).await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

async fn run(console: &Console, command: Command) -> anyhow::Result<String> {
    Ok(match command {
        Command::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            console.login(&username, &password).await?
        }
        Command::Logout => console.logout()?,
        Command::Whoami => console.whoami(),
        Command::Status => console.status().await,
        Command::Dashboard { watch: false } => console.dashboard().await?,
        Command::Dashboard { watch: true } => {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            };
            console.watch(&mut io::stdout(), shutdown).await?;
            String::new()
        }
        Command::Stats { section } => console.section(section).await?,
        Command::Classify { file, raw } => console.classify(&file, raw).await?,
        Command::NearestCity { latitude, longitude } => console.nearest_city(latitude, longitude).await?,
        Command::NearbyCities { latitude, longitude, limit, max_distance_km } => {
            console.nearby_cities(latitude, longitude, limit, max_distance_km).await?
        }
        Command::LocationStats => console.section(Section::Location).await?,
        Command::Inference { action: InferenceAction::Get } => console.section(Section::InferenceConfig).await?,
        Command::Inference { action: InferenceAction::Set { local, fallback } } => {
            let update = InferenceConfigUpdate { use_local_inference: local, local_inference_fallback: fallback };
            if update.is_empty() {
                anyhow::bail!("nothing to update: pass --local and/or --fallback");
            }
            console.update_inference(update).await?
        }
        Command::Inference { action: InferenceAction::Reset } => console.reset_inference().await?,
        Command::Settings { action: SettingsAction::Show } => console.show_settings(),
        Command::Settings {
            action: SettingsAction::Set { url, provider, api_key, model, prompt, prompt_file, local, fallback },
        } => {
            let prompt = match prompt_file {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading prompt from {}", path.display()))?,
                ),
                None => prompt,
            };
            let patch = SettingsPatch {
                api_url: url,
                llm_provider: provider,
                llm_api_key: api_key,
                llm_model: model,
                prompt,
                use_local_inference: local,
                local_inference_fallback: fallback,
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to update");
            }
            console.update_settings(patch).await?
        }
        Command::Settings { action: SettingsAction::ResetPrompt } => console.reset_prompt()?,
    })
}

/// Typed input is echoed, so the prompt points at the env alternative.
const PASSWORD_PROMPT: &str = "密码 (输入可见, 可改用 CLASSIFIER_PASSWORD): ";

fn read_password() -> anyhow::Result<String> {
    {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{PASSWORD_PROMPT}")?;
        stderr.flush()?;
    }
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    Ok(password)
}
