//! Main entry point for the dashgate CLI.
//!
//! Each subcommand plays the part of one page or form: it builds the
//! controller from configuration, runs one operation and renders the result.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashgate::auth::{self, LoginForm, RegisterForm};
use dashgate::config::load_config;
use dashgate::view::render::{render_dashboard, render_message, render_navigation};
use dashgate::view::{DashboardView, FormOutcome, Navigation, Severity};
use dashgate::Controller;
use dashgate_adapters::AvatarFile;

#[derive(Parser)]
#[command(name = "dashgate", version, about = "Account session and profile client")]
struct Cli {
    /// Config file (YAML)
    #[arg(long, env = "DASHGATE_CONFIG", default_value = "dashgate.yaml")]
    config: PathBuf,

    /// Override the API base URL from the config file
    #[arg(long, env = "DASHGATE_API_URL")]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        email: String,
        #[arg(long, env = "DASHGATE_PASSWORD")]
        password: String,
        #[arg(long)]
        age: Option<u32>,
    },
    /// Log in and store the session token
    Login {
        email: String,
        #[arg(long, env = "DASHGATE_PASSWORD")]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show who the stored token says is logged in
    Whoami,
    /// Load and show the profile dashboard
    Dashboard,
    /// Update the profile age
    SetAge { age: String },
    /// Upload a new avatar image
    UploadAvatar { path: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    if let Some(api) = cli.api {
        config.api_base_url = api;
    }

    let controller = Controller::from_config(&config).context("Failed to start controller")?;
    run(&controller, cli.command).await
}

async fn run(controller: &Controller, command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Register {
            email,
            password,
            age,
        } => {
            let outcome = controller
                .auth
                .register(RegisterForm {
                    email,
                    password,
                    age,
                })
                .await;
            Ok(show_form(&outcome))
        }
        Commands::Login { email, password } => {
            let outcome = controller.auth.login(LoginForm::new(email, password)).await;
            let code = show_form(&outcome);
            if let Some(Navigation::Dashboard { after }) = outcome.navigation() {
                println!("{}", render_navigation(Navigation::Dashboard { after }));
                tokio::time::sleep(after).await;
                let view = controller.dashboard.load().await;
                return Ok(show_dashboard(&view));
            }
            Ok(code)
        }
        Commands::Logout => {
            let navigation = controller.auth.logout();
            println!("{}", render_navigation(navigation));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Whoami => {
            let token = controller
                .session()
                .token()
                .context("Failed to read session")?;
            match token.map(|t| auth::display_name(&t)) {
                Some(name) if !name.is_empty() => println!("{}", name),
                Some(_) => println!("logged in (token carries no name)"),
                None => println!("not logged in"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dashboard => {
            let view = controller.dashboard.load().await;
            Ok(show_dashboard(&view))
        }
        Commands::SetAge { age } => {
            let view = controller.dashboard.load().await;
            if view.is_terminal() {
                return Ok(show_dashboard(&view));
            }
            let view = controller.dashboard.update_age(&age).await;
            Ok(show_dashboard(&view))
        }
        Commands::UploadAvatar { path } => {
            let view = controller.dashboard.load().await;
            if view.is_terminal() {
                return Ok(show_dashboard(&view));
            }
            let file = match path {
                Some(path) => Some(
                    AvatarFile::from_path(&path)
                        .await
                        .context("Failed to read avatar image")?,
                ),
                None => None,
            };
            let view = controller.dashboard.upload_avatar(file).await;
            Ok(show_dashboard(&view))
        }
    }
}

fn show_form(outcome: &FormOutcome) -> ExitCode {
    match outcome.message() {
        Some(message) => {
            println!("{}", render_message(message));
            exit_code(message.severity)
        }
        None => ExitCode::SUCCESS,
    }
}

fn show_dashboard(view: &DashboardView) -> ExitCode {
    println!("{}", render_dashboard(view));
    if let Some(navigation) = view.redirect {
        println!("{}", render_navigation(navigation));
        return ExitCode::FAILURE;
    }
    exit_code(view.message.severity)
}

fn exit_code(severity: Severity) -> ExitCode {
    match severity {
        Severity::Error => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
