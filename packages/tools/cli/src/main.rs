//! Gatekit CLI (`gk`)
//!
//! 토큰 발급/검증과 권한 정책 확인을 위한 운영 도구입니다.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "gk")]
#[command(author, version, about = "Gatekit CLI - token and policy diagnostics", long_about = None)]
struct Cli {
    /// Private key: PEM file path or inline PEM (default: GK_PRIVATE_KEY[_PATH])
    #[arg(long, global = true)]
    private_key: Option<String>,

    /// Public key: PEM file path or inline PEM (default: GK_PUBLIC_KEY[_PATH])
    #[arg(long, global = true)]
    public_key: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue, verify, and refresh tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show the permission policy
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Subcommand enums
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a new token pair for a subject
    Issue {
        #[arg(long)]
        subject: String,
    },
    /// Validate a token (access by default)
    Verify {
        token: String,
        /// Validate as a refresh token
        #[arg(long)]
        refresh: bool,
    },
    /// Decode a token checking only the signature
    Inspect { token: String },
    /// Exchange a refresh token for a new pair
    Refresh { token: String },
}

#[derive(Subcommand)]
enum PolicyAction {
    /// Print the effective policy
    Show {
        /// Policy YAML (default: built-in policy)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Commands::Token { action } => {
            let config = CliConfig::load(cli.private_key.as_deref(), cli.public_key.as_deref())?;
            let service = config.token_service()?;

            match action {
                TokenAction::Issue { subject } => commands::token::issue(&service, &subject, format),
                TokenAction::Verify { token, refresh } => {
                    commands::token::verify(&service, &token, refresh, format)
                }
                TokenAction::Inspect { token } => commands::token::inspect(&service, &token, format),
                TokenAction::Refresh { token } => commands::token::refresh(&service, &token, format),
            }
        }

        Commands::Policy { action } => match action {
            PolicyAction::Show { file } => commands::policy::show(file.as_deref(), format),
        },
    }
}
