//! Session gateway diagnostics
//!
//! Operator tool for the session pool configuration:
//! 1. `resolve <user>` looks up a user's context record and prints it
//! 2. `network` reports whether a usable network interface is up
//! 3. `check` validates the config file and prints the effective settings

mod config;

use anyhow::{Context, Result, bail};
use session_pool::{NetworkProbe, SystemNetworkProbe};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_context::UserContextResolver;

use crate::config::Config;

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct Cli {
    config_path: Option<String>,
    command: Command,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Resolve { user: String },
    Network,
    Check,
}

const USAGE: &str = "usage: session-gateway [--config PATH] <resolve USER | network | check>";

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config_path = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config requires a path")?;
            config_path = Some(path.clone());
        } else {
            positional.push(arg.as_str());
        }
    }

    let command = match positional.as_slice() {
        ["resolve", user] => Command::Resolve {
            user: user.to_string(),
        },
        ["network"] => Command::Network,
        ["check"] => Command::Check,
        _ => bail!(USAGE),
    };

    Ok(Cli {
        config_path,
        command,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let config_path = Config::resolve_path(cli.config_path.as_deref());

    match cli.command {
        Command::Network => {
            print_json(&serde_json::json!({ "network_up": SystemNetworkProbe.is_up() }))
        }
        Command::Check => {
            let config = load_config(&config_path)?;
            let settings = config.pool_settings();
            print_json(&serde_json::json!({
                "config_path": config_path.display().to_string(),
                "default_domain": settings.default_domain,
                "user_context_url": config.sessions.user_context_url,
                "enable_ews": settings.ews_mode.label(),
                "lookup_timeout_secs": config.sessions.lookup_timeout_secs,
            }))
        }
        Command::Resolve { user } => {
            let config = load_config(&config_path)?;
            let http_client = reqwest::Client::builder()
                .timeout(config.lookup_timeout())
                .build()
                .context("failed to build HTTP client")?;
            let resolver =
                UserContextResolver::new(config.sessions.user_context_url.clone(), http_client);
            let context = resolver
                .resolve(&user)
                .await
                .with_context(|| format!("failed to resolve user context for {user}"))?;
            print_json(&context)
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    info!(path = %path.display(), "loading configuration");
    let config = Config::load(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    info!(
        default_domain = config.sessions.default_domain.as_deref().unwrap_or(""),
        user_context_url = config.sessions.user_context_url.as_deref().unwrap_or(""),
        enable_ews = config.sessions.enable_ews.label(),
        "configuration loaded"
    );
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
