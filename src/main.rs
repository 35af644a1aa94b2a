//! Switchboard - Multi-Agent Customer Service Router
//!
//! Main entry point for the CLI application.

use clap::Parser;
use switchboard::{Config, Outcome, Router};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Switchboard - route customer queries across specialist agents
#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Customer query to route
    query: Option<String>,

    /// Decision engine model
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Maximum reasoning turns
    #[arg(long)]
    max_turns: Option<usize>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration with CLI overrides
    let mut config = Config::load();

    if let Some(model) = args.model {
        config.gemini.model = model;
    }

    if let Some(max_turns) = args.max_turns {
        config.router.max_turns = max_turns;
    }

    if args.debug {
        config.router.debug = true;
    }

    let default_filter = if config.router.debug {
        "switchboard=debug"
    } else {
        "switchboard=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if args.init_config {
        let path = config.save_and_get_path()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let Some(query) = args.query else {
        anyhow::bail!("No query given. Usage: switchboard \"<customer query>\"");
    };

    config.validate()?;
    if config.gemini.api_key.is_empty() {
        anyhow::bail!(
            "GOOGLE_API_KEY is not set. Get one at: https://aistudio.google.com/app/apikey"
        );
    }

    let router = Router::new(config);

    // Ctrl-C aborts the in-flight turn and surfaces a cancelled outcome
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let reply = router.submit(&query, cancel).await?;

    println!("{}", reply.answer);
    if reply.outcome != Outcome::Done {
        eprintln!("(outcome: {})", reply.outcome);
    }

    Ok(())
}
