mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "isl")]
#[command(about = "Intent slippage monitor CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON file of upstream detail records and print intents + stats
    Reconcile {
        /// JSON array of `{id, sn, action_type, created_at, action_detail}`
        #[arg(long)]
        events: String,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Classify one action line and print the result
    Parse {
        /// e.g. "IntentFilled 100 USDC(arbitrum) -> 9.5 AVAX(avax)"
        detail: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Reconcile { events } => {
            let events = commands::load_events(&events)?;
            let report = commands::reconcile(&events);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = isl_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Parse { detail } => {
            let parsed = isl_reconcile::parse(&detail);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
    }

    Ok(())
}
