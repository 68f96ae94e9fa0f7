//! nft-console
//!
//! ```text
//!   .env / environment / --config TOML
//!        │
//!        ▼
//!   config (load + validate) ──▶ lifecycle::startup
//!                                   │ connect_network → connect_contract → wallet
//!                                   ▼
//!                               NftContract ◀── shell (menu loop on stdin/stdout)
//!                                   │            or `mint <TOKEN_URI>` one-shot
//!                                   ▼
//!                               JSON-RPC node
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::BufReader;

use nft_console::config::{load_config, load_env_file};
use nft_console::lifecycle::{initialize, shutdown_signal};
use nft_console::observability::logging;
use nft_console::shell::{print_mint_receipt, report_error, Shell};

#[derive(Parser)]
#[command(name = "nft-console")]
#[command(about = "Mint and inspect NFTs on an Ethereum-compatible network", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Env file to load (defaults to ./.env when present)
    #[arg(short, long)]
    env_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Shell,
    /// Mint one token and exit
    Mint {
        /// Metadata URI of the new token
        token_uri: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging needs the loaded config; load problems go straight to stderr.
    if let Err(e) = load_env_file(cli.env_file.as_deref()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(
        cli.log_level
            .as_deref()
            .unwrap_or(&config.observability.log_level),
    );
    tracing::info!("nft-console v{} starting", env!("CARGO_PKG_VERSION"));

    let nft = match initialize(&config).await {
        Ok(nft) => nft,
        Err(e) => {
            tracing::error!(error = %e.cause(), "Startup failed");
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout();
    let outcome = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let mut shell = Shell::new(nft, BufReader::new(tokio::io::stdin()), stdout);
            tokio::select! {
                result = shell.run() => result,
                _ = shutdown_signal() => Ok(()),
            }
        }
        Commands::Mint { token_uri } => {
            tokio::select! {
                result = nft.mint_nft(&token_uri) => match result {
                    Ok(receipt) => print_mint_receipt(&mut stdout, &receipt),
                    Err(e) => {
                        if let Err(io) = report_error(&mut stdout, &e) {
                            tracing::error!(error = %io, "Failed to write output");
                        }
                        return ExitCode::FAILURE;
                    }
                },
                _ = shutdown_signal() => Ok(()),
            }
        }
    };

    match outcome {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Console I/O failed");
            ExitCode::FAILURE
        }
    }
}
