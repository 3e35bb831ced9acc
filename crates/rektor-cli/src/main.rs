//! rektor - Rekor transparency log verifier
//!
//! Verifies that an artifact's signed entry is included in the log and that
//! the log has only grown since a previously observed checkpoint.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::Config;

/// Exit status when a verification fails
const EXIT_VERIFICATION_FAILED: u8 = 1;
/// Exit status for usage, configuration and network errors
const EXIT_ERROR: u8 = 2;

/// rektor - Rekor transparency log verifier
#[derive(Parser, Debug)]
#[command(name = "rektor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rektor.toml")]
    config: PathBuf,

    /// Enable debug output (same as --log-level debug)
    #[arg(short, long)]
    debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the latest checkpoint as JSON
    Checkpoint,

    /// Verify an artifact's signature and its entry's inclusion in the log
    Inclusion {
        /// Log index of the entry
        log_index: u64,

        /// Path to the artifact the entry signs
        #[arg(short, long)]
        artifact: PathBuf,
    },

    /// Verify the latest checkpoint is consistent with an earlier tree head
    Consistency {
        /// Tree ID of the earlier checkpoint
        #[arg(long)]
        tree_id: String,

        /// Tree size of the earlier checkpoint
        #[arg(long)]
        tree_size: u64,

        /// Root hash of the earlier checkpoint, hex-encoded
        #[arg(long)]
        root_hash: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { cli.log_level.as_str() };
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let client = config.client();
    tracing::debug!(url = client.url(), timeout = ?client.timeout(), "using Rekor");

    match cli.command {
        Commands::Checkpoint => commands::checkpoint::run(&client).await,
        Commands::Inclusion {
            log_index,
            artifact,
        } => commands::inclusion::run(&client, log_index, &artifact).await,
        Commands::Consistency {
            tree_id,
            tree_size,
            root_hash,
        } => commands::consistency::run(&client, &tree_id, tree_size, &root_hash).await,
    }
}

/// Verification failures exit 1; everything else exits 2
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<rektor::Error>() {
        Some(e) if e.is_verification_failure() => EXIT_VERIFICATION_FAILED,
        _ => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inclusion() {
        let cli = Cli::try_parse_from([
            "rektor",
            "-d",
            "inclusion",
            "128",
            "--artifact",
            "release.tar.gz",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config, PathBuf::from("rektor.toml"));
        match cli.command {
            Commands::Inclusion {
                log_index,
                artifact,
            } => {
                assert_eq!(log_index, 128);
                assert_eq!(artifact, PathBuf::from("release.tar.gz"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_negative_index() {
        assert!(Cli::try_parse_from(["rektor", "inclusion", "-1", "--artifact", "a"]).is_err());
        assert!(Cli::try_parse_from(["rektor", "inclusion", "12"]).is_err());
    }

    #[test]
    fn test_consistency_requires_all_fields() {
        assert!(Cli::try_parse_from([
            "rektor",
            "consistency",
            "--tree-id",
            "1193050959916656506",
            "--tree-size",
            "10"
        ])
        .is_err());
    }

    #[test]
    fn test_exit_codes() {
        let verification = anyhow::Error::new(rektor::Error::SignatureInvalid("bad".to_string()))
            .context("while verifying");
        assert_eq!(exit_code(&verification), EXIT_VERIFICATION_FAILED);

        let io = anyhow::Error::new(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(exit_code(&io), EXIT_ERROR);

        let response: rektor::Error =
            rektor::rekor::Error::InvalidResponse("entry 3 has no inclusion proof".to_string())
                .into();
        assert_eq!(exit_code(&anyhow::Error::new(response)), EXIT_ERROR);
    }

    #[tokio::test]
    async fn test_missing_artifact_fails_before_network() {
        // Port 9 is discard; a network attempt would surface as a Rekor error
        let client = rektor::rekor::RekorClient::new("http://127.0.0.1:9");
        let dir = tempfile::tempdir().unwrap();
        let err = commands::inclusion::run(&client, 0, &dir.path().join("missing"))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<std::io::Error>().is_some());
        assert_eq!(exit_code(&err), EXIT_ERROR);
    }

    #[tokio::test]
    async fn test_bad_root_hash_is_usage_error() {
        let client = rektor::rekor::RekorClient::new("http://127.0.0.1:9");
        let err = commands::consistency::run(&client, "1", 4, "not-hex")
            .await
            .unwrap_err();
        assert_eq!(exit_code(&err), EXIT_ERROR);
    }
}
