//! schemacraft - print the DDL for a saved diagram snapshot

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use schemacraft::core::config::Config;
use schemacraft::core::snapshot::{self, SnapshotError};
use schemacraft::core::validation::{Severity, diagram_issues};
use schemacraft::generate;
use tracing_subscriber::EnvFilter;

/// Generate SQL DDL from a diagram snapshot
#[derive(Parser, Debug)]
#[command(name = "schemacraft")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Diagram snapshot (JSON)
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// Target dialect; defaults to the snapshot's own dialect
    #[arg(value_name = "DIALECT")]
    dialect: Option<String>,

    /// Emit IF NOT EXISTS where the dialect supports it
    #[arg(long)]
    if_not_exists: bool,

    /// Leave table and column comments out of the output
    #[arg(long)]
    no_comments: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}

fn main() -> ExitCode {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so the DDL on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(cli, Config::from_env()) {
        Ok(ddl) => {
            println!("{}", ddl);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, mut config: Config) -> Result<String, CliError> {
    config.if_not_exists |= cli.if_not_exists;
    config.include_comments &= !cli.no_comments;
    tracing::debug!(
        "Config loaded: dialect={}, history_limit={}, if_not_exists={}, include_comments={}",
        config.default_dialect.id(),
        config.history_limit,
        config.if_not_exists,
        config.include_comments
    );

    let json = std::fs::read_to_string(&cli.snapshot).map_err(|source| CliError::Read {
        path: cli.snapshot.clone(),
        source,
    })?;
    let diagram = snapshot::from_json_or(&json, config.default_dialect).map_err(|source| {
        CliError::Snapshot {
            path: cli.snapshot.clone(),
            source,
        }
    })?;

    let dialect_id = cli
        .dialect
        .unwrap_or_else(|| diagram.dialect.id().to_string());
    let dialect = schemacraft::registry().lookup(&dialect_id);

    for issue in diagram_issues(&diagram, dialect) {
        match issue.severity {
            Severity::Error => tracing::error!("{}", issue.message),
            Severity::Warning => tracing::warn!("{}", issue.message),
        }
    }

    Ok(generate(&diagram, &dialect_id, &config.ddl_options()))
}
