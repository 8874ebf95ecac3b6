//! dmriqc-squad - Group-level diffusion MRI QC report
//!
//! Collects `sub-*/ses-<session>/qc/quad` folders under a derivatives root,
//! runs the group QC aggregator over them and writes
//! `sub-GRP/ses-<session>/qc/squad/sub-GRP_ses-<session>_pipeline_QC_SQUAD.tsv`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use dmriqc_common::config::{load_config, LoggingConfig};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dmriqc_squad::config::resolve_aggregator_binary;
use dmriqc_squad::PipelineConfig;

/// Command-line arguments for dmriqc-squad
#[derive(Parser, Debug)]
#[command(name = "dmriqc-squad")]
#[command(about = "Run group diffusion QC and classify subjects into pass/warn/fail tiers")]
#[command(version)]
struct Args {
    /// Path to the derivatives folder
    #[arg(long, env = "DMRIQC_DERIVATIVES")]
    derivatives: PathBuf,

    /// Session identifier (without the ses- prefix)
    #[arg(long, env = "DMRIQC_SESSION")]
    session: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_config().context("Failed to load configuration")?;
    init_tracing(&toml_config.logging)?;

    info!("Starting dmriqc-squad");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig {
        derivatives: args.derivatives,
        session: args.session,
        aggregator_binary: resolve_aggregator_binary(&toml_config),
    };

    let summary = dmriqc_squad::run(&config)
        .await
        .context("Group QC pipeline failed")?;

    info!(
        "QC report for {} subjects: {}",
        summary.rows.len(),
        summary.report_path.display()
    );
    Ok(())
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. With a log file configured,
/// output is appended there instead of stderr.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &logging.level;
        EnvFilter::new(format!(
            "dmriqc_squad={level},dmriqc_common={level},aggregator={level}"
        ))
    });

    let file_layer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}
