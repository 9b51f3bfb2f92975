//! # ChipSeal Service Runtime
//!
//! The main entry point for the chip verification service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration (defaults + `CHIPSEAL_*` environment overrides)
//! 3. Refuse the development signature bypass when `CHIPSEAL_ENV=production`
//! 4. Build the chip directory and seed it from the registry document
//! 5. Open the scan log (JSONL file when configured, in-memory otherwise)
//! 6. Wire the orchestrator and serve the HTTP gateway until ctrl-c
//!
//! ## Wiring
//!
//! ```text
//! HTTP ──→ cs-03-api-gateway ──→ cs-01-chip-verify (orchestrator)
//!                                   │          │
//!                            ChipDirectory  ScanEventSink
//!                                   │          │
//!                            cs-02-chip-registry adapters
//! ```

pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cs_01_chip_verify::{ChipVerificationService, ChipDirectory, ScanEventSink};
use cs_02_chip_registry::{InMemoryChipDirectory, InMemoryScanLog, JsonlScanLog, RegistrySeed};
use cs_03_api_gateway::ApiGatewayService;

use crate::config::{load_config, ServiceConfig};

async fn build_scan_log(config: &ServiceConfig) -> Result<Arc<dyn ScanEventSink>> {
    match &config.scan_log_path {
        Some(path) => {
            let log = JsonlScanLog::open(path)
                .await
                .with_context(|| format!("opening scan log {}", path.display()))?;
            Ok(Arc::new(log))
        }
        None => {
            warn!("no scan log file configured; audit events held in memory only");
            Ok(Arc::new(InMemoryScanLog::new()))
        }
    }
}

fn build_directory(config: &ServiceConfig) -> Result<Arc<InMemoryChipDirectory>> {
    let directory = Arc::new(InMemoryChipDirectory::new());
    if let Some(path) = &config.seed_path {
        let seed = RegistrySeed::load(path)
            .with_context(|| format!("loading registry seed {}", path.display()))?;
        let chips = seed.populate(&directory).context("populating registry")?;
        info!(chips, "registry loaded from seed file");
    } else {
        warn!("no registry seed configured; every scan will classify as invalid");
    }
    Ok(directory)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = load_config();

    // A production deploy must never run with the signature bypass
    if std::env::var("CHIPSEAL_ENV").as_deref() == Ok("production") {
        config.validate_for_production()?;
    }

    let directory = build_directory(&config)?;
    let scan_log = build_scan_log(&config).await?;

    let orchestrator = Arc::new(ChipVerificationService::new(
        Arc::clone(&directory) as Arc<dyn ChipDirectory>,
        scan_log,
        config.verifier.clone(),
        config.gateway.timeouts.collaborator,
    ));

    let gateway = ApiGatewayService::new(config.gateway.clone(), orchestrator)
        .context("building API gateway")?;

    info!("ChipSeal verification service starting");
    gateway.serve(shutdown_signal()).await?;
    info!("ChipSeal verification service stopped");

    Ok(())
}
