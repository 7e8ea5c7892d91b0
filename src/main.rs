//! # crsf-link binary
//!
//! Loads the configuration, opens the serial link and runs the transmit
//! loop until Ctrl+C. With no joystick backend wired in it streams
//! neutral channel values, which keeps a valid CRSF stream on the wire.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use crsf_link::config::Config;
use crsf_link::sampler::NeutralSampler;
use crsf_link::scheduler::TransmitScheduler;
use crsf_link::serial::CrsfSerial;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("crsf-link v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;
    info!("loaded configuration from {config_path}");

    let table = config.mapping_table()?;
    info!(mappings = table.len(), rate_hz = config.link.rate_hz, "mapping table ready");
    let (mapping_tx, mapping_rx) = watch::channel(Arc::new(table));

    let port = CrsfSerial::open(&config.general.serial_port, config.general.baud_rate)?;

    // TODO: replace with a real joystick backend reading
    // config.general.joystick_index once one is wired in.
    let sampler = NeutralSampler::new(8, 16, 1);

    let mut scheduler =
        TransmitScheduler::new(sampler, port, mapping_rx, config.scheduler_settings()?);

    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
        }
    }

    let stats = scheduler.stats();
    info!(
        sent = stats.sent,
        failed = stats.failed,
        clamped = stats.clamped,
        "transmit loop stopped"
    );

    // Reconfiguration would swap a new table in through this handle; hold
    // it until the loop has stopped.
    drop(mapping_tx);

    Ok(())
}
