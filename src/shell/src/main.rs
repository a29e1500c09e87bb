use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use esp32_panel::{http_client, AppConfig, Shell};
use esp32_panel_core::{events::SessionEvent, Event};
use log::{error, info};
use std::io::Write;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

fn initialize() {
    log_panics::init();

    // the panel owns stdout, logs go to stderr
    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("info"))
    } else {
        Builder::from_env(Env::default().default_filter_or("warn"))
    };

    builder.format(|f, record| writeln!(f, "[{}] {}", record.level(), record.args()));
    builder.target(Target::Stderr).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(
        "device {} (poll every {} ms, reconnect after {} ms)",
        config.device_address, config.timings.poll_interval_ms, config.timings.reconnect_delay_ms
    );

    let client = http_client::device_client(config.http_timeout)?;
    let mut shell = Shell::new(client, Box::new(std::io::stdout()));

    shell.dispatch(Event::Session(SessionEvent::SetTimings(config.timings)));
    shell.dispatch(Event::Session(SessionEvent::SetDeviceAddress {
        address: config.device_address,
    }));

    shell.run().await?;

    info!("shutting down");
    Ok(())
}
