//! `crabdesk serve` — Start the HTTP chat server.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use crabdesk_config::AppConfig;
use crabdesk_orchestrator::Orchestrator;

pub async fn run(config_path: Option<&Path>, port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load(config_path).context("failed to load config")?;
    config.ensure_offline();

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let catalog = super::load_catalog(&config)?;
    println!("Crabdesk");
    println!("   Topics:    {}", catalog.len());
    println!(
        "   Listening: {}:{}",
        config.gateway.host, config.gateway.port
    );

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(catalog),
        config.sessions.max_sessions,
    ));

    crabdesk_gateway::start(&config, orchestrator)
        .await
        .map_err(|e| anyhow::anyhow!("gateway failed: {e}"))?;

    Ok(())
}
