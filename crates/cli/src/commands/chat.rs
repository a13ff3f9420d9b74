//! `crabdesk chat` — Send one message through the orchestrator.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use crabdesk_config::AppConfig;
use crabdesk_orchestrator::Orchestrator;

pub async fn run(config_path: Option<&Path>, message: &str) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path).context("failed to load config")?;

    let catalog = super::load_catalog(&config)?;
    let orchestrator = Orchestrator::new(Arc::new(catalog), config.sessions.max_sessions);

    let outcome = orchestrator
        .handle_message(None, message)
        .await
        .map_err(|e| anyhow::anyhow!("chat failed: {e}"))?;

    println!("{}", outcome.reply);
    println!();
    println!("Plan: {}", outcome.metadata.plan_headline);
    for step in &outcome.metadata.plan_steps {
        println!("  - {} ({})", step.step, step.focus.join(", "));
    }

    Ok(())
}
