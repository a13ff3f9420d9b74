//! CLI subcommand implementations.

pub mod build;
pub mod chat;
pub mod serve;

use anyhow::Context;
use crabdesk_config::AppConfig;
use crabdesk_knowledge::TopicCatalog;
use tracing::warn;

/// Load the compiled catalog: prefer the artifact, fall back to running the
/// build pipeline over the configured sources.
pub fn load_catalog(config: &AppConfig) -> anyhow::Result<TopicCatalog> {
    if config.knowledge.catalog_path.exists() {
        return TopicCatalog::load(&config.knowledge.catalog_path)
            .context("failed to load catalog artifact");
    }

    warn!(
        path = %config.knowledge.catalog_path.display(),
        "Catalog artifact not found, building from sources"
    );
    let sources = config.source_paths()?;
    TopicCatalog::build_from_files(&sources).context("failed to build catalog from sources")
}
