//! `crabdesk build` — Run the knowledge pipeline and write the artifact.

use std::path::{Path, PathBuf};

use anyhow::Context;
use crabdesk_config::AppConfig;
use crabdesk_knowledge::TopicCatalog;

pub async fn run(config_path: Option<&Path>, out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path).context("failed to load config")?;

    let sources = config.source_paths()?;
    if sources.is_empty() {
        anyhow::bail!("no knowledge source files found — check [knowledge] in the config");
    }

    let catalog = TopicCatalog::build_from_files(&sources)?;

    let out = out.unwrap_or_else(|| config.knowledge.catalog_path.clone());
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    catalog.save(&out)?;

    println!(
        "Knowledge base merged from {} sources -> {} intents.",
        sources.len(),
        catalog.len()
    );
    println!("Catalog written to {}", out.display());

    Ok(())
}
