//! Configuration loading and validation for Crabdesk.
//!
//! Loads `crabdesk.toml` (or a caller-supplied path) with environment
//! variable overrides, and validates all settings at startup. Missing file
//! means defaults — the assistant runs out of the box.

use std::fs;
use std::path::{Path, PathBuf};

use crabdesk_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The root configuration structure. Maps directly to `crabdesk.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Offline-only mode. Cloud reasoning is not available in this build;
    /// `ensure_offline` forces this back on if someone turns it off.
    #[serde(default = "default_true")]
    pub offline_only: bool,

    /// Gateway (HTTP transport) settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Knowledge source and catalog artifact settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Session store settings
    #[serde(default)]
    pub sessions: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            offline_only: true,
            gateway: GatewayConfig::default(),
            knowledge: KnowledgeConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Primary source files, merged in this order. Missing files are
    /// skipped silently — sources are hand-authored and optional.
    #[serde(default = "default_sources")]
    pub sources: Vec<PathBuf>,

    /// Optional directory of extra `*.json` note sources, appended after
    /// the primary sources in sorted filename order.
    #[serde(default = "default_notes_dir")]
    pub notes_dir: Option<PathBuf>,

    /// Where the compiled catalog artifact is written and loaded from.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            notes_dir: default_notes_dir(),
            catalog_path: default_catalog_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session store cap; the oldest session is evicted past this.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}
fn default_sources() -> Vec<PathBuf> {
    vec![
        PathBuf::from("tech_support_knowledgebase.json"),
        PathBuf::from("tech_support_knowledgebase_links.json"),
    ]
}
fn default_notes_dir() -> Option<PathBuf> {
    Some(PathBuf::from("knowledge_notes"))
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/offline-knowledge.json")
}
fn default_max_sessions() -> usize {
    1024
}

impl AppConfig {
    /// Load configuration: file (when present) → env overrides → validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new("crabdesk.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&raw).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {e}", path.display()),
        })
    }

    /// Apply `CRABDESK_*` environment overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CRABDESK_HOST") {
            self.gateway.host = host;
        }
        if let Ok(port) = std::env::var("CRABDESK_PORT")
            && let Ok(port) = port.parse()
        {
            self.gateway.port = port;
        }
        if let Ok(value) = std::env::var("CRABDESK_OFFLINE_ONLY") {
            self.offline_only = parse_bool(&value);
        }
        if let Ok(cap) = std::env::var("CRABDESK_MAX_SESSIONS")
            && let Ok(cap) = cap.parse()
        {
            self.sessions.max_sessions = cap;
        }
    }

    /// Validate settings; called once at startup.
    pub fn validate(&self) -> Result<()> {
        if self.gateway.port == 0 {
            return Err(Error::Config {
                message: "gateway.port must be non-zero".into(),
            });
        }
        if self.sessions.max_sessions == 0 {
            return Err(Error::Config {
                message: "sessions.max_sessions must be at least 1".into(),
            });
        }
        if self.knowledge.sources.is_empty() && self.knowledge.notes_dir.is_none() {
            return Err(Error::Config {
                message: "knowledge.sources is empty and no notes_dir is configured".into(),
            });
        }
        Ok(())
    }

    /// Cloud reasoning is not available: force offline mode back on,
    /// warning when the config tried to disable it.
    pub fn ensure_offline(&mut self) {
        if !self.offline_only {
            warn!(
                "Cloud model mode is not available. The assistant will continue in \
                 offline knowledge mode."
            );
            self.offline_only = true;
        }
    }

    /// Resolve the source files to merge, in merge order: configured
    /// sources that exist, then the notes directory's `*.json` files in
    /// sorted filename order.
    pub fn source_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = self
            .knowledge
            .sources
            .iter()
            .filter(|p| p.exists())
            .cloned()
            .collect();

        if let Some(notes_dir) = &self.knowledge.notes_dir
            && notes_dir.is_dir()
        {
            let mut notes: Vec<PathBuf> = fs::read_dir(notes_dir)
                .map_err(|e| Error::Config {
                    message: format!("failed to read {}: {e}", notes_dir.display()),
                })?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
                })
                .collect();
            notes.sort();
            paths.extend(notes);
        }

        Ok(paths)
    }
}

/// Parse a boolean environment value the permissive way: `1`, `true`,
/// `yes`, and `on` (any case) are true, everything else is false.
fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
