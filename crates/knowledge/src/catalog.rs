//! The topic catalog.
//!
//! The immutable, ordered output of the build pipeline: compiled topics in
//! lexicographic intent order plus one fallback topic. Safe for
//! unsynchronized concurrent reads. Rebuilding requires re-running the
//! pipeline and reloading — there is no mutation API.

use std::fs;
use std::path::Path;

use crabdesk_core::{KnowledgeError, Result, Topic, fallback_topic};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compile::{compile_patterns, compile_topic};
use crate::merge::merge;
use crate::record::RawRecord;

/// Serialized shape of the catalog artifact. Patterns are not stored; they
/// are recompiled from the normalized triggers on load.
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    topics: Vec<Topic>,
    fallback: Topic,
}

/// The compiled topic catalog: ordered topics plus the fallback.
#[derive(Debug, Clone)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
    fallback: Topic,
}

impl TopicCatalog {
    /// Wrap compiled topics with the statically configured fallback.
    /// Topic order is preserved as given — the builder already sorted it.
    pub fn new(topics: Vec<Topic>) -> Self {
        Self {
            topics,
            fallback: fallback_topic(),
        }
    }

    /// Run the full merge + compile pipeline over in-memory record sources.
    /// Source order is significant: it drives response selection and
    /// video-link overwrites.
    pub fn build(sources: &[Vec<RawRecord>]) -> Result<Self> {
        let drafts = merge(sources);
        let topics = drafts
            .into_values()
            .map(compile_topic)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(topics))
    }

    /// Run the pipeline over JSON source files, in the order given.
    ///
    /// A missing file was already filtered out by the caller's source
    /// discovery; an unreadable or unparseable file aborts the whole build
    /// rather than producing a partial catalog.
    pub fn build_from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let raw = fs::read_to_string(path).map_err(|e| KnowledgeError::SourceRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            let records: Vec<RawRecord> =
                serde_json::from_str(&raw).map_err(|e| KnowledgeError::SourceParse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            sources.push(records);
        }

        let catalog = Self::build(&sources)?;
        info!(
            sources = paths.len(),
            intents = catalog.len(),
            "Knowledge base merged"
        );
        Ok(catalog)
    }

    /// Topics in catalog order (lexicographic by intent).
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// The fallback topic returned when nothing matches.
    pub fn fallback(&self) -> &Topic {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// First-match scan in catalog order; the fallback when nothing matches.
    /// The caller passes the already-normalized message.
    pub fn find_match(&self, normalized_message: &str) -> &Topic {
        self.topics
            .iter()
            .find(|topic| topic.matches(normalized_message))
            .unwrap_or(&self.fallback)
    }

    /// Write the catalog artifact as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = CatalogFile {
            topics: self.topics.clone(),
            fallback: self.fallback.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json).map_err(|e| KnowledgeError::CatalogWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), topics = self.len(), "Catalog artifact written");
        Ok(())
    }

    /// Load a catalog artifact and recompile its trigger patterns.
    ///
    /// The result is equivalent to the catalog that produced the artifact:
    /// same topics, same order, same trigger compilation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| KnowledgeError::CatalogRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file: CatalogFile =
            serde_json::from_str(&raw).map_err(|e| KnowledgeError::CatalogParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut topics = file.topics;
        for topic in &mut topics {
            topic.patterns = compile_patterns(&topic.triggers)?;
        }

        Ok(Self {
            topics,
            fallback: file.fallback,
        })
    }
}
