//! Raw knowledge source records.
//!
//! One `RawRecord` per source entry. Records are ephemeral: they exist only
//! long enough to be merged into topic drafts. Sources are hand-authored, so
//! every field except `intent` tolerates absence.

use crabdesk_core::normalize;
use serde::Deserialize;
use serde_json::Value;

/// A single entry from one JSON knowledge source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    /// Topic key. A record without one is dropped during the merge.
    #[serde(default)]
    pub intent: Option<String>,

    /// Raw trigger phrases.
    #[serde(default)]
    pub triggers: Option<Vec<String>>,

    /// Response text.
    #[serde(default)]
    pub response: Option<String>,

    /// Raw category labels.
    #[serde(default)]
    pub categories: Option<Vec<String>>,

    /// Label → link value. A value is either a plain URL string or an object
    /// carrying `url` (preferred) or `playlist`.
    #[serde(default)]
    pub video_links: Option<serde_json::Map<String, Value>>,
}

/// Resolve one video-link value to a normalized URL.
///
/// Plain strings are the URL directly; objects use `url`, falling back to
/// `playlist` when `url` is absent or not a string. Empty or unparseable
/// values resolve to `None` and are dropped.
pub fn resolve_video_link(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => match obj.get("url").and_then(Value::as_str) {
            Some(url) => url,
            None => obj.get("playlist").and_then(Value::as_str)?,
        },
        _ => return None,
    };

    let link = normalize(raw);
    if link.is_empty() { None } else { Some(link) }
}
