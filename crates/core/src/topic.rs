//! Topic domain types.
//!
//! A `Topic` is the compiled, merged representation of one intent: its
//! response text, its normalized triggers, and one case-insensitive matcher
//! per trigger. Topics are created by the knowledge build pipeline and are
//! immutable afterward.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One step of a topic's structured action plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub step: String,
    pub rationale: String,
    pub focus: Vec<String>,
}

/// A labeled video resource attached to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLink {
    pub label: String,
    pub url: String,
}

/// The compiled representation of one support intent.
///
/// `patterns` holds one compiled matcher per trigger, in trigger insertion
/// order. Patterns are never serialized — the catalog artifact stores the
/// normalized triggers and recompiles on load, so an artifact round-trips to
/// an equivalent catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Unique intent key, stable across merges.
    pub intent: String,

    /// Display title, derived from the intent at compile time.
    pub title: String,

    /// Normalized lowercase trigger phrases, deduplicated, insertion order.
    pub triggers: Vec<String>,

    /// The single chosen response text.
    pub response: String,

    /// Normalized lowercase categories, deduplicated, sorted.
    pub categories: Vec<String>,

    /// Resolved video resources, one URL per normalized label. Serialized
    /// as a label → URL map, in insertion order.
    #[serde(default, with = "video_links_map")]
    pub video_links: Vec<VideoLink>,

    /// Structured action plan surfaced in reply metadata.
    #[serde(default)]
    pub plan: Vec<PlanStep>,

    /// Compiled case-insensitive matchers, one per trigger.
    #[serde(skip)]
    pub patterns: Vec<Regex>,
}

impl Topic {
    /// True if any trigger pattern matches the candidate text.
    ///
    /// Match semantics: unanchored, case-insensitive substring — the trigger
    /// text is a literal, never regex syntax.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Serialize `Vec<VideoLink>` as a JSON map without losing insertion order
/// on the round trip.
mod video_links_map {
    use super::VideoLink;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(links: &[VideoLink], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(links.len()))?;
        for link in links {
            map.serialize_entry(&link.label, &link.url)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<VideoLink>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = Vec<VideoLink>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of label to URL")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut links = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, url)) = access.next_entry::<String, String>()? {
                    links.push(VideoLink { label, url });
                }
                Ok(links)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

/// Derive a display title from an intent key: split on underscores and
/// title-case each word.
pub fn title_from_intent(intent: &str) -> String {
    intent
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The statically configured fallback topic, returned when no trigger
/// matches. Carries no patterns and an empty plan.
pub fn fallback_topic() -> Topic {
    Topic {
        intent: "general-playbook".into(),
        title: "General troubleshooting checklist".into(),
        triggers: Vec::new(),
        response: "Restart the device and gather error details. Once the orchestrator \
                   is online, I can share a richer troubleshooting plan."
            .into(),
        categories: Vec::new(),
        video_links: Vec::new(),
        plan: Vec::new(),
        patterns: Vec::new(),
    }
}
