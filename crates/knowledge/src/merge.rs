//! The knowledge merger.
//!
//! Folds N raw record sources into one draft per intent. Sources are
//! processed in caller order and records in file order; that order only
//! matters for response selection and video-link overwrites. Trigger and
//! category sets are order-insensitive within a record.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crabdesk_core::normalize;
use tracing::debug;

use crate::record::{RawRecord, resolve_video_link};

/// A topic under construction during the merge pass.
#[derive(Debug, Clone, Default)]
pub struct TopicDraft {
    pub intent: String,
    /// Normalized lowercase triggers, unique, insertion order preserved.
    pub triggers: Vec<String>,
    /// The longest normalized response seen so far.
    pub response: String,
    /// Normalized lowercase categories.
    pub categories: BTreeSet<String>,
    /// Normalized label → resolved URL. Insertion order preserved; a label
    /// seen again keeps its position but takes the newer URL.
    pub video_links: Vec<(String, String)>,
}

impl TopicDraft {
    fn new(intent: &str) -> Self {
        Self {
            intent: intent.to_string(),
            ..Self::default()
        }
    }

    fn absorb(&mut self, record: &RawRecord) {
        for trigger in record.triggers.iter().flatten() {
            // Lowercase before normalizing so the folded ASCII markers
            // (TM, (R)) come out the same as at build time.
            let norm = normalize(&trigger.to_lowercase());
            if !norm.is_empty() && !self.triggers.contains(&norm) {
                self.triggers.push(norm);
            }
        }

        // Keep the longest normalized response; strict `>` so the first one
        // wins on an exact length tie, and an empty response never overwrites.
        if let Some(response) = &record.response {
            let norm = normalize(response);
            if !norm.is_empty() && norm.chars().count() > self.response.chars().count() {
                self.response = norm;
            }
        }

        for category in record.categories.iter().flatten() {
            let norm = normalize(category);
            if !norm.is_empty() {
                self.categories.insert(norm.to_lowercase());
            }
        }

        for (label, value) in record.video_links.iter().flatten() {
            let norm_label = normalize(label);
            if norm_label.is_empty() {
                continue;
            }
            let Some(url) = resolve_video_link(value) else {
                continue;
            };
            // Last source to supply a label wins — overwrite, not merge.
            match self.video_links.iter_mut().find(|(l, _)| *l == norm_label) {
                Some(slot) => slot.1 = url,
                None => self.video_links.push((norm_label, url)),
            }
        }
    }
}

/// Merge record sources into drafts keyed by intent.
///
/// Records with a missing or empty intent are skipped silently. The returned
/// map iterates in lexicographic intent order — the catalog order that later
/// serves as the match tie-break.
pub fn merge(sources: &[Vec<RawRecord>]) -> BTreeMap<String, TopicDraft> {
    let mut drafts: BTreeMap<String, TopicDraft> = BTreeMap::new();

    for records in sources {
        for record in records {
            let Some(intent) = record.intent.as_deref() else {
                continue;
            };
            if intent.is_empty() {
                debug!("Skipping record with empty intent");
                continue;
            }

            drafts
                .entry(intent.to_string())
                .or_insert_with(|| TopicDraft::new(intent))
                .absorb(record);
        }
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn skips_records_without_intent() {
        let drafts = merge(&[vec![
            record(json!({ "triggers": ["orphan"] })),
            record(json!({ "intent": "", "triggers": ["also orphan"] })),
            record(json!({ "intent": "wifi_down", "triggers": ["no wifi"] })),
        ]]);
        assert_eq!(drafts.len(), 1);
        assert!(drafts.contains_key("wifi_down"));
    }

    #[test]
    fn merges_same_intent_across_sources() {
        let first = vec![record(json!({
            "intent": "wifi_down",
            "triggers": ["no wifi", "internet down"],
            "response": "Restart the router.",
            "categories": ["Network"]
        }))];
        let second = vec![record(json!({
            "intent": "wifi_down",
            "triggers": ["no internet", "no wifi"],
            "response": "Restart the router and wait 30 seconds before reconnecting.",
            "categories": ["network", "Connectivity"]
        }))];

        let drafts = merge(&[first, second]);
        let draft = &drafts["wifi_down"];

        assert_eq!(draft.triggers, vec!["no wifi", "internet down", "no internet"]);
        assert_eq!(
            draft.response,
            "Restart the router and wait 30 seconds before reconnecting."
        );
        assert_eq!(
            draft.categories.iter().cloned().collect::<Vec<_>>(),
            vec!["connectivity", "network"]
        );
    }

    #[test]
    fn response_tie_keeps_first() {
        let drafts = merge(&[
            vec![record(json!({ "intent": "a", "response": "first answer" }))],
            vec![record(json!({ "intent": "a", "response": "other answer" }))],
        ]);
        // Same length — strict `>` keeps the earlier one.
        assert_eq!(drafts["a"].response, "first answer");
    }

    #[test]
    fn empty_response_never_overwrites() {
        let drafts = merge(&[
            vec![record(json!({ "intent": "a", "response": "keep me" }))],
            vec![record(json!({ "intent": "a", "response": "   " }))],
        ]);
        assert_eq!(drafts["a"].response, "keep me");
    }

    #[test]
    fn video_links_last_write_wins_per_label() {
        let drafts = merge(&[
            vec![record(json!({
                "intent": "a",
                "video_links": {
                    "Setup guide": "https://example.com/old",
                    "Deep dive": { "playlist": "https://example.com/deep" }
                }
            }))],
            vec![record(json!({
                "intent": "a",
                "video_links": { "Setup guide": { "url": "https://example.com/new" } }
            }))],
        ]);

        let links = &drafts["a"].video_links;
        assert_eq!(links.len(), 2);
        assert!(links.contains(&("Setup guide".into(), "https://example.com/new".into())));
        assert!(links.contains(&("Deep dive".into(), "https://example.com/deep".into())));
    }

    #[test]
    fn triggers_normalize_and_dedupe() {
        let drafts = merge(&[vec![record(json!({
            "intent": "a",
            "triggers": ["  No   WiFi ", "no wifi", "", "   "]
        }))]]);
        assert_eq!(drafts["a"].triggers, vec!["no wifi"]);
    }

    #[test]
    fn drafts_iterate_in_lexicographic_intent_order() {
        let drafts = merge(&[vec![
            record(json!({ "intent": "zebra" })),
            record(json!({ "intent": "apple" })),
            record(json!({ "intent": "mango" })),
        ]]);
        let order: Vec<&str> = drafts.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["apple", "mango", "zebra"]);
    }
}
