//! # Crabdesk Orchestrator
//!
//! The runtime half of the system: given a message and an optional session
//! id, normalize the input, find the first-matching topic in the catalog
//! (or the fallback), assemble the structured reply, and record the
//! exchange in the session.
//!
//! Matching is synchronous and bounded by catalog size × trigger count;
//! there is no I/O on the request path once the catalog is in memory.

pub mod sessions;

use std::sync::Arc;

use crabdesk_core::{ChatOutcome, ReplyMetadata, Result, Role, Topic, normalize};
use crabdesk_knowledge::TopicCatalog;
use tracing::debug;

pub use sessions::SessionStore;

/// Trailing notice appended to every knowledge-base reply.
const OFFLINE_SUFFIX: &str =
    "\n\nOffline knowledge base engaged. Let me know what changes after you try these steps.";

/// Handoff note returned with every matched reply.
const HANDOFF_NOTES: &str = "Offline knowledge is in use. Connect to the internet and add \
                             additional modules later if you want cloud-based reasoning.";

/// Reply for an empty or whitespace-only message.
const PROMPT_REPLY: &str =
    "Tell me what is happening and we will walk through a fix step by step.";
const PROMPT_HEADLINE: &str = "Waiting for details";
const PROMPT_NOTES: &str = "Share symptoms so I can craft a plan.";

/// The matching orchestrator: owns the session store and reads the
/// immutable topic catalog.
pub struct Orchestrator {
    catalog: Arc<TopicCatalog>,
    sessions: SessionStore,
}

impl Orchestrator {
    pub fn new(catalog: Arc<TopicCatalog>, max_sessions: usize) -> Self {
        Self {
            catalog,
            sessions: SessionStore::new(max_sessions),
        }
    }

    /// Handle one conversation turn.
    ///
    /// The session is resolved (or created) first, so even an empty message
    /// yields a usable session id — but the empty-message short circuit
    /// never touches history or the catalog.
    pub async fn handle_message(
        &self,
        session_id: Option<&str>,
        user_message: &str,
    ) -> Result<ChatOutcome> {
        let trimmed = user_message.trim().to_string();
        let normalized = normalize(user_message);

        if normalized.is_empty() {
            let session_id = self.sessions.with_session(session_id, |s| s.id.clone()).await;
            debug!(session = %session_id, "Empty message, prompting for details");
            return Ok(ChatOutcome {
                session_id,
                reply: PROMPT_REPLY.into(),
                metadata: ReplyMetadata {
                    plan_headline: PROMPT_HEADLINE.into(),
                    plan_steps: Vec::new(),
                    handoff_notes: PROMPT_NOTES.into(),
                    used_models: Vec::new(),
                },
            });
        }

        let topic = self.catalog.find_match(&normalized);
        debug!(intent = %topic.intent, "Matched topic");
        let (reply, metadata) = build_reply(topic);

        let session_id = self
            .sessions
            .with_session(session_id, |session| {
                session.push(Role::User, trimmed);
                session.push(Role::Assistant, reply.clone());
                session.last_plan = Some(metadata.plan_steps.clone());
                session.last_notes = Some(metadata.handoff_notes.clone());
                session.id.clone()
            })
            .await;

        Ok(ChatOutcome {
            session_id,
            reply,
            metadata,
        })
    }

    /// Snapshot of one session, if it exists.
    pub async fn session(&self, id: &str) -> Option<crabdesk_core::Session> {
        self.sessions.get(id).await
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.count().await
    }

    /// The catalog this orchestrator matches against.
    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }
}

/// Assemble the reply text and metadata for a matched topic: response, then
/// the video resource list (when present), then the fixed offline notice.
fn build_reply(topic: &Topic) -> (String, ReplyMetadata) {
    let mut reply = topic.response.clone();

    if !topic.video_links.is_empty() {
        let rendered = topic
            .video_links
            .iter()
            .map(|link| format!("{} - {}", link.label, link.url))
            .collect::<Vec<_>>()
            .join(" | ");
        reply.push_str("\n\nVideo resources: ");
        reply.push_str(&rendered);
    }

    reply.push_str(OFFLINE_SUFFIX);

    let metadata = ReplyMetadata {
        plan_headline: topic.title.clone(),
        plan_steps: topic.plan.clone(),
        handoff_notes: HANDOFF_NOTES.into(),
        used_models: Vec::new(),
    };

    (reply, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crabdesk_knowledge::RawRecord;
    use serde_json::json;

    fn test_orchestrator() -> Orchestrator {
        let records: Vec<RawRecord> = serde_json::from_value(json!([
            {
                "intent": "printer_jam",
                "triggers": ["paper jam"],
                "response": "Open the tray and clear the jam.",
                "categories": ["hardware"]
            },
            {
                "intent": "wifi_down",
                "triggers": ["no wifi", "wifi is down"],
                "response": "Restart the router.",
                "categories": ["network"],
                "video_links": { "Router basics": "https://example.com/router" }
            }
        ]))
        .unwrap();
        let catalog = TopicCatalog::build(&[records]).unwrap();
        Orchestrator::new(Arc::new(catalog), 64)
    }

    #[tokio::test]
    async fn matched_reply_carries_topic_response_and_notice() {
        let orch = test_orchestrator();
        let outcome = orch.handle_message(None, "help, my wifi is down").await.unwrap();

        assert!(outcome.reply.starts_with("Restart the router."));
        assert!(outcome.reply.contains("Video resources: Router basics - https://example.com/router"));
        assert!(outcome.reply.ends_with("Let me know what changes after you try these steps."));
        assert_eq!(outcome.metadata.plan_headline, "Wifi Down");
        assert_eq!(outcome.metadata.plan_steps.len(), 1);
        assert!(outcome.metadata.used_models.is_empty());
    }

    #[tokio::test]
    async fn history_records_user_and_assistant_adjacently() {
        let orch = test_orchestrator();
        let outcome = orch.handle_message(None, "  paper jam again  ").await.unwrap();

        let session = orch.session(&outcome.session_id).await.unwrap();
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].role, Role::User);
        // Raw trimmed message, not the normalized form
        assert_eq!(session.history[0].content, "paper jam again");
        assert_eq!(session.history[1].role, Role::Assistant);
        assert_eq!(session.history[1].content, outcome.reply);
        assert_eq!(session.last_plan.as_ref().unwrap().len(), 1);
        assert!(session.last_notes.is_some());
    }

    #[tokio::test]
    async fn empty_message_short_circuits_without_touching_history() {
        let orch = test_orchestrator();
        let outcome = orch.handle_message(None, "   \u{00A0} ").await.unwrap();

        assert_eq!(outcome.reply, PROMPT_REPLY);
        assert_eq!(outcome.metadata.plan_headline, "Waiting for details");
        assert!(outcome.metadata.plan_steps.is_empty());

        let session = orch.session(&outcome.session_id).await.unwrap();
        assert!(session.history.is_empty());
        assert!(session.last_plan.is_none());
    }

    #[tokio::test]
    async fn unmatched_message_falls_back_and_still_records_history() {
        let orch = test_orchestrator();
        let outcome = orch
            .handle_message(None, "my toaster is haunted")
            .await
            .unwrap();

        assert!(outcome.reply.starts_with("Restart the device and gather error details."));
        assert_eq!(outcome.metadata.plan_headline, "General troubleshooting checklist");
        assert!(outcome.metadata.plan_steps.is_empty());

        let session = orch.session(&outcome.session_id).await.unwrap();
        assert_eq!(session.history.len(), 2);
    }

    #[tokio::test]
    async fn overlapping_triggers_resolve_by_catalog_order() {
        // Message matches both topics; printer_jam precedes wifi_down
        // lexicographically, so it wins.
        let records: Vec<RawRecord> = serde_json::from_value(json!([
            { "intent": "wifi_down", "triggers": ["everything is broken"], "response": "wifi" },
            { "intent": "printer_jam", "triggers": ["everything is broken"], "response": "printer" }
        ]))
        .unwrap();
        let catalog = TopicCatalog::build(&[records]).unwrap();
        let orch = Orchestrator::new(Arc::new(catalog), 64);

        let outcome = orch
            .handle_message(None, "everything is broken today")
            .await
            .unwrap();
        assert_eq!(outcome.metadata.plan_headline, "Printer Jam");
    }

    #[tokio::test]
    async fn missing_session_id_produces_independent_sessions() {
        let orch = test_orchestrator();
        let a = orch.handle_message(None, "my wifi is down").await.unwrap();
        let b = orch.handle_message(None, "my wifi is down").await.unwrap();

        assert_ne!(a.session_id, b.session_id);
        assert_eq!(orch.session_count().await, 2);
        assert_eq!(orch.session(&a.session_id).await.unwrap().history.len(), 2);
        assert_eq!(orch.session(&b.session_id).await.unwrap().history.len(), 2);
    }

    #[tokio::test]
    async fn reusing_session_id_appends_to_the_same_history() {
        let orch = test_orchestrator();
        let first = orch.handle_message(None, "no wifi").await.unwrap();
        let second = orch
            .handle_message(Some(&first.session_id), "paper jam")
            .await
            .unwrap();

        assert_eq!(first.session_id, second.session_id);
        let session = orch.session(&first.session_id).await.unwrap();
        assert_eq!(session.history.len(), 4);
        // Most recent plan reflects the latest topic
        assert_eq!(
            session.last_plan.as_ref().unwrap()[0].focus,
            vec!["hardware"]
        );
    }

    #[tokio::test]
    async fn smart_punctuation_in_message_still_matches() {
        let orch = test_orchestrator();
        // U+2019 apostrophe and NBSP fold away before matching
        let outcome = orch
            .handle_message(None, "wifi\u{00A0}is down, it\u{2019}s hopeless")
            .await
            .unwrap();
        assert_eq!(outcome.metadata.plan_headline, "Wifi Down");
    }
}
