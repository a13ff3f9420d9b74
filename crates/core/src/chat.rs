//! Request/response shapes for one turn of conversation.
//!
//! These are the wire types the transport collaborator exchanges with the
//! orchestrator. Field names serialize camelCase to match the public API.

use serde::{Deserialize, Serialize};

use crate::topic::PlanStep;

/// An incoming chat turn: an optional existing session id plus the raw
/// user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Structured metadata returned alongside every reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMetadata {
    pub plan_headline: String,
    pub plan_steps: Vec<PlanStep>,
    pub handoff_notes: String,
    /// Always empty: there is no generative model in offline mode. The field
    /// exists for interface compatibility with a richer mode.
    pub used_models: Vec<String>,
}

/// The orchestrator's answer to one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatOutcome {
    pub session_id: String,
    pub reply: String,
    pub metadata: ReplyMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_tolerates_missing_session_id() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"help"}"#).unwrap();
        assert!(req.session_id.is_none());
        assert_eq!(req.message, "help");
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let outcome = ChatOutcome {
            session_id: "s-1".into(),
            reply: "Restart the router.".into(),
            metadata: ReplyMetadata {
                plan_headline: "Wifi Down".into(),
                plan_steps: Vec::new(),
                handoff_notes: "note".into(),
                used_models: Vec::new(),
            },
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["sessionId"], "s-1");
        assert_eq!(json["metadata"]["planHeadline"], "Wifi Down");
        assert!(json["metadata"]["usedModels"].as_array().unwrap().is_empty());
    }
}
