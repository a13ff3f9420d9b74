//! The pattern compiler.
//!
//! Turns a merged topic draft into a compiled `Topic`: one case-insensitive
//! matcher per trigger, in trigger insertion order. Trigger text is escaped
//! before compilation, so it always matches literally — "C++" is three
//! characters, not regex syntax.

use crabdesk_core::{KnowledgeError, PlanStep, Topic, VideoLink, topic::title_from_intent};
use regex::{Regex, RegexBuilder};

use crate::merge::TopicDraft;

/// Step label for every topic's synthesized plan.
const PLAN_STEP: &str = "Key actions";
/// Fixed rationale attached to the synthesized plan step.
const PLAN_RATIONALE: &str = "Follow this guidance to address the reported symptom.";

/// Compile matchers for a set of normalized triggers.
///
/// Triggers that are empty are excluded — an empty trigger would compile to
/// an always-true pattern. Order is preserved for the rest.
pub fn compile_patterns(triggers: &[String]) -> Result<Vec<Regex>, KnowledgeError> {
    triggers
        .iter()
        .filter(|t| !t.is_empty())
        .map(|trigger| {
            RegexBuilder::new(&regex::escape(trigger))
                .case_insensitive(true)
                .build()
                .map_err(|e| KnowledgeError::Pattern {
                    trigger: trigger.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Compile one merged draft into an immutable `Topic`.
pub fn compile_topic(draft: TopicDraft) -> Result<Topic, KnowledgeError> {
    let triggers: Vec<String> = draft.triggers.into_iter().filter(|t| !t.is_empty()).collect();
    let patterns = compile_patterns(&triggers)?;

    let categories: Vec<String> = draft.categories.into_iter().collect();
    let plan = vec![PlanStep {
        step: PLAN_STEP.into(),
        rationale: PLAN_RATIONALE.into(),
        focus: categories.clone(),
    }];

    Ok(Topic {
        title: title_from_intent(&draft.intent),
        intent: draft.intent,
        triggers,
        response: draft.response,
        categories,
        video_links: draft
            .video_links
            .into_iter()
            .map(|(label, url)| VideoLink { label, url })
            .collect(),
        plan,
        patterns,
    })
}
