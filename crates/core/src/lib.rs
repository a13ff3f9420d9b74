//! # Crabdesk Core
//!
//! Domain types, errors, and text normalization for the Crabdesk offline
//! support assistant. This crate has **zero framework dependencies** — it
//! defines the value objects that the knowledge pipeline, the orchestrator,
//! and the gateway all share.
//!
//! ## Design Philosophy
//!
//! The build pipeline (merge + compile) and the runtime (match + session)
//! exchange data only through the types defined here. Implementations live
//! in their respective crates, so the dependency graph stays inward-facing.

pub mod chat;
pub mod error;
pub mod normalize;
pub mod session;
pub mod topic;

// Re-export key types at crate root for ergonomics
pub use chat::{ChatOutcome, ChatRequest, ReplyMetadata};
pub use error::{Error, KnowledgeError, Result};
pub use normalize::normalize;
pub use session::{HistoryEntry, Role, Session};
pub use topic::{PlanStep, Topic, VideoLink, fallback_topic};
