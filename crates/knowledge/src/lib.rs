//! # Crabdesk Knowledge
//!
//! The build-time pipeline that turns heterogeneous raw JSON records into
//! the canonical topic catalog:
//!
//! raw sources → normalize → merge (one draft per intent) → compile
//! (case-insensitive literal matchers) → [`TopicCatalog`].
//!
//! The pipeline is a one-shot batch operation. The resulting catalog is
//! immutable and can be serialized to a JSON artifact so the runtime starts
//! without re-running the merge.

pub mod catalog;
pub mod compile;
pub mod merge;
pub mod record;

pub use catalog::TopicCatalog;
pub use compile::{compile_patterns, compile_topic};
pub use merge::{TopicDraft, merge};
pub use record::RawRecord;
