//! Slide QA - question/answer resolution for lesson content identifiers.
//!
//! Given a filename-like identifier ("01 r a What Colour is the Banana") and
//! optional book/unit context, produces a question, a full-sentence answer,
//! a region or category label, and the strategy that produced them.
//! Resolution is synchronous and never fails; a blank record means there is
//! nothing to show.

pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod heuristics;
pub mod knowledge;
pub mod normalizer;
pub mod resolver;
pub mod title_parse;
pub mod types;

pub use classifier::{ContentClassifier, ContentTag};
pub use config::ResolverConfig;
pub use error::{QaError, Result};
pub use extract::ExtractedEntities;
pub use knowledge::KnowledgeTables;
pub use normalizer::normalize_answer;
pub use resolver::{resolve, Resolver};
pub use types::*;
