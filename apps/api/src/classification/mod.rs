//! Job-title classification pipeline: normalization, keyword matching,
//! LLM-backed single and batch classification, the shared title cache, and
//! department grouping.

pub mod batch;
pub mod cache;
pub mod grouper;
pub mod handlers;
pub mod keywords;
pub mod normalize;
pub mod prompts;
pub mod single;

use serde::{Deserialize, Serialize};

/// Catch-all department for titles that cannot be classified confidently.
pub const OTHER_DEPARTMENT: &str = "other";

/// Classifier-reported certainty tier. Only `High` results are trusted
/// automatically; anything else resolves to [`OTHER_DEPARTMENT`] downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A classification produced by the LLM (single or batch path), cached by
/// raw title text for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub department: String,
    pub confidence: Confidence,
    pub reasoning: String,
}
