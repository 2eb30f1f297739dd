//! Batch classification: one LLM call per batch of up to 20 titles,
//! returning a title -> classification mapping.
//!
//! The trait is held in `AppState` as `Arc<dyn BatchClassifier>` so the
//! upload pipeline can be exercised with a stub backend in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use crate::classification::prompts::{BATCH_CLASSIFY_PROMPT_HEADER, BATCH_CLASSIFY_SYSTEM};
use crate::classification::ClassificationResult;
use crate::llm_client::{extract_json_object, LlmClient, LlmError};

/// Maximum number of titles sent in one completion request.
pub const BATCH_SIZE: usize = 20;

const BATCH_TEMPERATURE: f32 = 0.3;

/// Classifies a batch of job titles in one upstream call.
///
/// Implementations never return an error: any network or parsing failure
/// yields an empty mapping and the affected titles stay uncached, resolving
/// to "other" downstream until a later upload retries them.
#[async_trait]
pub trait BatchClassifier: Send + Sync {
    async fn classify_batch(&self, titles: &[String]) -> HashMap<String, ClassificationResult>;
}

/// Production classifier backed by the shared [`LlmClient`].
pub struct LlmBatchClassifier {
    llm: LlmClient,
}

impl LlmBatchClassifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl BatchClassifier for LlmBatchClassifier {
    async fn classify_batch(&self, titles: &[String]) -> HashMap<String, ClassificationResult> {
        if titles.is_empty() {
            return HashMap::new();
        }

        let prompt = build_batch_prompt(titles);
        let response = match self.llm.call(&prompt, BATCH_CLASSIFY_SYSTEM, BATCH_TEMPERATURE).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Batch classification call failed for {} titles: {e}", titles.len());
                return HashMap::new();
            }
        };

        let Some(text) = response.text() else {
            warn!("Batch classification returned no text content");
            return HashMap::new();
        };

        match parse_batch_response(text) {
            Ok(mapping) => mapping,
            Err(e) => {
                // Partial results are not salvaged; the whole batch is dropped.
                warn!("Batch classification response did not parse: {e}");
                HashMap::new()
            }
        }
    }
}

fn build_batch_prompt(titles: &[String]) -> String {
    let mut prompt = BATCH_CLASSIFY_PROMPT_HEADER.to_string();
    for title in titles {
        prompt.push_str("- ");
        prompt.push_str(title);
        prompt.push('\n');
    }
    prompt
}

/// Parses the model's batch response: the JSON object between the first `{`
/// and the last `}`, strictly deserialized. Anything else is an error.
pub(crate) fn parse_batch_response(
    text: &str,
) -> Result<HashMap<String, ClassificationResult>, LlmError> {
    let json = extract_json_object(text).ok_or(LlmError::EmptyContent)?;
    Ok(serde_json::from_str(json)?)
}
