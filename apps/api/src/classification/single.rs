//! Single-title classification: keyword table first, then the cache, then
//! one LLM call. Failures of any kind resolve to "other"; nothing here
//! returns an error to the caller.

use serde::Deserialize;
use tracing::warn;

use crate::classification::cache::TitleCache;
use crate::classification::keywords::{keyword_department, known_departments};
use crate::classification::normalize::normalize_title;
use crate::classification::prompts::{CLASSIFY_PROMPT_TEMPLATE, CLASSIFY_SYSTEM};
use crate::classification::{ClassificationResult, Confidence, OTHER_DEPARTMENT};
use crate::llm_client::{LlmClient, LlmError};

/// Minimum string-similarity ratio for accepting a medium-confidence
/// department against the known department list.
pub const FUZZY_THRESHOLD: f64 = 0.8;

const CLASSIFY_TEMPERATURE: f32 = 0.3;

/// Strict shape of the single-title analysis response.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleAnalysis {
    pub department: String,
    pub confidence: Confidence,
    pub reasoning: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// Classifies one job title into a department, lower-cased.
///
/// Keyword hits never touch the network. A cached high-confidence result
/// short-circuits the rest. Otherwise one LLM call is made, the analysis is
/// written back to the cache, and the result is accepted only on high
/// confidence; medium confidence falls back to a fuzzy match against the
/// known department names. Parse or network failures are logged, left
/// uncached so a later request can re-attempt them, and yield "other".
pub async fn classify_title(title: &str, llm: &LlmClient, cache: &TitleCache) -> String {
    if title.trim().is_empty() {
        return OTHER_DEPARTMENT.to_string();
    }

    let normalized = normalize_title(title);
    if let Some(dept) = keyword_department(&normalized) {
        return dept.to_string();
    }

    if let Some(cached) = cache.get(title) {
        if cached.confidence == Confidence::High {
            return cached.department.to_lowercase();
        }
    }

    match analyze_title(title, llm).await {
        Ok(analysis) => {
            cache.insert(
                title,
                ClassificationResult {
                    department: analysis.department.to_lowercase(),
                    confidence: analysis.confidence,
                    reasoning: analysis.reasoning.clone(),
                },
            );
            accept_analysis(&analysis)
        }
        Err(e) => {
            warn!("Title analysis failed for {title:?}: {e}");
            OTHER_DEPARTMENT.to_string()
        }
    }
}

async fn analyze_title(title: &str, llm: &LlmClient) -> Result<TitleAnalysis, LlmError> {
    let prompt = CLASSIFY_PROMPT_TEMPLATE.replace("{title}", title);
    llm.call_json::<TitleAnalysis>(&prompt, CLASSIFY_SYSTEM, CLASSIFY_TEMPERATURE)
        .await
}

/// Applies the confidence gate to an analysis: high is trusted as-is,
/// medium only if it fuzzily names a known department, low is discarded.
pub(crate) fn accept_analysis(analysis: &TitleAnalysis) -> String {
    match analysis.confidence {
        Confidence::High => analysis.department.to_lowercase(),
        Confidence::Medium => fuzzy_department(&analysis.department)
            .unwrap_or(OTHER_DEPARTMENT)
            .to_string(),
        Confidence::Low => OTHER_DEPARTMENT.to_string(),
    }
}

/// Finds the first known department whose name is similar enough to the
/// candidate (normalized Levenshtein ratio above [`FUZZY_THRESHOLD`]).
pub(crate) fn fuzzy_department(candidate: &str) -> Option<&'static str> {
    let candidate = candidate.to_lowercase();
    known_departments()
        .find(|&dept| strsim::normalized_levenshtein(&candidate, dept) > FUZZY_THRESHOLD)
}
