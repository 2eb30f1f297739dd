//! Persona synthesis: one LLM call per qualifying department, with a
//! deterministic fallback persona when the call fails. Personas are derived
//! on demand and never persisted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{LlmClient, LlmError};
use crate::personas::prompts::{DEPARTMENT_PERSONA_PROMPT_TEMPLATE, DEPARTMENT_PERSONA_SYSTEM};

/// Departments with fewer contacts than this never receive a persona.
pub const MIN_CONTACTS: usize = 5;
/// Hard cap on personas per synthesis run, fallbacks included.
pub const MAX_PERSONAS: usize = 5;

const SAMPLE_TITLES: usize = 3;
const PERSONA_TEMPERATURE: f32 = 0.7;

/// A synthesized descriptive profile of a department's typical contact.
#[derive(Debug, Clone, Serialize)]
pub struct Persona {
    pub department: String,
    pub contact_count: usize,
    pub sample_titles: Vec<String>,
    pub title: String,
    pub description: String,
    pub key_characteristics: Vec<String>,
}

/// Strict shape of the persona synthesis response.
#[derive(Debug, Deserialize)]
struct PersonaDraft {
    title: String,
    description: String,
    #[serde(default)]
    key_characteristics: Vec<String>,
}

/// Synthesizes up to [`MAX_PERSONAS`] personas, largest departments first.
/// An LLM failure substitutes the fallback persona rather than skipping the
/// department.
pub async fn suggest_personas(
    department_titles: &HashMap<String, Vec<String>>,
    llm: &LlmClient,
) -> Vec<Persona> {
    let mut personas = Vec::new();

    for (department, titles) in select_candidates(department_titles) {
        let sample: Vec<String> = titles.iter().take(SAMPLE_TITLES).cloned().collect();
        let persona = match draft_persona(department, &sample, titles.len(), llm).await {
            Ok(draft) => Persona {
                department: department.to_string(),
                contact_count: titles.len(),
                sample_titles: sample,
                title: draft.title,
                description: draft.description,
                key_characteristics: draft.key_characteristics,
            },
            Err(e) => {
                warn!("Persona synthesis failed for department {department:?}: {e}");
                fallback_persona(department, titles.len(), sample)
            }
        };
        personas.push(persona);
    }

    personas
}

/// Departments eligible for a persona: at least [`MIN_CONTACTS`] contacts,
/// ordered by descending contact count (name as the deterministic
/// tie-break), capped at [`MAX_PERSONAS`]. Because every candidate yields
/// exactly one persona (drafted or fallback), the cap here bounds the
/// output.
pub(crate) fn select_candidates(
    department_titles: &HashMap<String, Vec<String>>,
) -> Vec<(&str, &Vec<String>)> {
    let mut candidates: Vec<(&str, &Vec<String>)> = department_titles
        .iter()
        .filter(|(_, titles)| titles.len() >= MIN_CONTACTS)
        .map(|(department, titles)| (department.as_str(), titles))
        .collect();

    candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
    candidates.truncate(MAX_PERSONAS);
    candidates
}

async fn draft_persona(
    department: &str,
    sample_titles: &[String],
    contact_count: usize,
    llm: &LlmClient,
) -> Result<PersonaDraft, LlmError> {
    let prompt = DEPARTMENT_PERSONA_PROMPT_TEMPLATE
        .replace("{department}", department)
        .replace("{sample_titles}", &sample_titles.join(", "))
        .replace("{contact_count}", &contact_count.to_string());

    llm.call_json::<PersonaDraft>(&prompt, DEPARTMENT_PERSONA_SYSTEM, PERSONA_TEMPERATURE)
        .await
}

/// Deterministic stand-in when synthesis fails.
pub(crate) fn fallback_persona(department: &str, contact_count: usize, sample_titles: Vec<String>) -> Persona {
    Persona {
        title: format!("The {} Leader", title_case(department)),
        description: format!("Senior decision maker in {department} with {contact_count} contacts"),
        department: department.to_string(),
        contact_count,
        sample_titles,
        key_characteristics: vec![],
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().to_string() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Title {i}")).collect()
    }

    #[test]
    fn test_small_departments_are_excluded() {
        let map = HashMap::from([
            ("finance".to_string(), titles(4)),
            ("it".to_string(), titles(5)),
        ]);
        let candidates = select_candidates(&map);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].0, "it");
    }

    #[test]
    fn test_candidates_sorted_by_descending_count() {
        let map = HashMap::from([
            ("finance".to_string(), titles(6)),
            ("it".to_string(), titles(9)),
            ("sales".to_string(), titles(7)),
        ]);
        let order: Vec<&str> = select_candidates(&map).iter().map(|(d, _)| *d).collect();
        assert_eq!(order, vec!["it", "sales", "finance"]);
    }

    #[test]
    fn test_candidates_capped_at_max_personas() {
        let map: HashMap<String, Vec<String>> = (0..8)
            .map(|i| (format!("department-{i}"), titles(5 + i)))
            .collect();
        assert_eq!(select_candidates(&map).len(), MAX_PERSONAS);
    }

    #[test]
    fn test_tie_break_is_department_name() {
        let map = HashMap::from([
            ("sales".to_string(), titles(6)),
            ("finance".to_string(), titles(6)),
        ]);
        let order: Vec<&str> = select_candidates(&map).iter().map(|(d, _)| *d).collect();
        assert_eq!(order, vec!["finance", "sales"]);
    }

    #[test]
    fn test_fallback_persona_shape() {
        let persona = fallback_persona("finance", 12, vec!["CFO".to_string()]);
        assert_eq!(persona.title, "The Finance Leader");
        assert_eq!(persona.description, "Senior decision maker in finance with 12 contacts");
        assert_eq!(persona.contact_count, 12);
        assert!(persona.key_characteristics.is_empty());
    }

    #[test]
    fn test_fallback_title_cases_multiword_departments() {
        let persona = fallback_persona("customer success", 8, vec![]);
        assert_eq!(persona.title, "The Customer Success Leader");
    }

    #[tokio::test]
    async fn test_no_qualifying_departments_yields_no_personas() {
        // Every department is below the threshold, so no LLM call is made
        // and the junk key is safe.
        let llm = LlmClient::new("test-key".to_string());
        let map = HashMap::from([("finance".to_string(), titles(2))]);
        assert!(suggest_personas(&map, &llm).await.is_empty());
    }
}
