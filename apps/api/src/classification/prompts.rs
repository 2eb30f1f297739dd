// Classification LLM prompt templates.
// All prompts for the classification module are defined here.

pub const CLASSIFY_SYSTEM: &str = "\
You are an expert in organizational structure and job role analysis. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Analyze this job title and determine which department it belongs to: "{title}"

Consider:
1. The role's primary function
2. Common industry standards
3. Typical reporting structure
4. Key responsibilities

OUTPUT SCHEMA (return exactly this structure):
{
  "department": "string",
  "confidence": "high" | "medium" | "low",
  "reasoning": "brief explanation",
  "alternatives": ["other plausible departments, if any"]
}

Return ONLY the JSON object — nothing else."#;

pub const BATCH_CLASSIFY_SYSTEM: &str = "\
You are an expert in organizational structure and job role analysis. \
Respond only with one valid JSON object — no markdown fences, no explanations.";

pub const BATCH_CLASSIFY_PROMPT_HEADER: &str = r#"For each of the following job titles, determine the most likely department. Return one JSON object mapping each job title (verbatim, as given) to an object with this exact shape:
{"Job Title": {"department": "string", "confidence": "high" | "medium" | "low", "reasoning": "brief explanation"}}

Every listed title must appear as a key. Return ONLY the JSON object.

Job Titles:
"#;
