// Persona LLM prompt templates.
// All prompts for the personas module are defined here.

pub const PERSONA_SYSTEM: &str = "\
You are an expert in B2B marketing and buyer persona development.";

pub const DEPARTMENT_PERSONA_SYSTEM: &str = "\
You are an expert in B2B marketing and buyer persona development. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const DEPARTMENT_PERSONA_PROMPT_TEMPLATE: &str = r#"Create a concise B2B buyer persona for the following department:
Department: {department}
Sample Job Titles: {sample_titles}
Number of Contacts: {contact_count}

OUTPUT SCHEMA (return exactly this structure):
{
  "title": "persona title",
  "description": "brief description",
  "key_characteristics": ["three to five short bullet points"]
}

Return ONLY the JSON object — nothing else."#;

pub const ADHOC_PERSONA_PROMPT_TEMPLATE: &str = r#"Create a detailed B2B buyer persona for the following role:
Role: {role}
Industry: {industry}
Company Size: {company_size}

Please include:
1. Demographics
2. Goals and Challenges
3. Pain Points
4. Decision-Making Process
5. Preferred Communication Channels
6. Key Responsibilities
7. Technical Proficiency
8. Buying Criteria
9. Common Objections
10. Success Metrics

Format the response in clear sections with bullet points where appropriate."#;
