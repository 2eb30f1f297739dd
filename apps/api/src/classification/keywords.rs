//! Keyword-table department matching. First match wins; table order is the
//! tie-break, so 'cto' resolves to IT even though product lists it too.

/// Ordered department -> keyword table. Matching iterates in declaration
/// order and returns the first department with a keyword substring hit
/// against the normalized title.
pub const DEPARTMENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("finance", &["finance", "accounting", "controller", "cfo", "treasurer", "audit"]),
    ("it", &["it", "technology", "software", "systems", "infrastructure", "cio", "cto"]),
    ("marketing", &["marketing", "brand", "communications", "growth", "digital", "cmo"]),
    ("hr", &["hr", "human resources", "people", "talent", "recruitment", "chro"]),
    ("operations", &["operations", "procurement", "supply chain", "logistics"]),
    ("sales", &["sales", "business development", "account executive", "cso"]),
    ("product", &["product", "development", "engineering", "r&d", "cto"]),
    ("executive", &["ceo", "president", "founder", "owner", "managing director"]),
    ("legal", &["legal", "compliance", "regulatory", "general counsel"]),
    ("strategy", &["strategy", "business development", "corporate development"]),
];

/// Returns the first department whose keyword list contains a substring
/// match against the normalized title, or `None` when unresolved (the
/// caller then proceeds to the LLM classifier).
pub fn keyword_department(normalized_title: &str) -> Option<&'static str> {
    if normalized_title.is_empty() {
        return None;
    }
    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| normalized_title.contains(kw)))
        .map(|(dept, _)| *dept)
}

/// The ordered list of known department names, used by the
/// medium-confidence fuzzy fallback.
pub fn known_departments() -> impl Iterator<Item = &'static str> {
    DEPARTMENT_KEYWORDS.iter().map(|(dept, _)| *dept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::normalize::normalize_title;

    #[test]
    fn test_cfo_resolves_to_finance() {
        assert_eq!(keyword_department(&normalize_title("CFO")), Some("finance"));
    }

    #[test]
    fn test_software_engineer_resolves_to_it() {
        // "software" hits the IT list before "engineering" hits product.
        assert_eq!(
            keyword_department(&normalize_title("Software Engineer")),
            Some("it")
        );
    }

    #[test]
    fn test_unknown_title_is_unresolved() {
        assert_eq!(keyword_department(&normalize_title("xyz123")), None);
    }

    #[test]
    fn test_empty_title_is_unresolved() {
        assert_eq!(keyword_department(""), None);
    }

    #[test]
    fn test_table_order_breaks_ties() {
        // 'cto' appears under both it and product; the earlier entry wins.
        assert_eq!(keyword_department(&normalize_title("CTO")), Some("it"));
    }

    #[test]
    fn test_matching_is_deterministic_across_calls() {
        let normalized = normalize_title("VP Marketing");
        let first = keyword_department(&normalized);
        for _ in 0..10 {
            assert_eq!(keyword_department(&normalized), first);
        }
        assert_eq!(first, Some("marketing"));
    }

    #[test]
    fn test_known_departments_preserve_table_order() {
        let departments: Vec<_> = known_departments().collect();
        assert_eq!(departments.first(), Some(&"finance"));
        assert_eq!(departments.last(), Some(&"strategy"));
        assert_eq!(departments.len(), DEPARTMENT_KEYWORDS.len());
    }
}
