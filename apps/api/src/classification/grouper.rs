//! Partitions contact records by resolved department using cached
//! classifications only. Low-confidence and uncached titles land in "other".

use std::collections::HashMap;

use crate::classification::cache::TitleCache;
use crate::classification::{Confidence, OTHER_DEPARTMENT};
use crate::models::contact::ContactRecord;

/// The result of grouping: contacts partitioned by department, plus the
/// titles that could not be resolved (for the user-facing caveat message).
#[derive(Debug, Default)]
pub struct GroupedContacts {
    /// Department name -> contacts, insertion order preserved per department.
    pub groups: HashMap<String, Vec<ContactRecord>>,
    pub ungrouped_titles: Vec<String>,
}

impl GroupedContacts {
    pub fn total_contacts(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Resolves a title against the cache: only a high-confidence entry is
/// trusted; everything else is "other".
pub fn resolve_department(cache: &TitleCache, title: &str) -> String {
    match cache.get(title) {
        Some(result) if result.confidence == Confidence::High => result.department.to_lowercase(),
        _ => OTHER_DEPARTMENT.to_string(),
    }
}

/// Groups contacts by resolved department. Never drops a contact: the sum
/// of group sizes equals the input length.
pub fn group_contacts(records: Vec<ContactRecord>, cache: &TitleCache) -> GroupedContacts {
    let mut grouped = GroupedContacts::default();

    for record in records {
        let department = resolve_department(cache, &record.job_title);
        if department == OTHER_DEPARTMENT {
            grouped.ungrouped_titles.push(record.job_title.clone());
        }
        grouped.groups.entry(department).or_default().push(record);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ClassificationResult;

    fn record(email: &str, job_title: &str) -> ContactRecord {
        ContactRecord {
            email: email.to_string(),
            job_title: job_title.to_string(),
            persona: "decision maker".to_string(),
        }
    }

    fn seed(cache: &TitleCache, title: &str, department: &str, confidence: Confidence) {
        cache.insert(
            title,
            ClassificationResult {
                department: department.to_string(),
                confidence,
                reasoning: "test".to_string(),
            },
        );
    }

    #[test]
    fn test_scenario_mixed_titles() {
        let cache = TitleCache::new(8);
        seed(&cache, "CFO", "finance", Confidence::High);
        seed(&cache, "Software Engineer", "it", Confidence::High);
        // "xyz123" stays uncached and must land in "other".

        let records = vec![
            record("a@example.com", "CFO"),
            record("b@example.com", "Software Engineer"),
            record("c@example.com", "xyz123"),
        ];
        let grouped = group_contacts(records, &cache);

        assert_eq!(grouped.groups["finance"].len(), 1);
        assert_eq!(grouped.groups["it"].len(), 1);
        assert_eq!(grouped.groups[OTHER_DEPARTMENT].len(), 1);
        assert_eq!(grouped.ungrouped_titles, vec!["xyz123".to_string()]);
    }

    #[test]
    fn test_no_contact_is_dropped() {
        let cache = TitleCache::new(8);
        seed(&cache, "CFO", "finance", Confidence::High);

        let records: Vec<_> = (0..7)
            .map(|i| record(&format!("u{i}@example.com"), if i % 2 == 0 { "CFO" } else { "Juggler" }))
            .collect();
        let input_len = records.len();

        let grouped = group_contacts(records, &cache);
        assert_eq!(grouped.total_contacts(), input_len);
    }

    #[test]
    fn test_medium_confidence_is_not_trusted() {
        let cache = TitleCache::new(8);
        seed(&cache, "Consultant", "strategy", Confidence::Medium);

        assert_eq!(resolve_department(&cache, "Consultant"), OTHER_DEPARTMENT);
    }

    #[test]
    fn test_high_confidence_department_is_lowercased() {
        let cache = TitleCache::new(8);
        seed(&cache, "CFO", "Finance", Confidence::High);

        assert_eq!(resolve_department(&cache, "CFO"), "finance");
    }

    #[test]
    fn test_insertion_order_preserved_within_department() {
        let cache = TitleCache::new(8);
        seed(&cache, "CFO", "finance", Confidence::High);
        seed(&cache, "Controller", "finance", Confidence::High);

        let records = vec![
            record("first@example.com", "CFO"),
            record("second@example.com", "Controller"),
            record("third@example.com", "CFO"),
        ];
        let grouped = group_contacts(records, &cache);

        let emails: Vec<_> = grouped.groups["finance"].iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, vec!["first@example.com", "second@example.com", "third@example.com"]);
    }

    #[test]
    fn test_ungrouped_titles_are_recorded_per_occurrence() {
        let cache = TitleCache::new(8);
        let records = vec![record("a@example.com", "Juggler"), record("b@example.com", "Juggler")];
        let grouped = group_contacts(records, &cache);
        assert_eq!(grouped.ungrouped_titles.len(), 2);
    }
}
