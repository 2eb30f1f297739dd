//! CSV contact ingest: header validation, record parsing, and the
//! batch-classification step that warms the title cache before grouping.

use tracing::debug;

use crate::classification::batch::{BatchClassifier, BATCH_SIZE};
use crate::classification::cache::TitleCache;
use crate::errors::AppError;
use crate::models::contact::ContactRecord;

pub const REQUIRED_COLUMNS: [&str; 3] = ["email", "job_title", "persona"];

/// Parses an uploaded CSV into contact records.
///
/// The header must contain every required column; otherwise the upload is
/// rejected before anything touches the cache or the database.
pub fn parse_contacts_csv(data: &str) -> Result<Vec<ContactRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Could not read CSV header: {e}")))?
        .clone();

    let email_idx = headers.iter().position(|h| h == "email");
    let job_title_idx = headers.iter().position(|h| h == "job_title");
    let persona_idx = headers.iter().position(|h| h == "persona");

    let (email_idx, job_title_idx, persona_idx) = match (email_idx, job_title_idx, persona_idx) {
        (Some(e), Some(j), Some(p)) => (e, j, p),
        _ => {
            let present: Vec<&str> = headers.iter().collect();
            let missing: Vec<&str> = REQUIRED_COLUMNS
                .iter()
                .copied()
                .filter(|col| !present.contains(col))
                .collect();
            return Err(AppError::Validation(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )));
        }
    };

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| AppError::Validation(format!("Malformed CSV row: {e}")))?;
        records.push(ContactRecord {
            email: row.get(email_idx).unwrap_or_default().to_string(),
            job_title: row.get(job_title_idx).unwrap_or_default().to_string(),
            persona: row.get(persona_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(records)
}

/// Distinct non-blank titles not yet present in the cache, first-seen order
/// preserved. Cached titles are filtered here so they are never re-queried.
pub fn distinct_uncached_titles(records: &[ContactRecord], cache: &TitleCache) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .map(|record| record.job_title.as_str())
        .filter(|title| !title.trim().is_empty())
        .filter(|title| seen.insert(title.to_string()))
        .filter(|title| !cache.contains(title))
        .map(String::from)
        .collect()
}

/// Classifies every uncached title in fixed-size batches and merges the
/// results into the cache. Titles absent from a batch response stay
/// uncached and resolve to "other" downstream. Returns how many titles
/// were sent upstream.
pub async fn classify_new_titles(
    records: &[ContactRecord],
    cache: &TitleCache,
    classifier: &dyn BatchClassifier,
) -> usize {
    let titles = distinct_uncached_titles(records, cache);
    debug!("{} distinct uncached titles to classify", titles.len());

    for chunk in titles.chunks(BATCH_SIZE) {
        let mapping = classifier.classify_batch(chunk).await;
        for (title, result) in mapping {
            cache.insert(&title, result);
        }
    }

    titles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::grouper::group_contacts;
    use crate::classification::{ClassificationResult, Confidence, OTHER_DEPARTMENT};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Stub backend returning a fixed mapping, recording what it was asked.
    struct StubClassifier {
        mapping: HashMap<String, ClassificationResult>,
        calls: AtomicUsize,
        titles_seen: Mutex<Vec<String>>,
    }

    impl StubClassifier {
        fn new(mapping: HashMap<String, ClassificationResult>) -> Self {
            Self {
                mapping,
                calls: AtomicUsize::new(0),
                titles_seen: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self::new(HashMap::new())
        }
    }

    #[async_trait]
    impl BatchClassifier for StubClassifier {
        async fn classify_batch(&self, titles: &[String]) -> HashMap<String, ClassificationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.titles_seen.lock().unwrap().extend(titles.iter().cloned());
            titles
                .iter()
                .filter_map(|t| self.mapping.get(t).map(|r| (t.clone(), r.clone())))
                .collect()
        }
    }

    fn high(department: &str) -> ClassificationResult {
        ClassificationResult {
            department: department.to_string(),
            confidence: Confidence::High,
            reasoning: "test".to_string(),
        }
    }

    fn record(email: &str, job_title: &str) -> ContactRecord {
        ContactRecord {
            email: email.to_string(),
            job_title: job_title.to_string(),
            persona: "decision maker".to_string(),
        }
    }

    const VALID_CSV: &str = "email,job_title,persona\n\
        a@example.com,CFO,decision maker\n\
        b@example.com,Software Engineer,influencer\n";

    #[test]
    fn test_parse_valid_csv() {
        let records = parse_contacts_csv(VALID_CSV).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].email, "a@example.com");
        assert_eq!(records[0].job_title, "CFO");
        assert_eq!(records[1].persona, "influencer");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let csv = "email,job_title,persona\n a@example.com , CFO , decision maker \n";
        let records = parse_contacts_csv(csv).unwrap();
        assert_eq!(records[0].job_title, "CFO");
    }

    #[test]
    fn test_missing_persona_column_is_rejected() {
        let csv = "email,job_title\na@example.com,CFO\n";
        let err = parse_contacts_csv(csv).unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("persona"), "{msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_missing_columns_are_listed() {
        let csv = "name,company\nAlice,Acme\n";
        let err = parse_contacts_csv(csv).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                for col in REQUIRED_COLUMNS {
                    assert!(msg.contains(col), "{msg} should mention {col}");
                }
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_columns_are_tolerated() {
        let csv = "company,email,job_title,persona\nAcme,a@example.com,CFO,buyer\n";
        let records = parse_contacts_csv(csv).unwrap();
        assert_eq!(records[0].email, "a@example.com");
    }

    #[test]
    fn test_distinct_uncached_titles_dedupes_and_skips_blank() {
        let cache = TitleCache::new(8);
        let records = vec![
            record("a@example.com", "CFO"),
            record("b@example.com", "CFO"),
            record("c@example.com", ""),
            record("d@example.com", "Controller"),
        ];
        assert_eq!(
            distinct_uncached_titles(&records, &cache),
            vec!["CFO".to_string(), "Controller".to_string()]
        );
    }

    #[tokio::test]
    async fn test_cached_titles_are_never_requeried() {
        let cache = TitleCache::new(8);
        cache.insert("CFO", high("finance"));

        let records = vec![record("a@example.com", "CFO"), record("b@example.com", "Beekeeper")];
        let classifier = StubClassifier::new(HashMap::from([("Beekeeper".to_string(), high("operations"))]));

        classify_new_titles(&records, &cache, &classifier).await;

        let seen = classifier.titles_seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["Beekeeper".to_string()]);
    }

    #[tokio::test]
    async fn test_titles_are_chunked_into_batches_of_twenty() {
        let cache = TitleCache::new(128);
        let records: Vec<_> = (0..45)
            .map(|i| record(&format!("u{i}@example.com"), &format!("Specialist Grade {i}")))
            .collect();
        let classifier = StubClassifier::empty();

        let queried = classify_new_titles(&records, &cache, &classifier).await;

        assert_eq!(queried, 45);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_upload_makes_no_classifier_calls() {
        let cache = TitleCache::new(8);
        let classifier = StubClassifier::empty();

        classify_new_titles(&[], &cache, &classifier).await;

        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classifier_outage_resolves_everything_to_other() {
        // An upstream failure yields empty mappings; the upload still
        // completes with every contact grouped under "other".
        let cache = TitleCache::new(8);
        let records = vec![record("a@example.com", "Beekeeper"), record("b@example.com", "Juggler")];
        let classifier = StubClassifier::empty();

        classify_new_titles(&records, &cache, &classifier).await;
        let grouped = group_contacts(records, &cache);

        assert_eq!(grouped.total_contacts(), 2);
        assert_eq!(grouped.groups[OTHER_DEPARTMENT].len(), 2);
        assert_eq!(grouped.ungrouped_titles.len(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_successful_batch_results_are_merged_into_cache() {
        let cache = TitleCache::new(8);
        let records = vec![record("a@example.com", "Beekeeper")];
        let classifier = StubClassifier::new(HashMap::from([("Beekeeper".to_string(), high("operations"))]));

        classify_new_titles(&records, &cache, &classifier).await;

        assert_eq!(cache.get("Beekeeper").unwrap().department, "operations");
    }
}
