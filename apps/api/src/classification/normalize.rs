//! Job-title normalization: lower-case, strip punctuation, drop stopwords.

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Normalizes a raw job title for keyword matching.
///
/// Lower-cases, strips everything except alphanumerics, underscores, and
/// whitespace, then drops common stopwords. Empty input yields an empty
/// string; this never fails.
pub fn normalize_title(raw: &str) -> String {
    let lowered: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    lowered
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize_title("V.P. of Sales!"), "vp sales");
    }

    #[test]
    fn test_drops_stopwords() {
        assert_eq!(
            normalize_title("Head of Marketing and Communications"),
            "head marketing communications"
        );
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn test_punctuation_only_yields_empty_string() {
        assert_eq!(normalize_title("?!,.-"), "");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_title("  Chief   Financial  Officer "), "chief financial officer");
    }

    #[test]
    fn test_keeps_digits_and_underscores() {
        assert_eq!(normalize_title("Level_2 Analyst"), "level_2 analyst");
    }
}
