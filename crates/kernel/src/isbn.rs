//! Display formatting for ISBNs.

/// Placeholder shown when a record carries no ISBN.
pub const MISSING_ISBN: &str = "N/A";

/// Format an ISBN for display.
///
/// Hyphens and whitespace are stripped; a 13-character result is regrouped as
/// `3-1-3-5-1`. Anything else is returned exactly as given.
pub fn format_isbn(isbn: Option<&str>) -> String {
    let raw = match isbn {
        Some(raw) if !raw.is_empty() => raw,
        _ => return MISSING_ISBN.to_string(),
    };

    let clean: Vec<char> = raw
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    if clean.len() != 13 {
        return raw.to_string();
    }

    let group = |range: std::ops::Range<usize>| clean[range].iter().collect::<String>();
    format!(
        "{}-{}-{}-{}-{}",
        group(0..3),
        group(3..4),
        group(4..7),
        group(7..12),
        group(12..13)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn missing_isbn_renders_placeholder() {
        assert_eq!(format_isbn(None), "N/A");
        assert_eq!(format_isbn(Some("")), "N/A");
    }

    #[rstest]
    #[case::bare("9788437604947", "978-8-437-60494-7")]
    #[case::hyphenated("978-84-376-0494-7", "978-8-437-60494-7")]
    #[case::spaced("978 8437 604947", "978-8-437-60494-7")]
    fn thirteen_characters_are_regrouped(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_isbn(Some(input)), expected);
    }

    #[rstest]
    #[case::isbn10("0-19-853453-1")]
    #[case::too_short("12345")]
    #[case::too_long("97884376049471")]
    fn other_lengths_are_returned_untouched(#[case] input: &str) {
        assert_eq!(format_isbn(Some(input)), input);
    }
}
