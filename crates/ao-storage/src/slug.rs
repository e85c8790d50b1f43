//! Filesystem-safe slugs for session file names

/// Maximum slug length in bytes
pub const SLUG_MAX_LENGTH: usize = 50;

/// A cut slug is shortened to its last hyphen only past this position
pub const SLUG_MIN_WORD_BOUNDARY: usize = 30;

const FALLBACK_SLUG: &str = "session";

/// Build a lowercase `[a-z0-9-]` slug from free text
///
/// Runs of any other characters collapse to a single hyphen. Long slugs are
/// cut at 50 bytes, preferring the last word boundary. Empty results fall
/// back to `"session"`.
pub fn generate_slug(text: &str) -> String {
    if text.is_empty() {
        return FALLBACK_SLUG.to_string();
    }

    let slug = truncate_slug(slugify(&text.to_lowercase()));
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_hyphen = false;
    for c in input.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            last_hyphen = false;
        } else if !last_hyphen {
            out.push('-');
            last_hyphen = true;
        }
    }
    out.trim_matches('-').to_string()
}

fn truncate_slug(mut slug: String) -> String {
    if slug.len() <= SLUG_MAX_LENGTH {
        return slug;
    }
    // ASCII only, byte offsets are char offsets
    slug.truncate(SLUG_MAX_LENGTH);
    if let Some(idx) = slug.rfind('-') {
        if idx > SLUG_MIN_WORD_BOUNDARY {
            slug.truncate(idx);
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_table() {
        let cases = [
            ("", "session"),
            ("Hello World", "hello-world"),
            ("Test 123", "test-123"),
            ("Multiple   Spaces", "multiple-spaces"),
            ("Special!@#$%^&*()Characters", "special-characters"),
            ("UPPERCASE", "uppercase"),
            (
                "A very long slug that exceeds the maximum allowed length for slugs which is fifty characters",
                "a-very-long-slug-that-exceeds-the-maximum-allowed",
            ),
        ];

        for (input, want) in cases {
            assert_eq!(generate_slug(input), want, "input: {:?}", input);
        }
    }

    #[test]
    fn test_all_special_chars_fall_back() {
        assert_eq!(generate_slug("!@#$%^&*()"), "session");
        assert_eq!(generate_slug("   "), "session");
    }

    #[test]
    fn test_non_ascii_is_stripped() {
        assert_eq!(generate_slug("Café résumé"), "caf-r-sum");
    }

    #[test]
    fn test_long_word_cut_at_max_length() {
        let input = "x".repeat(80);
        let slug = generate_slug(&input);
        assert_eq!(slug.len(), SLUG_MAX_LENGTH);
    }

    #[test]
    fn test_early_boundary_keeps_full_cut() {
        // Only hyphen sits before position 30, so the slug is cut mid-word
        let input = format!("short {}", "y".repeat(60));
        let slug = generate_slug(&input);
        assert_eq!(slug.len(), SLUG_MAX_LENGTH);
        assert!(slug.starts_with("short-yyy"));
    }

    #[test]
    fn test_slug_properties() {
        let inputs = [
            "Implement the knowledge flywheel correctly -- with retries!!",
            "  leading and trailing  ",
            "a-b-c---d",
            "Ünïcödé 🚀 rocket launch sequence for the big multi word summary text here",
        ];
        for input in inputs {
            let slug = generate_slug(input);
            assert_eq!(slug, generate_slug(input));
            assert!(slug.len() <= SLUG_MAX_LENGTH, "{}", slug);
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{}", slug);
            assert!(!slug.contains("--"), "{}", slug);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "{}",
                slug
            );
        }
    }
}
