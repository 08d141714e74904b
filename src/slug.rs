//! Slug derivation for article file names. Slugs are the only identifier an
//! article ever gets: the article page is written to `articles/<slug>` and
//! the archive references it by the same string forever after, so the
//! mapping from headline to slug must be deterministic and collisions must
//! never overwrite an existing page.

use std::collections::HashSet;

/// The fixed extension appended to every slug.
pub const SLUG_EXTENSION: &str = ".html";

/// Headlines can run long; the stem is capped before the extension is added.
const MAX_STEM_LENGTH: usize = 50;

/// Derives a slug stem from a headline: lowercased, runs of characters
/// outside `[a-z0-9]` collapsed to a single `-`, edges trimmed, truncated
/// to [`MAX_STEM_LENGTH`] characters. Pure and deterministic.
pub fn slugify(text: &str) -> String {
    let stem = slug::slugify(text);
    let stem = match stem.char_indices().nth(MAX_STEM_LENGTH) {
        Some((index, _)) => &stem[..index],
        None => &stem,
    };
    stem.trim_end_matches('-').to_owned()
}

/// Appends [`SLUG_EXTENSION`] to `stem`, inserting a numeric suffix when the
/// result is already taken. Two headlines that normalize to the same stem
/// therefore get distinct file names instead of silently overwriting each
/// other.
pub fn unique_slug(stem: &str, taken: &HashSet<String>) -> String {
    let candidate = format!("{}{}", stem, SLUG_EXTENSION);
    if !taken.contains(&candidate) {
        return candidate;
    }
    let mut n = 2u64;
    loop {
        let candidate = format!("{}-{}{}", stem, n, SLUG_EXTENSION);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Cat Elected Mayor"), "cat-elected-mayor");
    }

    #[test]
    fn test_slugify_collapses_punctuation_runs() {
        assert_eq!(slugify("Man  --  Wins?! Lottery..."), "man-wins-lottery");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        let headline = "Breaking: something happened (again)";
        assert_eq!(slugify(headline), slugify(headline));
    }

    #[test]
    fn test_slugify_charset_and_length() {
        let headline =
            "An Exceedingly Long Headline That Goes On And On And On And On And On Forever";
        let stem = slugify(headline);
        assert!(stem.len() <= MAX_STEM_LENGTH);
        assert!(stem
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!stem.starts_with('-'));
        assert!(!stem.ends_with('-'));
    }

    #[test]
    fn test_slugify_transliterates_unicode() {
        assert_eq!(slugify("Café Résumé"), "cafe-resume");
    }

    #[test]
    fn test_unique_slug_no_collision() {
        let taken = HashSet::new();
        assert_eq!(unique_slug("cat-elected-mayor", &taken), "cat-elected-mayor.html");
    }

    #[test]
    fn test_unique_slug_disambiguates() {
        let mut taken = HashSet::new();
        taken.insert("cat-elected-mayor.html".to_owned());
        assert_eq!(
            unique_slug("cat-elected-mayor", &taken),
            "cat-elected-mayor-2.html"
        );
        taken.insert("cat-elected-mayor-2.html".to_owned());
        assert_eq!(
            unique_slug("cat-elected-mayor", &taken),
            "cat-elected-mayor-3.html"
        );
    }
}
