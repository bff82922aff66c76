//! Slug derivation and validation.

use regex::Regex;
use std::sync::LazyLock;

/// Longest slug accepted anywhere in the catalogue.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Lowercase alphanumeric words separated by single hyphens.
pub static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

/// Derives a slug from a display name.
///
/// ASCII letters and digits are kept (lowercased); every other run of
/// characters collapses into one hyphen. The result is cut to
/// [`MAX_SLUG_LENGTH`] without leaving a trailing hyphen.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Enamel Mug, 350 ml"), "enamel-mug-350-ml");
/// assert_eq!(slugify("  --Tea & Coffee--  "), "tea-coffee");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Checks that `slug` is well-formed and not too long.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_SLUG_LENGTH && SLUG_REGEX.is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Enamel Mug"), "enamel-mug");
        assert_eq!(slugify("Enamel Mug, 350 ml"), "enamel-mug-350-ml");
    }

    #[test]
    fn test_slugify_trims_separators() {
        assert_eq!(slugify("  --Tea & Coffee--  "), "tea-coffee");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café crème"), "caf-cr-me");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_truncates() {
        let long = "ab ".repeat(100);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
        assert!(is_valid_slug(&slug));
    }

    #[test]
    fn test_slugify_output_is_valid() {
        for name in ["Mugs", "Long sleeve / Shirts", "2024 Edition"] {
            assert!(is_valid_slug(&slugify(name)), "{name}");
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("enamel-mug"));
        assert!(is_valid_slug("mug2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Enamel-Mug"));
        assert!(!is_valid_slug("-mug"));
        assert!(!is_valid_slug("mug-"));
        assert!(!is_valid_slug("enamel--mug"));
        assert!(!is_valid_slug("mug/../etc"));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }
}
