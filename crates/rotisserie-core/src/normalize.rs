//! Canonical forms for the shared ingredient and tag dictionaries.
//!
//! Both dictionaries are keyed on the canonical name, so any two raw names
//! that canonicalize to the same string resolve to the same row. The
//! resolve-or-create operations that use these live on
//! [`Database`](crate::schema::Database).

/// Canonical ingredient name: trimmed, first character upper-cased, the
/// rest lower-cased.
///
/// Only the first character of the whole string is capitalized, so
/// `"  OLIVE OIL "` becomes `"Olive oil"`.
#[must_use]
pub fn canonical_ingredient_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Canonical tag name: trimmed and lower-cased.
#[must_use]
pub fn canonical_tag_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_case_and_whitespace_variants_agree() {
        for raw in ["onion", "Onion ", " ONION", "\toNiOn\n"] {
            assert_eq!(canonical_ingredient_name(raw), "Onion");
        }
    }

    #[test]
    fn test_ingredient_multi_word_is_not_title_cased() {
        assert_eq!(canonical_ingredient_name("  OLIVE OIL "), "Olive oil");
        assert_eq!(canonical_ingredient_name("red Bell Pepper"), "Red bell pepper");
    }

    #[test]
    fn test_ingredient_non_ascii() {
        assert_eq!(canonical_ingredient_name("éPICES"), "Épices");
        assert_eq!(canonical_ingredient_name("crème fraîche"), "Crème fraîche");
    }

    #[test]
    fn test_ingredient_leading_digit_is_kept() {
        assert_eq!(canonical_ingredient_name("00 FLOUR"), "00 flour");
    }

    #[test]
    fn test_ingredient_blank() {
        assert_eq!(canonical_ingredient_name("   "), "");
    }

    #[test]
    fn test_tag_canonical() {
        assert_eq!(canonical_tag_name("  Weeknight "), "weeknight");
        assert_eq!(canonical_tag_name("VEGAN"), "vegan");
        assert_eq!(canonical_tag_name("Quick Meals"), "quick meals");
    }
}
