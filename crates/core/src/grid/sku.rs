//! SKU suggestions built from variation labels.

/// Suggest a SKU for a variation: `base_sku`, a dash, then the initials of
/// every word of the label.
///
/// The label is lower-cased and split on commas; each segment is trimmed and
/// split on single spaces. Hyphenated words contribute the first character
/// of every hyphen-separated part. Empty words add nothing.
///
/// The suffix stays lower-case; form prefill upper-cases the whole result.
///
/// ```rust
/// # use variation_table_core::grid::suggest;
/// assert_eq!(suggest("ABC", "Red, Large"), "ABC-rl");
/// assert_eq!(suggest("SKU", "X-Large"), "SKU-xl");
/// ```
#[must_use]
pub fn suggest(base_sku: &str, label: &str) -> String {
    let lowered = label.to_lowercase();
    let suffix: String = lowered
        .split(',')
        .flat_map(|segment| segment.trim().split(' '))
        .flat_map(|word| word.split('-').filter_map(|part| part.chars().next()))
        .collect();
    format!("{base_sku}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_contribute_initials() {
        assert_eq!(suggest("ABC", "Red, Large"), "ABC-rl");
    }

    #[test]
    fn test_hyphenated_word() {
        assert_eq!(suggest("SKU", "X-Large"), "SKU-xl");
    }

    #[test]
    fn test_multi_word_segments() {
        assert_eq!(suggest("TEE", "Dark Blue, Extra-Small"), "TEE-dbes");
    }

    #[test]
    fn test_empty_segments_contribute_nothing() {
        // A variation with an "any" attribute renders as "Red, " in the grid.
        assert_eq!(suggest("TEE", "Red, "), "TEE-r");
        assert_eq!(suggest("TEE", ""), "TEE-");
        assert_eq!(suggest("TEE", "Red,  , Large"), "TEE-rl");
    }

    #[test]
    fn test_double_spaces_are_empty_words() {
        assert_eq!(suggest("TEE", "Sky  Blue"), "TEE-sb");
    }

    #[test]
    fn test_base_sku_is_kept_verbatim() {
        assert_eq!(suggest("hd-01", "Green"), "hd-01-g");
    }

    #[test]
    fn test_non_ascii_initials() {
        assert_eq!(suggest("CH", "Émeraude, Grün"), "CH-ég");
    }
}
