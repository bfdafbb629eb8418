//! Flag resolver - language display name to 2-letter region code.
//!
//! The table follows the display names offered by the translation service.
//! Names whose language is spoken in many regions are pinned by hand.

/// Language display names and their default region codes, in display order.
const LANGUAGE_REGIONS: &[(&str, &str)] = &[
    ("Arabic", "sa"),
    ("Bulgarian", "bg"),
    ("Chinese", "cn"),
    ("Chinese (simplified)", "cn"),
    ("Chinese (traditional)", "tw"),
    ("Czech", "cz"),
    ("Danish", "dk"),
    ("Dutch", "nl"),
    ("English", "gb"),
    ("English (American)", "us"),
    ("English (British)", "gb"),
    ("Estonian", "ee"),
    ("Finnish", "fi"),
    ("French", "fr"),
    ("German", "de"),
    ("Greek", "gr"),
    ("Hungarian", "hu"),
    ("Indonesian", "id"),
    ("Italian", "it"),
    ("Japanese", "jp"),
    ("Korean", "kr"),
    ("Latvian", "lv"),
    ("Lithuanian", "lt"),
    ("Norwegian", "no"),
    ("Polish", "pl"),
    ("Portuguese", "pt"),
    ("Portuguese (Brazilian)", "br"),
    ("Portuguese (European)", "pt"),
    ("Romanian", "ro"),
    ("Russian", "ru"),
    ("Slovak", "sk"),
    ("Slovenian", "si"),
    ("Spanish", "es"),
    ("Spanish (Latin American)", "mx"),
    ("Swedish", "se"),
    ("Turkish", "tr"),
    ("Ukrainian", "ua"),
];

/// Manual overrides, checked before the table.
const OVERRIDES: &[(&str, &str)] = &[
    ("english", "gb"),
    ("norwegian (bokmål)", "no"),
    ("chinese (mandarin)", "cn"),
    ("brazilian portuguese", "br"),
];

/// Resolve a language display name to a lower-case region code.
///
/// Matching ignores surrounding whitespace and ASCII case. Unknown names
/// resolve to `""`.
pub fn country_code(language_name: &str) -> &'static str {
    let needle = language_name.trim();
    if needle.is_empty() {
        return "";
    }

    OVERRIDES
        .iter()
        .chain(LANGUAGE_REGIONS.iter())
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
        .map(|(_, code)| *code)
        .unwrap_or("")
}

/// Render a region code as its flag emoji (a pair of regional indicators).
pub fn flag_emoji(code: &str) -> String {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return String::new();
    }

    code.bytes()
        .map(|b| b.to_ascii_uppercase())
        .filter_map(|b| char::from_u32(0x1F1E6 + u32::from(b - b'A')))
        .collect()
}

/// Flag emoji for a language display name, or `""` if unknown.
pub fn language_flag(language_name: &str) -> String {
    flag_emoji(country_code(language_name))
}

/// The table's display spelling of `language_name`, or the trimmed input
/// when the table has no such language.
pub fn canonical_name(language_name: &str) -> String {
    let needle = language_name.trim();
    LANGUAGE_REGIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
        .map(|(name, _)| (*name).to_string())
        .unwrap_or_else(|| needle.to_string())
}

/// All language names the resolver knows about, in display order.
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    LANGUAGE_REGIONS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brazilian_portuguese() {
        assert_eq!(country_code("Portuguese (Brazilian)"), "br");
    }

    #[test]
    fn test_unknown_language_is_empty() {
        assert_eq!(country_code("Klingon"), "");
        assert_eq!(country_code(""), "");
        assert_eq!(country_code("   "), "");
    }

    #[test]
    fn test_english_defaults_to_great_britain() {
        assert_eq!(country_code("English"), "gb");
        assert_eq!(country_code("English (American)"), "us");
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(country_code("  german "), "de");
        assert_eq!(country_code("JAPANESE"), "jp");
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name(" spanish "), "Spanish");
        assert_eq!(canonical_name("PORTUGUESE (BRAZILIAN)"), "Portuguese (Brazilian)");
        assert_eq!(canonical_name("English"), "English");
        assert_eq!(canonical_name("  Quenya "), "Quenya");
    }

    #[test]
    fn test_flag_emoji() {
        assert_eq!(flag_emoji("br"), "\u{1F1E7}\u{1F1F7}");
        assert_eq!(flag_emoji("GB"), "\u{1F1EC}\u{1F1E7}");
        assert_eq!(flag_emoji(""), "");
        assert_eq!(flag_emoji("usa"), "");
        assert_eq!(flag_emoji("1a"), "");
    }

    #[test]
    fn test_every_supported_language_resolves() {
        for name in supported_languages() {
            assert_eq!(country_code(name).len(), 2, "{} has no region", name);
        }
    }
}
