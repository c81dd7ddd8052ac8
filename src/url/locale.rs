//! Translation path detection
//!
//! Best-effort heuristic: a fixed list of ISO 639-1 language codes and
//! common language-region pairs, compared case-insensitively against each
//! `/`-separated path segment. This is not a locale-tag parser; a site that
//! uses a two-letter section name such as `/id/` will have it treated as a
//! translation.

use url::Url;

/// Language and locale codes recognized as translation path segments
const LOCALE_CODES: &[&str] = &[
    // ISO 639-1 languages
    "ar", "bg", "bn", "ca", "cs", "cy", "da", "de", "el", "en", "es", "et", "eu", "fa", "fi",
    "fr", "ga", "gl", "he", "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "ka", "kk", "ko",
    "lt", "lv", "mk", "ms", "mt", "nb", "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl",
    "sq", "sr", "sv", "th", "tr", "uk", "ur", "vi", "zh",
    // Language-region pairs
    "ar-ae", "ar-sa", "de-at", "de-ch", "de-de", "en-au", "en-ca", "en-gb", "en-ie", "en-in",
    "en-nz", "en-us", "en-za", "es-ar", "es-cl", "es-co", "es-es", "es-mx", "es-us", "fr-be",
    "fr-ca", "fr-ch", "fr-fr", "it-ch", "it-it", "nl-be", "nl-nl", "pt-br", "pt-pt", "sv-se",
    "zh-cn", "zh-hk", "zh-tw",
];

/// Returns true if the segment is a known language or locale code
pub fn is_locale_segment(segment: &str) -> bool {
    if segment.len() != 2 && segment.len() != 5 {
        return false;
    }

    let lowered = segment.to_ascii_lowercase().replace('_', "-");
    LOCALE_CODES.contains(&lowered.as_str())
}

/// Returns true if any path segment of the URL is a locale code
///
/// Unparseable URLs are never considered translations.
pub fn is_translation_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().split('/').any(is_locale_segment),
        Err(_) => false,
    }
}
