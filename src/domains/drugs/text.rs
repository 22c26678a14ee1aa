//! Visible text of label sections.
//!
//! Label sections are HTML fragments. Matching and excerpts work on the text a
//! reader sees: tags removed, character references decoded.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup tag pattern is valid"));

static CHAR_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));")
        .expect("character reference pattern is valid")
});

/// Remove markup tags, decode character references and trim whitespace.
pub fn strip_markup(text: &str) -> String {
    let without_tags = MARKUP_TAG.replace_all(text, "");
    decode_entities(&without_tags).trim().to_string()
}

/// Lowercased visible text, for case-insensitive matching.
pub fn searchable(text: &str) -> String {
    strip_markup(text).to_lowercase()
}

/// Decode numeric and the common named character references.
///
/// Unknown names and invalid code points are left untouched.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    CHAR_REFERENCE.replace_all(text, |caps: &Captures| {
        let decoded = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            caps.get(3).and_then(|name| named_entity(name.as_str()))
        };

        match decoded {
            // Non-breaking spaces read as plain spaces.
            Some('\u{a0}') => " ".to_string(),
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "le" => '≤',
        "ge" => '≥',
        "plusmn" => '±',
        "deg" => '°',
        "micro" => 'µ',
        "times" => '×',
        "reg" => '®',
        "trade" => '™',
        "copy" => '©',
        "ndash" => '–',
        "mdash" => '—',
        "bull" => '•',
        "middot" => '·',
        _ => return None,
    };
    Some(c)
}
