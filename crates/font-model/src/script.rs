use crate::registry::{FontKey, FontRegistry};
use std::ops::RangeInclusive;

pub const DEVANAGARI: RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Latin punctuation that routinely appears inside Nepali prose.
pub const NEPALI_PUNCTUATION: [char; 8] = [',', ';', ':', '?', '!', '"', '—', '-'];

/// Minimum share of Devanagari, whitespace and punctuation in tolerant mode.
pub const TOLERANT_THRESHOLD: f64 = 0.94;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Every character must be Devanagari.
    Strict,
    /// Whitespace and Nepali punctuation count as Devanagari, and up to 6% of
    /// the text may be anything else.
    Tolerant,
}

pub fn is_devanagari(ch: char) -> bool {
    DEVANAGARI.contains(&ch)
}

pub fn is_nepali_punctuation(ch: char) -> bool {
    NEPALI_PUNCTUATION.contains(&ch)
}

/// Whether the trimmed `text` is Unicode Devanagari. Blank text never is.
pub fn is_unicode_devanagari(text: &str, strictness: Strictness) -> bool {
    let text = text.trim();
    let total = text.chars().count();
    if total == 0 {
        return false;
    }

    match strictness {
        Strictness::Strict => text.chars().all(is_devanagari),
        Strictness::Tolerant => {
            let accepted = text
                .chars()
                .filter(|&ch| is_devanagari(ch) || ch.is_whitespace() || is_nepali_punctuation(ch))
                .count();
            accepted as f64 / total as f64 >= TOLERANT_THRESHOLD
        }
    }
}

/// Decides which font a run of host text is really encoded in.
#[derive(Debug, Clone, Copy)]
pub struct ScriptClassifier<'a> {
    registry: &'a FontRegistry,
}

impl<'a> ScriptClassifier<'a> {
    pub fn new(registry: &'a FontRegistry) -> Self {
        Self { registry }
    }

    pub fn is_encoded_in_known_legacy_font(&self, font_name: &str) -> bool {
        self.registry.is_legacy_local_name(font_name)
    }

    /// Declared legacy font first, then detected Unicode, otherwise unsupported.
    pub fn effective_source_font(&self, font_name: &str, text: &str) -> Option<FontKey> {
        if self.is_encoded_in_known_legacy_font(font_name) {
            return self.registry.canonical_key_of(font_name).cloned();
        }

        if is_unicode_devanagari(text, Strictness::Tolerant) {
            return Some(FontKey::unicode());
        }

        None
    }

    /// True when the text is in a legacy font or is already strictly Devanagari.
    pub fn is_nepali_encoded(&self, font_name: &str, text: &str) -> bool {
        self.is_encoded_in_known_legacy_font(font_name)
            || is_unicode_devanagari(text, Strictness::Strict)
    }
}
