use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const UNICODE_KEY: &str = "UNICODE";
pub const UNICODE_LOCAL_NAME: &str = "Mangal";

/// `(key, local name, label)` for every supported font, in menu order.
const BUILTIN_FONTS: &[(&str, &str, &str)] = &[
    ("PREETI", "Preeti", "प्रीति"),
    ("KANTIPUR", "Kantipur", "कान्तिपूर"),
    ("HIMLAB", "Himalb", "हिमाली"),
    ("AAKRITI", "Aakriti", "आकृति"),
    ("AALEKH", "Aalekh", "आलेख"),
    ("GANESS", "Ganess", "गणेश"),
    ("NAVJEEVAN", "Navjeevan", "नवजीवन"),
    ("PCSNEPALI", "PCS NEPALI", "पीसीएस नेपाली"),
    ("SHANGRILA", "Shangrila Numeric", "साङ्ग्रिला"),
    ("SHREENATH", "Shreenath Bold", "श्रीनाथ"),
    ("SUMOD", "Sumod Acharya", "सूमोद"),
    (UNICODE_KEY, UNICODE_LOCAL_NAME, "यूनिकोड"),
];

/// Server-side identifier of a font, e.g. `PREETI`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontKey(String);

impl FontKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn unicode() -> Self {
        Self::new(UNICODE_KEY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unicode(&self) -> bool {
        self.0 == UNICODE_KEY
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FontKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontEntry {
    pub key: FontKey,
    pub local_name: String,
    pub label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate font key '{0}'")]
    DuplicateKey(FontKey),
    #[error("registry must contain exactly one '{UNICODE_KEY}' entry named '{UNICODE_LOCAL_NAME}'")]
    MissingUnicodeEntry,
}

/// Immutable mapping between canonical keys, installed font names and menu labels.
///
/// Built in one step from a fixed table; lookups are linear scans over a
/// dozen entries. Unknown keys pass through unchanged so that text in fonts
/// with no configured mapping is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRegistry {
    entries: Vec<FontEntry>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontRegistry {
    /// The registry shipped with the add-in. The table is a constant, so its
    /// invariants are asserted in debug builds instead of returned as an error.
    pub fn builtin() -> Self {
        let entries = BUILTIN_FONTS
            .iter()
            .map(|(key, local_name, label)| FontEntry {
                key: FontKey::new(*key),
                local_name: (*local_name).to_owned(),
                label: (*label).to_owned(),
            })
            .collect::<Vec<_>>();
        debug_assert_eq!(validate(&entries), Ok(()), "builtin font table is inconsistent");

        Self { entries }
    }

    pub fn from_entries(entries: Vec<FontEntry>) -> Result<Self, RegistryError> {
        validate(&entries)?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: &str) -> Option<&FontEntry> {
        self.entries.iter().find(|entry| entry.key.as_str() == key)
    }

    pub fn canonical_key_of(&self, local_name: &str) -> Option<&FontKey> {
        self.entries.iter().find(|entry| entry.local_name == local_name).map(|entry| &entry.key)
    }

    /// Installed font name for `key`, or `key` itself when it is not registered.
    pub fn local_name_of<'a>(&'a self, key: &'a str) -> &'a str {
        self.entry(key).map_or(key, |entry| entry.local_name.as_str())
    }

    /// Menu label for `key`, or `key` itself when it is not registered.
    pub fn label_of<'a>(&'a self, key: &'a str) -> &'a str {
        self.entry(key).map_or(key, |entry| entry.label.as_str())
    }

    pub fn key_of_label(&self, label: &str) -> Option<&FontKey> {
        self.entries.iter().find(|entry| entry.label == label).map(|entry| &entry.key)
    }

    pub fn all_labels(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.label.as_str()).collect()
    }

    /// True for every registered key other than the Unicode key.
    pub fn is_legacy_key(&self, key: &str) -> bool {
        key != UNICODE_KEY && self.entry(key).is_some()
    }

    /// True when `local_name` is the installed name of a registered legacy font.
    pub fn is_legacy_local_name(&self, local_name: &str) -> bool {
        self.canonical_key_of(local_name).is_some_and(|key| !key.is_unicode())
    }

    /// Resolves a key or a label to a registered key.
    pub fn resolve(&self, key_or_label: &str) -> Option<&FontKey> {
        self.entry(key_or_label).map(|entry| &entry.key).or_else(|| self.key_of_label(key_or_label))
    }
}

/// Keys are unique and exactly one entry pairs the Unicode key with the
/// Unicode local name.
fn validate(entries: &[FontEntry]) -> Result<(), RegistryError> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(&entry.key) {
            return Err(RegistryError::DuplicateKey(entry.key.clone()));
        }
    }

    let unicode_entries = entries
        .iter()
        .filter(|entry| entry.key.is_unicode() || entry.local_name == UNICODE_LOCAL_NAME)
        .collect::<Vec<_>>();
    match unicode_entries.as_slice() {
        [entry] if entry.key.is_unicode() && entry.local_name == UNICODE_LOCAL_NAME => Ok(()),
        _ => Err(RegistryError::MissingUnicodeEntry),
    }
}
