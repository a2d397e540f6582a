//! Contract with the rich-text host, plus an in-memory host used by the CLI
//! and by tests.

use crate::segment::{Span, TextUnit};
use serde::{Deserialize, Serialize};

/// Parts of a document where conversion is never offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExcludedZone {
    FootnoteEndnote,
    Comment,
    Citation,
    Bibliography,
    ContentControl,
    ClipboardPreview,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HostError {
    #[error("span {start}..{end} is outside the document (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("host rejected the edit: {0}")]
    Rejected(String),
}

pub trait TextHost {
    /// Units covering `range`, in document order.
    fn text_units(&self, range: Span) -> Vec<TextUnit>;
    /// Exclusive end offset of the whole document.
    fn document_end(&self) -> usize;
    fn excluded_zone(&self, range: Span) -> Option<ExcludedZone>;
    fn text(&self, span: Span) -> Result<String, HostError>;
    /// Replaces `span` with `text` and sets its font to `font_name`.
    fn replace(&mut self, span: Span, text: &str, font_name: &str) -> Result<(), HostError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledSpan {
    pub text: String,
    pub font_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub span: Span,
    pub kind: ExcludedZone,
}

/// Serialized form of a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub spans: Vec<StyledSpan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<Zone>,
}

/// Character-addressed text with one font name per character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    chars: Vec<char>,
    fonts: Vec<String>,
    zones: Vec<Zone>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str, font_name: &str) {
        for ch in text.chars() {
            self.chars.push(ch);
            self.fonts.push(font_name.to_owned());
        }
    }

    pub fn with_span(mut self, text: &str, font_name: &str) -> Self {
        self.push(text, font_name);
        self
    }

    pub fn mark_zone(&mut self, span: Span, kind: ExcludedZone) {
        self.zones.push(Zone { span, kind });
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn full_span(&self) -> Span {
        Span::new(0, self.len())
    }

    pub fn plain_text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn font_at(&self, offset: usize) -> Option<&str> {
        self.fonts.get(offset).map(String::as_str)
    }

    /// Adjacent characters sharing a font, merged.
    pub fn styled_spans(&self) -> Vec<StyledSpan> {
        let mut spans: Vec<StyledSpan> = Vec::new();
        for (ch, font) in self.chars.iter().zip(&self.fonts) {
            match spans.last_mut() {
                Some(last) if last.font_name == *font => last.text.push(*ch),
                _ => spans.push(StyledSpan { text: ch.to_string(), font_name: font.clone() }),
            }
        }
        spans
    }

    pub fn to_file(&self) -> DocumentFile {
        DocumentFile { spans: self.styled_spans(), zones: self.zones.clone() }
    }

    fn check_span(&self, span: Span) -> Result<(), HostError> {
        if span.end > self.len() {
            return Err(HostError::OutOfBounds { start: span.start, end: span.end, len: self.len() });
        }
        Ok(())
    }
}

impl From<DocumentFile> for Document {
    fn from(file: DocumentFile) -> Self {
        let mut document = Document::new();
        for span in &file.spans {
            document.push(&span.text, &span.font_name);
        }
        document.zones = file.zones;
        document
    }
}

impl TextHost for Document {
    /// Splits at font changes and at word/whitespace boundaries.
    fn text_units(&self, range: Span) -> Vec<TextUnit> {
        let end = range.end.min(self.len());
        let mut units: Vec<TextUnit> = Vec::new();

        for offset in range.start..end {
            let ch = self.chars[offset];
            let font = &self.fonts[offset];

            match units.last_mut() {
                Some(unit)
                    if unit.font_name == *font
                        && unit.text.chars().all(char::is_whitespace) == ch.is_whitespace() =>
                {
                    unit.text.push(ch);
                    unit.end = offset + 1;
                }
                _ => units.push(TextUnit {
                    start: offset,
                    end: offset + 1,
                    text: ch.to_string(),
                    font_name: font.clone(),
                }),
            }
        }

        units
    }

    fn document_end(&self) -> usize {
        self.len()
    }

    fn excluded_zone(&self, range: Span) -> Option<ExcludedZone> {
        self.zones.iter().find(|zone| zone.span.overlaps(range)).map(|zone| zone.kind)
    }

    fn text(&self, span: Span) -> Result<String, HostError> {
        self.check_span(span)?;
        Ok(self.chars[span.start..span.end].iter().collect())
    }

    fn replace(&mut self, span: Span, text: &str, font_name: &str) -> Result<(), HostError> {
        self.check_span(span)?;

        let replacement: Vec<char> = text.chars().collect();
        let delta = replacement.len() as isize - span.len() as isize;
        let fonts = vec![font_name.to_owned(); replacement.len()];

        self.chars.splice(span.start..span.end, replacement);
        self.fonts.splice(span.start..span.end, fonts);

        for zone in &mut self.zones {
            if zone.span.start >= span.end {
                zone.span.start = zone.span.start.saturating_add_signed(delta);
            }
            if zone.span.end >= span.end {
                zone.span.end = zone.span.end.saturating_add_signed(delta);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new().with_span("g]kfnL efiff", "Preeti").with_span(" नेपाली", "Mangal")
    }

    #[test]
    fn units_split_on_whitespace_and_font_changes() {
        let document = sample();
        let units = document.text_units(document.full_span());
        let texts: Vec<_> = units.iter().map(|unit| unit.text.as_str()).collect();

        assert_eq!(texts, vec!["g]kfnL", " ", "efiff", " ", "नेपाली"]);
        assert_eq!(units[3].font_name, "Mangal");
        assert_eq!(units.last().map(|unit| unit.end), Some(document.len()));
    }

    #[test]
    fn units_respect_partial_range() {
        let document = sample();
        let units = document.text_units(Span::new(2, 9));

        assert_eq!(units.first().map(|unit| unit.text.as_str()), Some("kfnL"));
        assert_eq!(units.last().map(|unit| unit.text.as_str()), Some("ef"));
    }

    #[test]
    fn replace_splices_text_and_font() {
        let mut document = sample();
        document.replace(Span::new(0, 6), "नेपाली", "Mangal").expect("replace should succeed");

        assert!(document.plain_text().starts_with("नेपाली efiff"));
        assert_eq!(document.font_at(0), Some("Mangal"));
        assert_eq!(document.font_at(7), Some("Preeti"));
    }

    #[test]
    fn replace_rejects_out_of_bounds_span() {
        let mut document = sample();
        let len = document.len();
        let err = document.replace(Span::new(0, len + 1), "x", "Preeti").expect_err("must fail");

        assert_eq!(err, HostError::OutOfBounds { start: 0, end: len + 1, len });
    }

    #[test]
    fn zones_follow_edits() {
        let mut document = sample();
        document.mark_zone(Span::new(13, 19), ExcludedZone::Comment);
        document.replace(Span::new(0, 6), "ab", "Preeti").expect("replace should succeed");

        assert_eq!(document.excluded_zone(Span::new(9, 10)), Some(ExcludedZone::Comment));
        assert_eq!(document.excluded_zone(Span::new(0, 8)), None);
    }

    #[test]
    fn file_round_trip_merges_spans() {
        let document = sample();
        let json = serde_json::to_string(&document.to_file()).expect("serialize");
        let file: DocumentFile = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(Document::from(file), document);
        assert_eq!(document.styled_spans().len(), 2);
    }
}
