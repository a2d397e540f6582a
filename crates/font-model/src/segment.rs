use serde::{Deserialize, Serialize};

/// Half-open character range `[start, end)` in host addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end: end.max(start) }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Smallest addressable piece of host text, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextUnit {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub font_name: String,
}

impl TextUnit {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Maximal stretch of selected text sharing one declared font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub start: usize,
    pub end: usize,
    pub font_name: String,
}

impl Run {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Merges adjacent units into runs. Blank units never open a run; they extend
/// whichever run precedes them.
pub fn segment(units: &[TextUnit]) -> Vec<Run> {
    let Some((first, rest)) = units.split_first() else {
        return Vec::new();
    };

    let mut runs = Vec::new();
    let mut current = Run { start: first.start, end: first.end, font_name: first.font_name.clone() };

    for unit in rest {
        if unit.is_blank() || unit.font_name == current.font_name {
            current.end = unit.end;
            continue;
        }

        let next = Run { start: unit.start, end: unit.end, font_name: unit.font_name.clone() };
        runs.push(std::mem::replace(&mut current, next));
    }

    runs.push(current);
    runs
}

/// Like [`segment`], but keeps the host's end-of-document mark out of the last
/// run when the selection reaches it.
///
/// `document_end` is the exclusive end offset of the whole document. The mark
/// is the final character of the document and is only excluded when the last
/// unit is blank, so real text is never cut.
pub fn segment_selection(units: &[TextUnit], document_end: usize) -> Vec<Run> {
    let mut runs = segment(units);

    let reaches_end = units.last().is_some_and(|unit| unit.end == document_end && unit.is_blank());
    if reaches_end {
        if let Some(last) = runs.last_mut() {
            if last.end > last.start {
                last.end -= 1;
            }
        }
    }

    runs
}
