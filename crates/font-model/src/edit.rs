use crate::segment::Span;
use serde::{Deserialize, Serialize};

/// Replacement of one span of host text, addressed in pre-session offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub span: Span,
    pub text: String,
    pub font_name: String,
}

impl Edit {
    pub fn new(span: Span, text: impl Into<String>, font_name: impl Into<String>) -> Self {
        Self { span, text: text.into(), font_name: font_name.into() }
    }

    pub fn replacement_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Growth (or shrinkage) of the host buffer once this edit is applied.
    pub fn delta(&self) -> isize {
        self.replacement_len() as isize - self.span.len() as isize
    }
}

/// Maps spans computed before any edit onto the live buffer.
///
/// Edits must be recorded in ascending span order; each recorded edit shifts
/// every later span by its length delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetTracker {
    delta: isize,
    last_end: usize,
}

impl OffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta(&self) -> isize {
        self.delta
    }

    /// Where `span` (pre-edit offsets) currently sits in the buffer.
    pub fn translate(&self, span: Span) -> Span {
        Span::new(shift(span.start, self.delta), shift(span.end, self.delta))
    }

    /// Whether `span` starts at or after the end of every recorded edit.
    pub fn accepts(&self, span: Span) -> bool {
        span.start >= self.last_end
    }

    /// Records an applied edit. Callers check [`OffsetTracker::accepts`]
    /// before touching the host.
    pub fn record(&mut self, edit: &Edit) {
        debug_assert!(self.accepts(edit.span), "edit {:?} recorded out of order", edit.span);

        self.delta += edit.delta();
        self.last_end = edit.span.end;
    }
}

fn shift(offset: usize, delta: isize) -> usize {
    offset.saturating_add_signed(delta)
}
