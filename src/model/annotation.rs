//! Inline annotations anchored to an entry's clean text.

/// Kind of an inline annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum AnnotationKind {
    /// A footnote, numbered and flushed at book end.
    Footnote,
    /// An end-note, numbered separately from footnotes.
    Endnote,
    /// A cross-reference to other passages.
    CrossReference,
    /// An inline figure/illustration. Figures are rendered in place and
    /// never enter the note registry.
    Figure,
}

/// One inline annotation anchored at a character offset into an entry's
/// `clean_text`.
///
/// `original_offset` is the index in the *original* clean text; the
/// splicer compensates for earlier insertions. An offset outside the text
/// is legal to construct: the renderer clamps it at use and reports an
/// [`OffsetOutOfRange`](crate::report::Warning::OffsetOutOfRange) warning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationSpan {
    pub kind: AnnotationKind,
    /// Character index into the original clean text, `0 ..= len`.
    pub original_offset: usize,
    /// Unrendered nested marker content.
    #[cfg_attr(feature = "cli", serde(default))]
    pub raw_body: String,
    /// Body text with embedded codes removed.
    #[cfg_attr(feature = "cli", serde(default))]
    pub clean_body: String,
}

impl AnnotationSpan {
    /// Create a span whose raw and clean bodies are both `body`.
    pub fn new(kind: AnnotationKind, original_offset: usize, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            kind,
            original_offset,
            raw_body: body.clone(),
            clean_body: body,
        }
    }

    /// Create a span with distinct raw and clean bodies.
    pub fn with_bodies(
        kind: AnnotationKind,
        original_offset: usize,
        raw: impl Into<String>,
        clean: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            original_offset,
            raw_body: raw.into(),
            clean_body: clean.into(),
        }
    }
}
