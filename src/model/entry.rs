//! Entry and marker types for the linear book stream.

use super::annotation::AnnotationSpan;

/// Paragraph styles carried by paragraph-start markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum ParagraphStyle {
    /// Plain body paragraph.
    #[default]
    Plain,
    /// First-line indented paragraph.
    Indented,
    /// Flush-left margin paragraph.
    Margin,
    /// Centered paragraph.
    Centered,
}

/// Structural kind of an open section container.
///
/// Derived from a [`Marker::Section`]: `major` headings open a
/// `MajorSection`, level-1 headings a `Section`, deeper levels a
/// `Subsection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum SectionKind {
    MajorSection,
    Section,
    Subsection,
}

/// Tagged kind of one [`Entry`].
///
/// The upstream parser classifies each linear unit of a book into one of
/// these kinds. Levels are 1-4; the renderer clamps out-of-range levels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(tag = "type", rename_all = "snake_case"))]
pub enum Marker {
    /// Main or alternate book title. Emitted directly; no structural state
    /// change.
    Title {
        level: u8,
        #[cfg_attr(feature = "cli", serde(default))]
        alternate: bool,
    },
    /// Section heading. Level 1 opens a section, levels 2-4 open
    /// subsections; `major` marks a major section above level 1.
    Section {
        level: u8,
        #[cfg_attr(feature = "cli", serde(default))]
        major: bool,
    },
    /// Paragraph start. Any text on the entry flows into the new paragraph.
    Paragraph {
        #[cfg_attr(feature = "cli", serde(default))]
        style: ParagraphStyle,
    },
    /// Quotation/poetry line at a level.
    Quote { level: u8 },
    /// List item at a level. Bullet or number prefixes are the sink's
    /// business.
    ListItem { level: u8 },
    /// Chapter start. The chapter number is the entry's `clean_text`.
    Chapter,
    /// Verse start. The number, bridge (`16-17`) or list (`16,18`) is the
    /// entry's `clean_text`.
    Verse,
    /// Continuation text inside the open verse.
    VerseText,
    /// Continuation text outside any verse.
    ParagraphText,
    /// Explicit blank line. Closes the open paragraph and nothing else.
    Blank,
    /// A marker code the transition table does not know. Its text is
    /// passed through as an opaque content run.
    Unknown { code: String },
}

impl Marker {
    /// Whether an entry of this kind ends the line the previous entry was
    /// composing.
    ///
    /// The machine holds each composed text fragment until the next entry
    /// arrives; if that entry is a boundary, the held fragment gets the
    /// sink's break indicator appended before it is flushed.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            Marker::Title { .. }
                | Marker::Section { .. }
                | Marker::Paragraph { .. }
                | Marker::Quote { .. }
                | Marker::ListItem { .. }
                | Marker::Chapter
                | Marker::Blank
        )
    }
}

/// One linear content unit of a book's marker stream.
///
/// Entries are produced upstream, fully materialized before rendering
/// begins, and owned read-only by the renderer. The renderer works from
/// `clean_text` (annotation offsets are character indices into it);
/// `raw_text` and `adjusted_text` ride along for sinks and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    pub marker: Marker,
    /// Text as parsed from the source.
    #[cfg_attr(feature = "cli", serde(default))]
    pub raw_text: String,
    /// `raw_text` with leading codes normalized.
    #[cfg_attr(feature = "cli", serde(default))]
    pub adjusted_text: String,
    /// Plain text with no embedded codes; the renderer's input.
    #[cfg_attr(feature = "cli", serde(default))]
    pub clean_text: String,
    /// Inline annotations in ascending `original_offset` order (ties keep
    /// encounter order). The renderer never reorders them.
    #[cfg_attr(feature = "cli", serde(default))]
    pub annotations: Vec<AnnotationSpan>,
}

impl Entry {
    /// Create an entry whose three text fields are all `text`.
    pub fn new(marker: Marker, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            marker,
            raw_text: text.clone(),
            adjusted_text: text.clone(),
            clean_text: text,
            annotations: Vec::new(),
        }
    }

    /// Create an entry with distinct raw/adjusted/clean text fields.
    pub fn with_texts(
        marker: Marker,
        raw: impl Into<String>,
        adjusted: impl Into<String>,
        clean: impl Into<String>,
    ) -> Self {
        Self {
            marker,
            raw_text: raw.into(),
            adjusted_text: adjusted.into(),
            clean_text: clean.into(),
            annotations: Vec::new(),
        }
    }

    /// Append an annotation span, builder-style.
    pub fn with_annotation(mut self, span: AnnotationSpan) -> Self {
        self.annotations.push(span);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_markers() {
        assert!(Marker::Paragraph { style: ParagraphStyle::Plain }.is_boundary());
        assert!(Marker::Section { level: 1, major: false }.is_boundary());
        assert!(Marker::Chapter.is_boundary());
        assert!(Marker::Blank.is_boundary());
        assert!(!Marker::Verse.is_boundary());
        assert!(!Marker::VerseText.is_boundary());
        assert!(!Marker::Unknown { code: "zz".into() }.is_boundary());
    }

    #[test]
    fn entry_builder_fills_all_text_fields() {
        let entry = Entry::new(Marker::VerseText, "In the beginning");
        assert_eq!(entry.raw_text, entry.clean_text);
        assert_eq!(entry.adjusted_text, "In the beginning");
        assert!(entry.annotations.is_empty());
    }
}
