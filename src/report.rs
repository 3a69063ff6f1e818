//! Per-book render diagnostics.
//!
//! The engine never aborts on imperfect source data. Every recoverable
//! condition appends a [`Warning`] to the book's [`RenderReport`], which
//! [`Renderer::end_book`](crate::render::Renderer::end_book) returns to the
//! caller. Callers decide what to do with warnings; the library itself does
//! no logging.

use std::collections::HashSet;
use std::fmt;

/// How an unbalanced character style was repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum StyleRepair {
    /// An open style was closed with a dangling end code.
    ForceClosed,
    /// A close code arrived with nothing open and was dropped.
    Dropped,
}

/// A recoverable data-quality condition observed during rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(tag = "type", rename_all = "snake_case"))]
pub enum Warning {
    /// An annotation anchor lay outside its entry's text. The offset was
    /// clamped to the nearest valid boundary.
    OffsetOutOfRange { offset: usize, len: usize },

    /// A character style code did not pair up and was repaired.
    UnbalancedStyle { code: String, repair: StyleRepair },

    /// A marker absent from the transition table. Its text was passed
    /// through as an opaque content run. Reported once per distinct code
    /// per book.
    UnknownMarker { code: String },

    /// A verse (or chapter) bound that is not a plain number. The literal
    /// text was used verbatim in milestone identifiers.
    UnparseableVerseBound { text: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::OffsetOutOfRange { offset, len } => {
                write!(f, "annotation offset {offset} outside text of length {len}; clamped")
            }
            Warning::UnbalancedStyle { code, repair: StyleRepair::ForceClosed } => {
                write!(f, "style \\{code} left open; force-closed")
            }
            Warning::UnbalancedStyle { code, repair: StyleRepair::Dropped } => {
                write!(f, "close code \\{code}* with no open style; dropped")
            }
            Warning::UnknownMarker { code } => {
                write!(f, "unknown marker \\{code}; text passed through")
            }
            Warning::UnparseableVerseBound { text } => {
                write!(f, "verse bound {text:?} is not numeric; used verbatim")
            }
        }
    }
}

/// Aggregate diagnostics for one book's render.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct RenderReport {
    /// Warnings in the order they were observed.
    pub warnings: Vec<Warning>,
    /// Entries processed.
    pub entries: usize,
    /// Verse milestones opened.
    pub verses: usize,
    /// Notes allocated and recorded.
    pub notes: usize,
    #[cfg_attr(feature = "cli", serde(skip))]
    seen_markers: HashSet<String>,
}

impl RenderReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no warnings were recorded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Record a warning. `UnknownMarker` is deduplicated per distinct code.
    pub(crate) fn warn(&mut self, warning: Warning) {
        if let Warning::UnknownMarker { code } = &warning {
            if !self.seen_markers.insert(code.clone()) {
                return;
            }
        }
        self.warnings.push(warning);
    }
}
