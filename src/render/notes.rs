//! Monotonic note numbering and end-of-book note accumulation.
//!
//! Every footnote, end-note, and cross-reference gets a per-kind number
//! allocated at the moment its anchor is rendered, so numbering reflects
//! document emission order. Bodies accumulate as [`NoteRecord`]s and are
//! drained once at book end, each carrying its anchoring verse address so
//! the sink can build a back-link from the note to its verse.

use crate::model::{AnnotationKind, VerseAddress};

/// Kind of a registered note. Figures are not notes; they render in place
/// and never enter the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "snake_case"))]
pub enum NoteKind {
    Footnote,
    Endnote,
    CrossReference,
}

impl NoteKind {
    /// All kinds, in flush order.
    pub const ALL: [NoteKind; 3] = [NoteKind::Footnote, NoteKind::Endnote, NoteKind::CrossReference];

    /// The registry kind for an annotation, or `None` for figures.
    pub fn from_annotation(kind: AnnotationKind) -> Option<Self> {
        match kind {
            AnnotationKind::Footnote => Some(NoteKind::Footnote),
            AnnotationKind::Endnote => Some(NoteKind::Endnote),
            AnnotationKind::CrossReference => Some(NoteKind::CrossReference),
            AnnotationKind::Figure => None,
        }
    }

    fn index(self) -> usize {
        match self {
            NoteKind::Footnote => 0,
            NoteKind::Endnote => 1,
            NoteKind::CrossReference => 2,
        }
    }
}

/// 1-based note number, counted per kind per book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct NoteId(pub u32);

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One rendered note, held until the end-of-book flush.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct NoteRecord {
    pub kind: NoteKind,
    pub id: NoteId,
    /// The verse the anchor sits in, for the back-link.
    pub anchor: VerseAddress,
    /// Rendered body text, style-balanced.
    pub body: String,
}

/// Per-book note registry: a monotonic counter and an ordered record list
/// per kind.
#[derive(Debug, Default)]
pub struct NoteRegistry {
    counters: [u32; 3],
    records: [Vec<NoteRecord>; 3],
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id for `kind`. Ids are 1, 2, 3, ... per kind, in
    /// allocation order, independent across kinds.
    pub fn allocate(&mut self, kind: NoteKind) -> NoteId {
        let counter = &mut self.counters[kind.index()];
        *counter += 1;
        NoteId(*counter)
    }

    /// Append a record. Records keep their append order within a kind.
    pub fn record(&mut self, record: NoteRecord) {
        self.records[record.kind.index()].push(record);
    }

    /// Drain the records of one kind, preserving order.
    pub fn flush(&mut self, kind: NoteKind) -> Vec<NoteRecord> {
        std::mem::take(&mut self.records[kind.index()])
    }

    /// Drain every kind, footnotes first, then end-notes, then
    /// cross-references.
    pub fn flush_all(&mut self) -> Vec<NoteRecord> {
        let mut all = Vec::new();
        for kind in NoteKind::ALL {
            all.append(&mut self.records[kind.index()]);
        }
        all
    }

    /// True if no records are waiting to be flushed.
    pub fn is_empty(&self) -> bool {
        self.records.iter().all(Vec::is_empty)
    }
}
