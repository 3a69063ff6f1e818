//! Document model for the linear book stream.
//!
//! This module contains:
//! - Entry and marker kinds (one linear content unit each)
//! - Inline annotation spans (footnotes, cross-references, figures)
//! - Verse addresses and canonical milestone identifiers
//!
//! Everything here is an immutable value type; the renderer owns entries
//! read-only for the duration of one book's render.

mod annotation;
mod entry;
mod reference;

pub use annotation::{AnnotationKind, AnnotationSpan};
pub use entry::{Entry, Marker, ParagraphStyle, SectionKind};
pub use reference::{VerseAddress, chapter_id};
