//! # versicle
//!
//! A rendering engine for marker-based scripture books. versicle ingests
//! a parsed, linear representation of one book — titles, section
//! headings, paragraphs, verses, inline annotations — and drives an
//! abstract [`Sink`] through an ordered stream of structural events that
//! any concrete output format (XML dialects, wiki markup, indexed module
//! formats, plain text) can turn into its own markup.
//!
//! The engine owns the parts every format needs and none should
//! duplicate:
//!
//! - a structural state machine that nests sections, paragraphs, and
//!   quotation/list levels correctly no matter how unbalanced the input
//!   marker stream is
//! - an annotation splicer that re-inserts rendered footnote and
//!   cross-reference anchors into growing text at character-accurate
//!   positions
//! - a character-style balancer that never emits malformed markup
//! - a verse/chapter milestone tracker with bridged and listed verse
//!   numbers and canonical reference ids
//! - a monotonic note registry for back-linked end-notes
//!
//! ## Quick start
//!
//! ```
//! use versicle::{Entry, Marker, ParagraphStyle, Renderer, TextSink};
//!
//! let entries = vec![
//!     Entry::new(Marker::Chapter, "1"),
//!     Entry::new(Marker::Paragraph { style: ParagraphStyle::Plain }, ""),
//!     Entry::new(Marker::Verse, "1"),
//!     Entry::new(Marker::VerseText, "In the beginning"),
//! ];
//!
//! let mut sink = TextSink::new(Vec::new());
//! let mut renderer = Renderer::new(&mut sink);
//! let report = renderer.render_book("Gen", &entries)?;
//! assert!(report.is_clean());
//!
//! let output = String::from_utf8(sink.into_inner()).unwrap();
//! assert!(output.contains("In the beginning"));
//! # Ok::<(), versicle::Error>(())
//! ```
//!
//! Imperfect source data never aborts a render: bad annotation offsets
//! are clamped, unbalanced styles repaired, unknown markers passed
//! through, and every repair is reported in the returned
//! [`RenderReport`]. Only sink I/O failures (and, optionally, strict
//! mode) are errors.

pub mod batch;
pub mod error;
pub mod model;
pub mod render;
pub mod report;
pub mod sink;

pub use error::{Error, Result};
pub use model::{
    AnnotationKind, AnnotationSpan, Entry, Marker, ParagraphStyle, SectionKind, VerseAddress,
};
pub use render::{NoteId, NoteKind, NoteRecord, RenderOptions, Renderer};
pub use report::{RenderReport, Warning};
pub use sink::{OsisSink, RecordingSink, Sink, SinkEvent, TextSink};
