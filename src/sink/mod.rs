//! The event surface between the rendering engine and output formats.
//!
//! The engine never formats output itself. It drives an implementation of
//! the [`Sink`] trait through an ordered stream of structural events and
//! guarantees their nesting: every `open_*` gets a matching `close_*`,
//! deeper elements close before shallower ones, and at most one verse and
//! one chapter milestone are open at any point. What each event *looks
//! like* in the output is entirely the sink's business.
//!
//! Reference sinks in this module:
//! - [`RecordingSink`] — every event captured as a value; the backbone of
//!   the test suite and a debugging aid for writer authors
//! - [`TextSink`] — plain text with `[n]`-style note anchors
//! - [`OsisSink`] — OSIS-flavored XML with milestone verse tags

use std::io;

use crate::model::{AnnotationSpan, ParagraphStyle, SectionKind};
use crate::render::{NoteId, NoteKind, NoteRecord};

mod recording;
mod text;
mod xml;

pub use recording::{RecordingSink, SinkEvent};
pub use text::TextSink;
pub use xml::OsisSink;

/// Consumer of structural render events, implemented by each concrete
/// output format.
///
/// Write methods take the sink's own I/O path; an `Err` aborts the current
/// (book, sink) pair. [`note_anchor`](Sink::note_anchor) and
/// [`figure`](Sink::figure) return the inline piece the splicer inserts
/// into the growing text instead of writing directly, because anchors land
/// *inside* a text fragment that is flushed later.
pub trait Sink {
    fn begin_book(&mut self, book_id: &str) -> io::Result<()>;
    fn end_book(&mut self) -> io::Result<()>;

    /// A main or alternate title. No structural state is involved.
    fn write_title(&mut self, level: u8, alternate: bool, text: &str) -> io::Result<()>;

    fn open_section(&mut self, kind: SectionKind, heading: Option<&str>) -> io::Result<()>;
    fn close_section(&mut self, kind: SectionKind) -> io::Result<()>;

    fn open_paragraph(&mut self, style: ParagraphStyle) -> io::Result<()>;
    fn close_paragraph(&mut self) -> io::Result<()>;

    fn open_quote_level(&mut self, level: u8) -> io::Result<()>;
    fn close_quote_level(&mut self, level: u8) -> io::Result<()>;

    fn open_list_level(&mut self, level: u8) -> io::Result<()>;
    fn close_list_level(&mut self, level: u8) -> io::Result<()>;

    /// Chapter milestone start. `id` is the canonical chapter id
    /// (`"Gen.3"`).
    fn open_chapter(&mut self, id: &str) -> io::Result<()>;
    fn close_chapter(&mut self, id: &str) -> io::Result<()>;

    /// Verse milestone start. `ids` holds one canonical id per bound
    /// (`["Gen.3.16", "Gen.3.17"]`); `combined` is the start/end pair id
    /// (`"Gen.3.16-Gen.3.17"`).
    fn open_verse(&mut self, ids: &[String], combined: &str) -> io::Result<()>;
    fn close_verse(&mut self, ids: &[String], combined: &str) -> io::Result<()>;

    /// One composed text fragment, annotations spliced in and styles
    /// balanced, break indicator already appended when the fragment ends a
    /// line.
    fn write_text(&mut self, text: &str) -> io::Result<()>;

    /// The inline anchor for note `id`, returned for splicing. Called
    /// exactly once per note, in emission order. A sink that wants anchors
    /// as standoff events can record the call and return an empty string.
    fn note_anchor(&mut self, kind: NoteKind, id: NoteId) -> String;

    /// The inline rendering of a figure annotation, returned for splicing.
    fn figure(&mut self, span: &AnnotationSpan) -> String {
        span.clean_body.clone()
    }

    /// One accumulated note at the end-of-book flush, in per-kind
    /// allocation order. `record.anchor` carries the verse address for the
    /// back-link.
    fn write_note_record(&mut self, record: &NoteRecord) -> io::Result<()>;

    /// Appended to a held text fragment when the following entry starts a
    /// new line. Formats that break lines structurally return the default
    /// empty string.
    fn break_indicator(&self) -> String {
        String::new()
    }
}
