//! A sink that captures every event as a value.
//!
//! The test suite's backbone: integration tests drive the renderer into a
//! [`RecordingSink`] and assert on the recorded event sequence. Writer
//! authors can use it the same way to see exactly what event order their
//! sink will receive for a given entry stream.

use std::io;

use crate::model::{AnnotationSpan, ParagraphStyle, SectionKind};
use crate::render::{NoteId, NoteKind, NoteRecord};

use super::Sink;

/// One recorded sink event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    BeginBook { book_id: String },
    EndBook,
    WriteTitle { level: u8, alternate: bool, text: String },
    OpenSection { kind: SectionKind, heading: Option<String> },
    CloseSection { kind: SectionKind },
    OpenParagraph { style: ParagraphStyle },
    CloseParagraph,
    OpenQuoteLevel { level: u8 },
    CloseQuoteLevel { level: u8 },
    OpenListLevel { level: u8 },
    CloseListLevel { level: u8 },
    OpenChapter { id: String },
    CloseChapter { id: String },
    OpenVerse { ids: Vec<String>, combined: String },
    CloseVerse { ids: Vec<String>, combined: String },
    WriteText { text: String },
    NoteAnchor { kind: NoteKind, id: NoteId },
    Figure { body: String },
    WriteNoteRecord { record: NoteRecord },
}

/// Records events; note anchors and figures are recorded as standoff
/// events and contribute nothing to the spliced text.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The events recorded so far, in order.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Consume the sink, returning the recorded events.
    pub fn into_events(self) -> Vec<SinkEvent> {
        self.events
    }
}

impl Sink for RecordingSink {
    fn begin_book(&mut self, book_id: &str) -> io::Result<()> {
        self.events.push(SinkEvent::BeginBook { book_id: book_id.to_owned() });
        Ok(())
    }

    fn end_book(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::EndBook);
        Ok(())
    }

    fn write_title(&mut self, level: u8, alternate: bool, text: &str) -> io::Result<()> {
        self.events.push(SinkEvent::WriteTitle { level, alternate, text: text.to_owned() });
        Ok(())
    }

    fn open_section(&mut self, kind: SectionKind, heading: Option<&str>) -> io::Result<()> {
        self.events.push(SinkEvent::OpenSection { kind, heading: heading.map(str::to_owned) });
        Ok(())
    }

    fn close_section(&mut self, kind: SectionKind) -> io::Result<()> {
        self.events.push(SinkEvent::CloseSection { kind });
        Ok(())
    }

    fn open_paragraph(&mut self, style: ParagraphStyle) -> io::Result<()> {
        self.events.push(SinkEvent::OpenParagraph { style });
        Ok(())
    }

    fn close_paragraph(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::CloseParagraph);
        Ok(())
    }

    fn open_quote_level(&mut self, level: u8) -> io::Result<()> {
        self.events.push(SinkEvent::OpenQuoteLevel { level });
        Ok(())
    }

    fn close_quote_level(&mut self, level: u8) -> io::Result<()> {
        self.events.push(SinkEvent::CloseQuoteLevel { level });
        Ok(())
    }

    fn open_list_level(&mut self, level: u8) -> io::Result<()> {
        self.events.push(SinkEvent::OpenListLevel { level });
        Ok(())
    }

    fn close_list_level(&mut self, level: u8) -> io::Result<()> {
        self.events.push(SinkEvent::CloseListLevel { level });
        Ok(())
    }

    fn open_chapter(&mut self, id: &str) -> io::Result<()> {
        self.events.push(SinkEvent::OpenChapter { id: id.to_owned() });
        Ok(())
    }

    fn close_chapter(&mut self, id: &str) -> io::Result<()> {
        self.events.push(SinkEvent::CloseChapter { id: id.to_owned() });
        Ok(())
    }

    fn open_verse(&mut self, ids: &[String], combined: &str) -> io::Result<()> {
        self.events.push(SinkEvent::OpenVerse { ids: ids.to_vec(), combined: combined.to_owned() });
        Ok(())
    }

    fn close_verse(&mut self, ids: &[String], combined: &str) -> io::Result<()> {
        self.events.push(SinkEvent::CloseVerse { ids: ids.to_vec(), combined: combined.to_owned() });
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.events.push(SinkEvent::WriteText { text: text.to_owned() });
        Ok(())
    }

    fn note_anchor(&mut self, kind: NoteKind, id: NoteId) -> String {
        self.events.push(SinkEvent::NoteAnchor { kind, id });
        String::new()
    }

    fn figure(&mut self, span: &AnnotationSpan) -> String {
        self.events.push(SinkEvent::Figure { body: span.clean_body.clone() });
        String::new()
    }

    fn write_note_record(&mut self, record: &NoteRecord) -> io::Result<()> {
        self.events.push(SinkEvent::WriteNoteRecord { record: record.clone() });
        Ok(())
    }
}
