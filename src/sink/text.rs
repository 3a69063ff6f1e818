//! Plain-text reference sink.
//!
//! Lines are driven by the engine's break indicator; paragraphs are
//! separated by blank lines; quote and list levels become indentation.
//! Note anchors render as bracketed numbers and note bodies land in a
//! final `Notes` block with their anchoring verse id.

use std::io::{self, Write};

use crate::model::{ParagraphStyle, SectionKind};
use crate::render::{NoteId, NoteKind, NoteRecord};

use super::Sink;

fn anchor_label(kind: NoteKind, id: NoteId) -> String {
    match kind {
        NoteKind::Footnote => format!("[{id}]"),
        NoteKind::Endnote => format!("[e{id}]"),
        NoteKind::CrossReference => format!("[x{id}]"),
    }
}

/// Writes a plain-text rendition of the book.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    writer: W,
    notes_started: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, notes_started: false }
    }

    /// Consume the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn begin_book(&mut self, _book_id: &str) -> io::Result<()> {
        Ok(())
    }

    fn end_book(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    fn write_title(&mut self, _level: u8, _alternate: bool, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")
    }

    fn open_section(&mut self, _kind: SectionKind, heading: Option<&str>) -> io::Result<()> {
        if let Some(heading) = heading {
            writeln!(self.writer, "\n{heading}")?;
        }
        Ok(())
    }

    fn close_section(&mut self, _kind: SectionKind) -> io::Result<()> {
        Ok(())
    }

    fn open_paragraph(&mut self, _style: ParagraphStyle) -> io::Result<()> {
        self.writer.write_all(b"\n")
    }

    fn close_paragraph(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn open_quote_level(&mut self, level: u8) -> io::Result<()> {
        for _ in 0..level {
            self.writer.write_all(b"  ")?;
        }
        Ok(())
    }

    fn close_quote_level(&mut self, _level: u8) -> io::Result<()> {
        Ok(())
    }

    fn open_list_level(&mut self, level: u8) -> io::Result<()> {
        for _ in 1..level {
            self.writer.write_all(b"  ")?;
        }
        self.writer.write_all(b"- ")
    }

    fn close_list_level(&mut self, _level: u8) -> io::Result<()> {
        Ok(())
    }

    fn open_chapter(&mut self, id: &str) -> io::Result<()> {
        writeln!(self.writer, "\n{id}")
    }

    fn close_chapter(&mut self, _id: &str) -> io::Result<()> {
        Ok(())
    }

    fn open_verse(&mut self, ids: &[String], _combined: &str) -> io::Result<()> {
        // "Gen.3.16" -> "16"; bridges render as "16-17".
        let first = ids.first().and_then(|id| id.rsplit('.').next()).unwrap_or("");
        write!(self.writer, "{first}")?;
        if ids.len() > 1 {
            let last = ids.last().and_then(|id| id.rsplit('.').next()).unwrap_or("");
            write!(self.writer, "-{last}")?;
        }
        self.writer.write_all(b" ")
    }

    fn close_verse(&mut self, _ids: &[String], _combined: &str) -> io::Result<()> {
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    fn note_anchor(&mut self, kind: NoteKind, id: NoteId) -> String {
        anchor_label(kind, id)
    }

    fn write_note_record(&mut self, record: &NoteRecord) -> io::Result<()> {
        if !self.notes_started {
            self.writer.write_all(b"\nNotes\n")?;
            self.notes_started = true;
        }
        writeln!(
            self.writer,
            "{} {}: {}",
            anchor_label(record.kind, record.id),
            record.anchor.combined_id(),
            record.body
        )
    }

    fn break_indicator(&self) -> String {
        "\n".to_owned()
    }
}
