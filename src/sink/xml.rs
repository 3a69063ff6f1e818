//! OSIS-flavored XML reference sink.
//!
//! Containers become `<div>`/`<p>`/`<l>`/`<item>` elements; chapters and
//! verses become milestone elements with `sID`/`eID` pairs; notes land in
//! a trailing `<div type="notes">` with an `osisRef` back-link to their
//! anchoring verse.
//!
//! Note anchors are a wrinkle: the anchor piece travels through the
//! splicer *inside* a text fragment, but text must be escaped and the
//! anchor element must not be. Anchors therefore ride through the splicer
//! as U+FFFC object-replacement placeholders, and `write_text` replaces
//! each placeholder with its queued `<note>` element.

use std::collections::VecDeque;
use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::model::{ParagraphStyle, SectionKind};
use crate::render::{NoteId, NoteKind, NoteRecord};

use super::Sink;

const ANCHOR_PLACEHOLDER: char = '\u{FFFC}';

fn note_type(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Footnote => "footnote",
        NoteKind::Endnote => "endnote",
        NoteKind::CrossReference => "crossReference",
    }
}

fn section_type(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::MajorSection => "majorSection",
        SectionKind::Section => "section",
        SectionKind::Subsection => "subSection",
    }
}

fn paragraph_type(style: ParagraphStyle) -> Option<&'static str> {
    match style {
        ParagraphStyle::Plain => None,
        ParagraphStyle::Indented => Some("x-indented"),
        ParagraphStyle::Margin => Some("x-margin"),
        ParagraphStyle::Centered => Some("x-centered"),
    }
}

/// Writes an OSIS-flavored XML rendition of the book.
pub struct OsisSink<W: Write> {
    writer: Writer<W>,
    pending_anchors: VecDeque<(NoteKind, NoteId)>,
    in_notes_div: bool,
}

impl<W: Write> OsisSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            pending_anchors: VecDeque::new(),
            in_notes_div: false,
        }
    }

    /// Consume the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        let mut element = BytesStart::new(name);
        for &attr in attrs {
            element.push_attribute(attr);
        }
        self.writer.write_event(Event::Start(element))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        let mut element = BytesStart::new(name);
        for &attr in attrs {
            element.push_attribute(attr);
        }
        self.writer.write_event(Event::Empty(element))
    }

    fn end(&mut self, name: &str) -> io::Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_event(Event::Text(BytesText::new(text)))
    }

    /// Write composed text, replacing each anchor placeholder with its
    /// queued `<note>` element. Titles and headings go through here too;
    /// every placeholder handed out must be substituted or the queue
    /// would desynchronize.
    fn mixed(&mut self, text: &str) -> io::Result<()> {
        for (i, part) in text.split(ANCHOR_PLACEHOLDER).enumerate() {
            if i > 0 {
                if let Some((kind, id)) = self.pending_anchors.pop_front() {
                    let n = id.to_string();
                    self.empty("note", &[("type", note_type(kind)), ("n", &n)])?;
                }
            }
            if !part.is_empty() {
                self.text(part)?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Sink for OsisSink<W> {
    fn begin_book(&mut self, book_id: &str) -> io::Result<()> {
        self.start("div", &[("type", "book"), ("osisID", book_id)])
    }

    fn end_book(&mut self) -> io::Result<()> {
        if self.in_notes_div {
            self.end("div")?;
            self.in_notes_div = false;
        }
        self.end("div")?;
        self.writer.get_mut().flush()
    }

    fn write_title(&mut self, level: u8, alternate: bool, text: &str) -> io::Result<()> {
        let level = level.to_string();
        let kind = if alternate { "alternate" } else { "main" };
        self.start("title", &[("type", kind), ("level", &level)])?;
        self.mixed(text)?;
        self.end("title")
    }

    fn open_section(&mut self, kind: SectionKind, heading: Option<&str>) -> io::Result<()> {
        self.start("div", &[("type", section_type(kind))])?;
        if let Some(heading) = heading {
            self.start("title", &[])?;
            self.mixed(heading)?;
            self.end("title")?;
        }
        Ok(())
    }

    fn close_section(&mut self, _kind: SectionKind) -> io::Result<()> {
        self.end("div")
    }

    fn open_paragraph(&mut self, style: ParagraphStyle) -> io::Result<()> {
        match paragraph_type(style) {
            Some(kind) => self.start("p", &[("type", kind)]),
            None => self.start("p", &[]),
        }
    }

    fn close_paragraph(&mut self) -> io::Result<()> {
        self.end("p")
    }

    fn open_quote_level(&mut self, level: u8) -> io::Result<()> {
        let level = level.to_string();
        self.start("l", &[("level", &level)])
    }

    fn close_quote_level(&mut self, _level: u8) -> io::Result<()> {
        self.end("l")
    }

    fn open_list_level(&mut self, level: u8) -> io::Result<()> {
        let level = level.to_string();
        self.start("item", &[("level", &level)])
    }

    fn close_list_level(&mut self, _level: u8) -> io::Result<()> {
        self.end("item")
    }

    fn open_chapter(&mut self, id: &str) -> io::Result<()> {
        self.empty("chapter", &[("sID", id), ("osisID", id)])
    }

    fn close_chapter(&mut self, id: &str) -> io::Result<()> {
        self.empty("chapter", &[("eID", id)])
    }

    fn open_verse(&mut self, ids: &[String], combined: &str) -> io::Result<()> {
        let osis_id = ids.join(" ");
        self.empty("verse", &[("sID", combined), ("osisID", &osis_id)])
    }

    fn close_verse(&mut self, _ids: &[String], combined: &str) -> io::Result<()> {
        self.empty("verse", &[("eID", combined)])
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.mixed(text)
    }

    fn note_anchor(&mut self, kind: NoteKind, id: NoteId) -> String {
        self.pending_anchors.push_back((kind, id));
        ANCHOR_PLACEHOLDER.to_string()
    }

    fn write_note_record(&mut self, record: &NoteRecord) -> io::Result<()> {
        if !self.in_notes_div {
            self.start("div", &[("type", "notes")])?;
            self.in_notes_div = true;
        }
        let n = record.id.to_string();
        let osis_ref = record.anchor.combined_id();
        self.start(
            "note",
            &[
                ("type", note_type(record.kind)),
                ("n", &n),
                ("osisRef", &osis_ref),
            ],
        )?;
        self.text(&record.body)?;
        self.end("note")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VerseAddress;

    fn output(sink: OsisSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn milestone_verse_tags() {
        let mut sink = OsisSink::new(Vec::new());
        let ids = vec!["Gen.3.16".to_owned(), "Gen.3.17".to_owned()];
        sink.open_verse(&ids, "Gen.3.16-Gen.3.17").unwrap();
        sink.close_verse(&ids, "Gen.3.16-Gen.3.17").unwrap();
        assert_eq!(
            output(sink),
            r#"<verse sID="Gen.3.16-Gen.3.17" osisID="Gen.3.16 Gen.3.17"/><verse eID="Gen.3.16-Gen.3.17"/>"#
        );
    }

    #[test]
    fn text_is_escaped() {
        let mut sink = OsisSink::new(Vec::new());
        sink.write_text("salt & <light>").unwrap();
        assert_eq!(output(sink), "salt &amp; &lt;light&gt;");
    }

    #[test]
    fn anchor_placeholder_becomes_a_note_element() {
        let mut sink = OsisSink::new(Vec::new());
        let piece = sink.note_anchor(NoteKind::Footnote, NoteId(1));
        let text = format!("beginning{piece} of");
        sink.write_text(&text).unwrap();
        assert_eq!(output(sink), r#"beginning<note type="footnote" n="1"/> of"#);
    }

    #[test]
    fn note_records_open_a_notes_div_with_back_links() {
        let mut sink = OsisSink::new(Vec::new());
        sink.write_note_record(&NoteRecord {
            kind: NoteKind::CrossReference,
            id: NoteId(1),
            anchor: VerseAddress::new("Gen", "3", vec!["16".into()]),
            body: "see Exo.1.1".into(),
        })
        .unwrap();
        sink.end_book().unwrap();
        assert_eq!(
            output(sink),
            r#"<div type="notes"><note type="crossReference" n="1" osisRef="Gen.3.16">see Exo.1.1</note></div></div>"#
        );
    }
}
