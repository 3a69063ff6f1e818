//! The structural state machine.
//!
//! Folds a book's entry stream into ordered sink events. The machine owns
//! all mutable render state for one book; the splicer, balancer, milestone
//! tracker, and note registry are driven from here. Two rules shape every
//! transition:
//!
//! - **Closing discipline**: opening a structural element force-closes,
//!   deepest first, every open element at an equal-or-deeper nesting
//!   level. Nesting order, shallowest to deepest: major section, section,
//!   subsection, paragraph, quotation/list levels. Verse and chapter
//!   milestones are standoff and come down on the tracker's own schedule.
//! - **One-entry lag**: a composed text fragment is held until the next
//!   entry arrives. If that entry starts a new line, the fragment gets the
//!   sink's break indicator appended before it is flushed; several target
//!   encodings attach the break to the end of the preceding line, and the
//!   boundary marker itself carries no text to attach it to.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::model::{
    AnnotationKind, AnnotationSpan, Entry, Marker, ParagraphStyle, SectionKind, VerseAddress,
    chapter_id,
};
use crate::report::{RenderReport, Warning};
use crate::sink::Sink;

use super::balance::balance;
use super::milestone::MilestoneTracker;
use super::notes::{NoteKind, NoteRecord, NoteRegistry};
use super::splice::splice;

/// Renderer configuration, threaded in at construction. Nothing here is
/// global.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Promote the first data-quality warning to [`Error::Strict`].
    /// Rendering pipelines that must reject imperfect source data set
    /// this; the default is to repair, report, and continue.
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelKind {
    Quote,
    List,
}

/// Everything mutable about one book's render. Created at `begin_book`,
/// force-closed and discarded at `end_book`.
#[derive(Debug)]
struct RenderState {
    book: String,
    chapter: Option<String>,
    sections: Vec<SectionKind>,
    paragraph: Option<ParagraphStyle>,
    /// Open quotation/poetry and list levels, in opening order.
    levels: Vec<(LevelKind, u8)>,
    /// The held output fragment (one-entry lag).
    lag: Option<String>,
    /// Address of the open verse, anchoring any notes rendered inside it.
    address: Option<VerseAddress>,
    tracker: MilestoneTracker,
    registry: NoteRegistry,
    report: RenderReport,
}

impl RenderState {
    fn new(book_id: &str) -> Self {
        Self {
            book: book_id.to_owned(),
            chapter: None,
            sections: Vec::new(),
            paragraph: None,
            levels: Vec::new(),
            lag: None,
            address: None,
            tracker: MilestoneTracker::new(),
            registry: NoteRegistry::new(),
            report: RenderReport::new(),
        }
    }

    /// The verse address notes anchor to right now. Outside any verse the
    /// anchor degrades to the chapter (or chapter 1 before any chapter).
    fn anchor(&self) -> VerseAddress {
        match &self.address {
            Some(address) => address.clone(),
            None => VerseAddress::new(
                self.book.clone(),
                self.chapter.clone().unwrap_or_else(|| "1".to_owned()),
                Vec::new(),
            ),
        }
    }
}

fn section_depth(kind: SectionKind) -> u8 {
    match kind {
        SectionKind::MajorSection => 0,
        SectionKind::Section => 1,
        SectionKind::Subsection => 2,
    }
}

/// The rendering engine for one sink.
///
/// Protocol: `begin_book`, any number of `push`, `end_book`; or the
/// [`render_book`](Renderer::render_book) convenience fold. Driving the
/// machine out of protocol (pushing with no open book, beginning twice)
/// is a programmer defect and panics — unlike data-quality problems in
/// the entries themselves, which are always repaired and reported.
#[derive(Debug)]
pub struct Renderer<'s, S: Sink> {
    sink: &'s mut S,
    options: RenderOptions,
    state: Option<RenderState>,
}

impl<'s, S: Sink> Renderer<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self::with_options(sink, RenderOptions::default())
    }

    pub fn with_options(sink: &'s mut S, options: RenderOptions) -> Self {
        Self { sink, options, state: None }
    }

    /// Start a book. Panics if a book is already open.
    pub fn begin_book(&mut self, book_id: &str) -> Result<()> {
        assert!(
            self.state.is_none(),
            "Renderer::begin_book called while a book is open"
        );
        self.sink.begin_book(book_id)?;
        self.state = Some(RenderState::new(book_id));
        Ok(())
    }

    /// Process one entry. Panics if no book is open.
    pub fn push(&mut self, entry: &Entry) -> Result<()> {
        let state = self
            .state
            .as_mut()
            .expect("Renderer::push called with no open book");
        state.report.entries += 1;
        let warnings_before = state.report.warnings.len();
        Self::transition(self.sink, state, entry)?;
        if self.options.strict {
            if let Some(warning) = state.report.warnings.get(warnings_before) {
                return Err(Error::Strict(warning.clone()));
            }
        }
        Ok(())
    }

    /// Finish the book: flush the lag buffer, force-close every open
    /// structure deepest-first, close milestones, flush the note registry,
    /// and return the book's report. Panics if no book is open.
    pub fn end_book(&mut self) -> Result<RenderReport> {
        let mut state = self
            .state
            .take()
            .expect("Renderer::end_book called with no open book");
        let sink = &mut *self.sink;
        // Book end is a line boundary.
        Self::flush_lag(sink, &mut state, true)?;
        Self::close_levels(sink, &mut state, 1)?;
        Self::close_paragraph(sink, &mut state)?;
        while let Some(kind) = state.sections.pop() {
            sink.close_section(kind)?;
        }
        state.tracker.close_document(sink)?;
        for record in state.registry.flush_all() {
            sink.write_note_record(&record)?;
        }
        sink.end_book()?;
        Ok(state.report)
    }

    /// Render a whole book: `begin_book`, every entry, `end_book`.
    pub fn render_book(&mut self, book_id: &str, entries: &[Entry]) -> Result<RenderReport> {
        let never = AtomicBool::new(false);
        self.render_book_cancellable(book_id, entries, &never)
    }

    /// Like [`render_book`](Renderer::render_book), checking `cancel`
    /// between entries. A cancelled render still runs the full `end_book`
    /// force-close path before returning [`Error::Cancelled`], so the sink
    /// is left well-formed.
    pub fn render_book_cancellable(
        &mut self,
        book_id: &str,
        entries: &[Entry],
        cancel: &AtomicBool,
    ) -> Result<RenderReport> {
        self.begin_book(book_id)?;
        for entry in entries {
            if cancel.load(Ordering::Relaxed) {
                self.end_book()?;
                return Err(Error::Cancelled);
            }
            if let Err(err) = self.push(entry) {
                let _ = self.end_book();
                return Err(err);
            }
        }
        self.end_book()
    }

    fn transition(sink: &mut S, state: &mut RenderState, entry: &Entry) -> Result<()> {
        // The held fragment flushes first; boundary markers stamp the
        // break indicator onto it.
        Self::flush_lag(sink, state, entry.marker.is_boundary())?;
        match &entry.marker {
            Marker::Title { level, alternate } => {
                let text = Self::compose(sink, state, entry);
                sink.write_title((*level).clamp(1, 4), *alternate, &text)?;
            }
            Marker::Section { level, major } => {
                Self::close_levels(sink, state, 1)?;
                Self::close_paragraph(sink, state)?;
                let kind = if *major {
                    SectionKind::MajorSection
                } else if *level <= 1 {
                    SectionKind::Section
                } else {
                    SectionKind::Subsection
                };
                while let Some(&open) = state.sections.last() {
                    if section_depth(open) < section_depth(kind) {
                        break;
                    }
                    state.sections.pop();
                    sink.close_section(open)?;
                }
                let heading = Self::compose(sink, state, entry);
                let heading = if heading.is_empty() { None } else { Some(heading) };
                sink.open_section(kind, heading.as_deref())?;
                state.sections.push(kind);
            }
            Marker::Paragraph { style } => {
                Self::close_levels(sink, state, 1)?;
                Self::close_paragraph(sink, state)?;
                sink.open_paragraph(*style)?;
                state.paragraph = Some(*style);
                Self::hold_text(sink, state, entry);
            }
            Marker::Quote { level } => {
                let level = (*level).clamp(1, 4);
                Self::close_levels(sink, state, level)?;
                sink.open_quote_level(level)?;
                state.levels.push((LevelKind::Quote, level));
                Self::hold_text(sink, state, entry);
            }
            Marker::ListItem { level } => {
                let level = (*level).clamp(1, 4);
                Self::close_levels(sink, state, level)?;
                sink.open_list_level(level)?;
                state.levels.push((LevelKind::List, level));
                Self::hold_text(sink, state, entry);
            }
            Marker::Chapter => {
                let number = entry.clean_text.trim();
                if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                    state
                        .report
                        .warn(Warning::UnparseableVerseBound { text: number.to_owned() });
                }
                state.chapter = Some(number.to_owned());
                state.address = None;
                state
                    .tracker
                    .open_chapter(&chapter_id(&state.book, number), sink)?;
            }
            Marker::Verse => {
                if state.chapter.is_none() {
                    // Single-chapter books omit the chapter marker.
                    state.chapter = Some("1".to_owned());
                    state
                        .tracker
                        .open_chapter(&chapter_id(&state.book, "1"), sink)?;
                }
                let chapter = state.chapter.as_deref().unwrap_or("1").to_owned();
                let address = VerseAddress::parse(
                    &state.book,
                    &chapter,
                    entry.clean_text.trim(),
                    &mut state.report,
                );
                state.tracker.open_verse(&address, sink)?;
                state.report.verses += 1;
                state.address = Some(address);
            }
            Marker::VerseText | Marker::ParagraphText => {
                if state.paragraph.is_none() && state.levels.is_empty() {
                    // Imperfect data: text must not land outside all
                    // containers. An open quote/list level already is one.
                    sink.open_paragraph(ParagraphStyle::Plain)?;
                    state.paragraph = Some(ParagraphStyle::Plain);
                }
                state.lag = Some(Self::compose(sink, state, entry));
            }
            Marker::Blank => {
                // Open levels are nested inside the paragraph and come
                // down with it; no new container opens.
                Self::close_levels(sink, state, 1)?;
                Self::close_paragraph(sink, state)?;
            }
            Marker::Unknown { code } => {
                state.report.warn(Warning::UnknownMarker { code: code.clone() });
                Self::hold_text(sink, state, entry);
            }
        }
        Ok(())
    }

    /// Flush the held fragment, appending the sink's break indicator when
    /// the flushing entry starts a new line.
    fn flush_lag(sink: &mut S, state: &mut RenderState, boundary: bool) -> Result<()> {
        if let Some(mut fragment) = state.lag.take() {
            if boundary {
                fragment.push_str(&sink.break_indicator());
            }
            sink.write_text(&fragment)?;
        }
        Ok(())
    }

    /// Close open quote/list levels at `min_level` or deeper, deepest
    /// first.
    fn close_levels(sink: &mut S, state: &mut RenderState, min_level: u8) -> Result<()> {
        while let Some(&(kind, level)) = state.levels.last() {
            if level < min_level {
                break;
            }
            state.levels.pop();
            match kind {
                LevelKind::Quote => sink.close_quote_level(level)?,
                LevelKind::List => sink.close_list_level(level)?,
            }
        }
        Ok(())
    }

    fn close_paragraph(sink: &mut S, state: &mut RenderState) -> Result<()> {
        if state.paragraph.take().is_some() {
            sink.close_paragraph()?;
        }
        Ok(())
    }

    /// Compose the entry's text and hold it in the lag buffer, if there is
    /// anything to hold.
    fn hold_text(sink: &mut S, state: &mut RenderState, entry: &Entry) {
        if !entry.clean_text.is_empty() || !entry.annotations.is_empty() {
            state.lag = Some(Self::compose(sink, state, entry));
        }
    }

    /// Compose one entry's output fragment: render each annotation to its
    /// inline piece (allocating note ids in emission order), splice the
    /// pieces into the clean text, and balance character styles.
    fn compose(sink: &mut S, state: &mut RenderState, entry: &Entry) -> String {
        let mut pieces = Vec::with_capacity(entry.annotations.len());
        for span in &entry.annotations {
            pieces.push(Self::render_annotation(sink, state, span));
        }
        let mut pieces = pieces.into_iter();
        let spliced = splice(
            &entry.clean_text,
            &entry.annotations,
            |_| pieces.next().unwrap_or_default(),
            &mut state.report,
        );
        balance(&spliced, &mut state.report)
    }

    fn render_annotation(sink: &mut S, state: &mut RenderState, span: &AnnotationSpan) -> String {
        let Some(kind) = NoteKind::from_annotation(span.kind) else {
            debug_assert_eq!(span.kind, AnnotationKind::Figure);
            return sink.figure(span);
        };
        let id = state.registry.allocate(kind);
        let body = balance(&span.clean_body, &mut state.report);
        state.registry.record(NoteRecord {
            kind,
            id,
            anchor: state.anchor(),
            body,
        });
        state.report.notes += 1;
        sink.note_anchor(kind, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordingSink, SinkEvent};

    fn paragraph() -> Entry {
        Entry::new(Marker::Paragraph { style: ParagraphStyle::Plain }, "")
    }

    fn verse(n: &str) -> Entry {
        Entry::new(Marker::Verse, n)
    }

    fn verse_text(text: &str) -> Entry {
        Entry::new(Marker::VerseText, text)
    }

    #[test]
    #[should_panic(expected = "no open book")]
    fn push_without_begin_panics() {
        let mut sink = RecordingSink::new();
        let mut renderer = Renderer::new(&mut sink);
        let _ = renderer.push(&paragraph());
    }

    #[test]
    #[should_panic(expected = "no open book")]
    fn end_without_begin_panics() {
        let mut sink = RecordingSink::new();
        let mut renderer = Renderer::new(&mut sink);
        let _ = renderer.end_book();
    }

    #[test]
    #[should_panic(expected = "while a book is open")]
    fn double_begin_panics() {
        let mut sink = RecordingSink::new();
        let mut renderer = Renderer::new(&mut sink);
        renderer.begin_book("Gen").unwrap();
        let _ = renderer.begin_book("Exo");
    }

    #[test]
    fn lag_buffer_gets_break_indicator_before_a_boundary() {
        struct BreakSink(RecordingSink);
        impl Sink for BreakSink {
            fn begin_book(&mut self, b: &str) -> std::io::Result<()> { self.0.begin_book(b) }
            fn end_book(&mut self) -> std::io::Result<()> { self.0.end_book() }
            fn write_title(&mut self, l: u8, a: bool, t: &str) -> std::io::Result<()> {
                self.0.write_title(l, a, t)
            }
            fn open_section(&mut self, k: SectionKind, h: Option<&str>) -> std::io::Result<()> {
                self.0.open_section(k, h)
            }
            fn close_section(&mut self, k: SectionKind) -> std::io::Result<()> {
                self.0.close_section(k)
            }
            fn open_paragraph(&mut self, s: ParagraphStyle) -> std::io::Result<()> {
                self.0.open_paragraph(s)
            }
            fn close_paragraph(&mut self) -> std::io::Result<()> { self.0.close_paragraph() }
            fn open_quote_level(&mut self, l: u8) -> std::io::Result<()> {
                self.0.open_quote_level(l)
            }
            fn close_quote_level(&mut self, l: u8) -> std::io::Result<()> {
                self.0.close_quote_level(l)
            }
            fn open_list_level(&mut self, l: u8) -> std::io::Result<()> {
                self.0.open_list_level(l)
            }
            fn close_list_level(&mut self, l: u8) -> std::io::Result<()> {
                self.0.close_list_level(l)
            }
            fn open_chapter(&mut self, i: &str) -> std::io::Result<()> { self.0.open_chapter(i) }
            fn close_chapter(&mut self, i: &str) -> std::io::Result<()> { self.0.close_chapter(i) }
            fn open_verse(&mut self, i: &[String], c: &str) -> std::io::Result<()> {
                self.0.open_verse(i, c)
            }
            fn close_verse(&mut self, i: &[String], c: &str) -> std::io::Result<()> {
                self.0.close_verse(i, c)
            }
            fn write_text(&mut self, t: &str) -> std::io::Result<()> { self.0.write_text(t) }
            fn note_anchor(&mut self, k: NoteKind, i: crate::render::NoteId) -> String {
                self.0.note_anchor(k, i)
            }
            fn write_note_record(&mut self, r: &NoteRecord) -> std::io::Result<()> {
                self.0.write_note_record(r)
            }
            fn break_indicator(&self) -> String {
                "<BR>".to_owned()
            }
        }

        let mut sink = BreakSink(RecordingSink::new());
        let mut renderer = Renderer::new(&mut sink);
        renderer.begin_book("Gen").unwrap();
        renderer.push(&paragraph()).unwrap();
        renderer.push(&verse("1")).unwrap();
        renderer.push(&verse_text("first line")).unwrap();
        renderer.push(&verse("2")).unwrap();
        renderer.push(&verse_text("second line")).unwrap();
        renderer.push(&paragraph()).unwrap();
        renderer.end_book().unwrap();

        let texts: Vec<&str> = sink
            .0
            .events()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::WriteText { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        // A verse marker is not a line boundary; a paragraph is. The book
        // end is always a boundary, but the lag is empty by then here.
        assert_eq!(texts, vec!["first line", "second line<BR>"]);
    }

    #[test]
    fn strict_mode_promotes_warnings() {
        let mut sink = RecordingSink::new();
        let mut renderer =
            Renderer::with_options(&mut sink, RenderOptions { strict: true });
        renderer.begin_book("Gen").unwrap();
        let err = renderer
            .push(&Entry::new(Marker::Unknown { code: "zz".into() }, "odd"))
            .unwrap_err();
        assert!(matches!(err, Error::Strict(Warning::UnknownMarker { .. })));
    }

    #[test]
    fn unknown_marker_text_passes_through() {
        let mut sink = RecordingSink::new();
        let mut renderer = Renderer::new(&mut sink);
        renderer.begin_book("Gen").unwrap();
        renderer.push(&paragraph()).unwrap();
        renderer
            .push(&Entry::new(Marker::Unknown { code: "zz".into() }, "opaque run"))
            .unwrap();
        let report = renderer.end_book().unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(sink.events().contains(&SinkEvent::WriteText { text: "opaque run".into() }));
    }

    #[test]
    fn verse_before_chapter_assumes_chapter_one() {
        let mut sink = RecordingSink::new();
        let mut renderer = Renderer::new(&mut sink);
        renderer.begin_book("Jud").unwrap();
        renderer.push(&verse("3")).unwrap();
        let report = renderer.end_book().unwrap();
        assert!(report.is_clean());
        assert!(sink.events().contains(&SinkEvent::OpenChapter { id: "Jud.1".into() }));
        assert!(sink.events().contains(&SinkEvent::OpenVerse {
            ids: vec!["Jud.1.3".into()],
            combined: "Jud.1.3".into(),
        }));
    }
}
