//! Verse and chapter milestone tracking.
//!
//! Verses and chapters are standoff milestones, not nested containers: a
//! start/end pair brackets a span of output that may cross paragraph and
//! section boundaries. The tracker enforces the single-open discipline at
//! both granularities — opening a milestone closes the previous one of the
//! same granularity first, and opening a chapter closes any open verse (a
//! verse never spans a chapter start).

use std::io;

use crate::model::VerseAddress;
use crate::sink::Sink;

#[derive(Debug)]
struct OpenVerse {
    ids: Vec<String>,
    combined: String,
}

/// Milestone state for one book: at most one open verse and one open
/// chapter.
#[derive(Debug, Default)]
pub struct MilestoneTracker {
    verse: Option<OpenVerse>,
    chapter: Option<String>,
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the verse milestone for `address`, closing any open verse
    /// first.
    pub fn open_verse<S: Sink>(&mut self, address: &VerseAddress, sink: &mut S) -> io::Result<()> {
        self.close_verse(sink)?;
        let ids = address.ids();
        let combined = address.combined_id();
        sink.open_verse(&ids, &combined)?;
        self.verse = Some(OpenVerse { ids, combined });
        Ok(())
    }

    /// Open the chapter milestone `id`, closing any open verse and any
    /// open chapter first.
    pub fn open_chapter<S: Sink>(&mut self, id: &str, sink: &mut S) -> io::Result<()> {
        self.close_verse(sink)?;
        self.close_chapter(sink)?;
        sink.open_chapter(id)?;
        self.chapter = Some(id.to_owned());
        Ok(())
    }

    /// Close the open verse milestone, if any.
    pub fn close_verse<S: Sink>(&mut self, sink: &mut S) -> io::Result<()> {
        if let Some(open) = self.verse.take() {
            sink.close_verse(&open.ids, &open.combined)?;
        }
        Ok(())
    }

    /// Force-close anything still open, verse before chapter. Called at
    /// book end.
    pub fn close_document<S: Sink>(&mut self, sink: &mut S) -> io::Result<()> {
        self.close_verse(sink)?;
        self.close_chapter(sink)
    }

    fn close_chapter<S: Sink>(&mut self, sink: &mut S) -> io::Result<()> {
        if let Some(id) = self.chapter.take() {
            sink.close_chapter(&id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RenderReport;
    use crate::sink::{RecordingSink, SinkEvent};

    fn address(field: &str) -> VerseAddress {
        let mut report = RenderReport::new();
        VerseAddress::parse("Gen", "3", field, &mut report)
    }

    #[test]
    fn opening_a_verse_closes_the_previous_one() {
        let mut sink = RecordingSink::new();
        let mut tracker = MilestoneTracker::new();
        tracker.open_verse(&address("16"), &mut sink).unwrap();
        tracker.open_verse(&address("17"), &mut sink).unwrap();
        assert_eq!(
            sink.events(),
            &[
                SinkEvent::OpenVerse { ids: vec!["Gen.3.16".into()], combined: "Gen.3.16".into() },
                SinkEvent::CloseVerse { ids: vec!["Gen.3.16".into()], combined: "Gen.3.16".into() },
                SinkEvent::OpenVerse { ids: vec!["Gen.3.17".into()], combined: "Gen.3.17".into() },
            ]
        );
    }

    #[test]
    fn bridged_verse_opens_with_every_bound_id() {
        let mut sink = RecordingSink::new();
        let mut tracker = MilestoneTracker::new();
        tracker.open_verse(&address("16-17"), &mut sink).unwrap();
        assert_eq!(
            sink.events(),
            &[SinkEvent::OpenVerse {
                ids: vec!["Gen.3.16".into(), "Gen.3.17".into()],
                combined: "Gen.3.16-Gen.3.17".into(),
            }]
        );
    }

    #[test]
    fn chapter_start_closes_the_open_verse() {
        let mut sink = RecordingSink::new();
        let mut tracker = MilestoneTracker::new();
        tracker.open_chapter("Gen.3", &mut sink).unwrap();
        tracker.open_verse(&address("16"), &mut sink).unwrap();
        tracker.open_chapter("Gen.4", &mut sink).unwrap();
        assert_eq!(
            sink.events(),
            &[
                SinkEvent::OpenChapter { id: "Gen.3".into() },
                SinkEvent::OpenVerse { ids: vec!["Gen.3.16".into()], combined: "Gen.3.16".into() },
                SinkEvent::CloseVerse { ids: vec!["Gen.3.16".into()], combined: "Gen.3.16".into() },
                SinkEvent::CloseChapter { id: "Gen.3".into() },
                SinkEvent::OpenChapter { id: "Gen.4".into() },
            ]
        );
    }

    #[test]
    fn close_document_closes_verse_then_chapter() {
        let mut sink = RecordingSink::new();
        let mut tracker = MilestoneTracker::new();
        tracker.open_chapter("Gen.3", &mut sink).unwrap();
        tracker.open_verse(&address("16"), &mut sink).unwrap();
        tracker.close_document(&mut sink).unwrap();
        assert_eq!(
            sink.events()[2..],
            [
                SinkEvent::CloseVerse { ids: vec!["Gen.3.16".into()], combined: "Gen.3.16".into() },
                SinkEvent::CloseChapter { id: "Gen.3".into() },
            ]
        );
    }

    #[test]
    fn close_document_with_nothing_open_is_a_no_op() {
        let mut sink = RecordingSink::new();
        let mut tracker = MilestoneTracker::new();
        tracker.close_document(&mut sink).unwrap();
        assert!(sink.events().is_empty());
    }
}
