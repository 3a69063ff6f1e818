//! Batch rendering tests: one artifact per book, parallel workers,
//! cancellation.

use std::fs;
use std::io::BufWriter;
use std::sync::atomic::AtomicBool;

use tempfile::TempDir;

use versicle::batch::{BookInput, BookOutcome, render_books, render_books_cancellable};
use versicle::{Entry, Marker, ParagraphStyle, RenderOptions, TextSink};

fn book(id: &str, verses: &[&str]) -> BookInput {
    let mut entries = vec![
        Entry::new(Marker::Chapter, "1"),
        Entry::new(Marker::Paragraph { style: ParagraphStyle::Plain }, ""),
    ];
    for (i, text) in verses.iter().enumerate() {
        entries.push(Entry::new(Marker::Verse, (i + 1).to_string()));
        entries.push(Entry::new(Marker::VerseText, *text));
    }
    BookInput::new(id, entries)
}

#[test]
fn one_text_artifact_per_book() {
    let dir = TempDir::new().unwrap();
    let books = vec![
        book("Gen", &["In the beginning", "And the earth"]),
        book("Exo", &["Now these are the names"]),
        book("Lev", &["And the LORD called"]),
    ];

    let results = render_books(&books, RenderOptions::default(), |id| {
        let file = fs::File::create(dir.path().join(format!("{id}.txt"))).unwrap();
        TextSink::new(BufWriter::new(file))
    });

    assert_eq!(results.len(), 3);
    for (id, outcome) in &results {
        let BookOutcome::Rendered { report, .. } = outcome else {
            panic!("{id} did not render: {outcome:?}");
        };
        assert!(report.is_clean());
    }
    // Sinks flush at end_book; drop the results to release the files.
    drop(results);

    let r#gen = fs::read_to_string(dir.path().join("Gen.txt")).unwrap();
    assert!(r#gen.contains("In the beginning"));
    let exo = fs::read_to_string(dir.path().join("Exo.txt")).unwrap();
    assert!(exo.contains("Now these are the names"));
    let lev = fs::read_to_string(dir.path().join("Lev.txt")).unwrap();
    assert!(lev.contains("And the LORD called"));
}

#[test]
fn reports_come_back_per_book() {
    let mut bad = book("Jud", &["fine text"]);
    bad.entries.push(Entry::new(Marker::Unknown { code: "zz".into() }, "odd"));
    let books = vec![book("Gen", &["clean"]), bad];

    let results = render_books(&books, RenderOptions::default(), |_| {
        TextSink::new(Vec::new())
    });
    let reports: Vec<_> = results
        .iter()
        .map(|(id, outcome)| match outcome {
            BookOutcome::Rendered { report, .. } => (id.as_str(), report.warnings.len()),
            other => panic!("{id} did not render: {other:?}"),
        })
        .collect();
    assert_eq!(reports, vec![("Gen", 0), ("Jud", 1)]);
}

#[test]
fn strict_mode_fails_only_the_offending_book() {
    let mut bad = book("Jud", &["fine text"]);
    bad.entries.push(Entry::new(Marker::Unknown { code: "zz".into() }, "odd"));
    let books = vec![book("Gen", &["clean"]), bad, book("Exo", &["also clean"])];

    let results = render_books(&books, RenderOptions { strict: true }, |_| {
        TextSink::new(Vec::new())
    });
    assert!(matches!(results[0].1, BookOutcome::Rendered { .. }));
    assert!(matches!(results[1].1, BookOutcome::Failed(_)));
    assert!(matches!(results[2].1, BookOutcome::Rendered { .. }));
}

#[test]
fn cancelled_batch_skips_unstarted_books() {
    let books = vec![book("Gen", &["a"]), book("Exo", &["b"])];
    let cancel = AtomicBool::new(true);
    let results = render_books_cancellable(
        &books,
        RenderOptions::default(),
        |_| TextSink::new(Vec::new()),
        &cancel,
    );
    for (_, outcome) in &results {
        assert!(matches!(outcome, BookOutcome::Skipped));
    }
}
