//! Parallel per-book rendering.
//!
//! One book's render is a synchronous fold, so different books of the
//! same work render concurrently without coordination: each worker owns
//! its book's entries, a fresh renderer, and a sink built by the caller's
//! factory. Results come back in input order. A shared flag cancels at
//! book granularity — books already started still run the `end_book`
//! force-close so their sinks are left well-formed; books not yet started
//! are skipped.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::Error;
use crate::model::Entry;
use crate::render::{RenderOptions, Renderer};
use crate::report::RenderReport;
use crate::sink::Sink;

/// One book's input: its id and fully-materialized entry stream.
#[derive(Debug, Clone)]
pub struct BookInput {
    pub id: String,
    pub entries: Vec<Entry>,
}

impl BookInput {
    pub fn new(id: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self { id: id.into(), entries }
    }
}

/// What happened to one book.
#[derive(Debug)]
pub enum BookOutcome<S> {
    /// Rendered to completion; the sink holds the output artifact.
    Rendered { sink: S, report: RenderReport },
    /// Started, then cancelled between entries. The sink was force-closed
    /// and is well-formed but incomplete.
    Cancelled { sink: S },
    /// Failed; fatal for this (book, sink) pair only.
    Failed(Error),
    /// Cancellation was requested before this book started.
    Skipped,
}

/// Render every book, one rayon task per book, results in input order.
pub fn render_books<S, F>(
    books: &[BookInput],
    options: RenderOptions,
    make_sink: F,
) -> Vec<(String, BookOutcome<S>)>
where
    S: Sink + Send,
    F: Fn(&str) -> S + Sync,
{
    let never = AtomicBool::new(false);
    render_books_cancellable(books, options, make_sink, &never)
}

/// Like [`render_books`], checking `cancel` before each book and between
/// entries within a book.
pub fn render_books_cancellable<S, F>(
    books: &[BookInput],
    options: RenderOptions,
    make_sink: F,
    cancel: &AtomicBool,
) -> Vec<(String, BookOutcome<S>)>
where
    S: Sink + Send,
    F: Fn(&str) -> S + Sync,
{
    books
        .par_iter()
        .map(|book| {
            if cancel.load(Ordering::Relaxed) {
                return (book.id.clone(), BookOutcome::Skipped);
            }
            let mut sink = make_sink(&book.id);
            let mut renderer = Renderer::with_options(&mut sink, options);
            let outcome =
                match renderer.render_book_cancellable(&book.id, &book.entries, cancel) {
                    Ok(report) => BookOutcome::Rendered { sink, report },
                    Err(Error::Cancelled) => BookOutcome::Cancelled { sink },
                    Err(err) => BookOutcome::Failed(err),
                };
            (book.id.clone(), outcome)
        })
        .collect()
}
