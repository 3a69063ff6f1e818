//! Error types for rendering operations.
//!
//! Only genuinely fatal conditions live here. Data-quality problems in the
//! entry stream (bad offsets, unbalanced styles, unknown markers) are never
//! errors; they are collected as [`Warning`](crate::report::Warning) values
//! in the per-book [`RenderReport`](crate::report::RenderReport) and
//! rendering continues.

use thiserror::Error;

use crate::report::Warning;

/// Errors that can abort the render of one (book, sink) pair.
#[derive(Error, Debug)]
pub enum Error {
    /// A sink write failed. Fatal for the current book and sink only; a
    /// batch driver decides whether to continue with remaining books.
    #[error("sink write error: {0}")]
    Io(#[from] std::io::Error),

    /// The render was cancelled between entries. The book's structural
    /// state was force-closed before this was returned.
    #[error("render cancelled")]
    Cancelled,

    /// Strict mode promoted a data-quality warning to a failure.
    #[error("strict mode: {0}")]
    Strict(Warning),
}

pub type Result<T> = std::result::Result<T, Error>;
