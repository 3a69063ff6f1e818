//! Canonical verse addresses and milestone identifiers.
//!
//! A verse field may name a single verse (`"16"`), a hyphenated bridge
//! (`"16-17"`), or a comma list (`"16,17,18"`). An address produces one
//! canonical id per bound (`"Gen.3.16"`) and a single combined start/end
//! id for standoff milestones (`"Gen.3.16-Gen.3.17"`).

use std::fmt;

use crate::report::{RenderReport, Warning};

/// Canonical id of a chapter milestone, `"Gen.3"`.
pub fn chapter_id(book: &str, chapter: &str) -> String {
    format!("{book}.{chapter}")
}

/// A verse address: book, chapter, and one or more verse bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct VerseAddress {
    pub book: String,
    pub chapter: String,
    /// At least one bound. Bridges and lists keep every bound in source
    /// order; non-numeric bounds are kept verbatim.
    pub bounds: Vec<String>,
}

impl VerseAddress {
    /// Build an address from already-split bounds. An empty `bounds` gets
    /// a single empty bound so the address always produces an id.
    pub fn new(book: impl Into<String>, chapter: impl Into<String>, bounds: Vec<String>) -> Self {
        let mut bounds = bounds;
        if bounds.is_empty() {
            bounds.push(String::new());
        }
        Self {
            book: book.into(),
            chapter: chapter.into(),
            bounds,
        }
    }

    /// Parse a verse field into an address, splitting bridges on `-` and
    /// lists on `,`. Every bound is validated as numeric; a non-numeric
    /// bound is kept verbatim and warned about.
    pub fn parse(book: &str, chapter: &str, field: &str, report: &mut RenderReport) -> Self {
        let mut bounds = Vec::new();
        for part in field.split(['-', ',']) {
            let bound = part.trim();
            if bound.is_empty() || !bound.chars().all(|c| c.is_ascii_digit()) {
                report.warn(Warning::UnparseableVerseBound { text: bound.to_owned() });
            }
            bounds.push(bound.to_owned());
        }
        Self::new(book, chapter, bounds)
    }

    /// One canonical id per bound: `["Gen.3.16", "Gen.3.17"]`.
    pub fn ids(&self) -> Vec<String> {
        self.bounds
            .iter()
            .map(|b| format!("{}.{}.{}", self.book, self.chapter, b))
            .collect()
    }

    /// The id of the first bound.
    pub fn first_id(&self) -> String {
        format!("{}.{}.{}", self.book, self.chapter, self.bounds[0])
    }

    /// The combined start/end id: a single verse's own id, or
    /// `"Gen.3.16-Gen.3.17"` for a bridge or list.
    pub fn combined_id(&self) -> String {
        if self.bounds.len() == 1 {
            return self.first_id();
        }
        let last = &self.bounds[self.bounds.len() - 1];
        format!(
            "{}-{}.{}.{}",
            self.first_id(),
            self.book,
            self.chapter,
            last
        )
    }
}

impl fmt::Display for VerseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.combined_id())
    }
}
