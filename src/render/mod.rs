//! The rendering engine.
//!
//! One [`Renderer`] folds a book's entry stream into ordered events on a
//! [`Sink`](crate::sink::Sink). The sub-pieces it drives:
//!
//! - [`splice`] — re-inserts rendered annotation pieces into growing text
//! - [`balance`] — repairs unbalanced character-style codes
//! - [`MilestoneTracker`] — verse/chapter standoff milestones
//! - [`NoteRegistry`] — monotonic note ids and end-of-book note records

mod balance;
mod machine;
mod milestone;
mod notes;
mod splice;

pub use balance::balance;
pub use machine::{RenderOptions, Renderer};
pub use milestone::MilestoneTracker;
pub use notes::{NoteId, NoteKind, NoteRecord, NoteRegistry};
pub use splice::splice;
