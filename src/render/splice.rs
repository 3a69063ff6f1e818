//! Re-insertion of rendered annotations into plain text.
//!
//! Annotation anchors are character offsets into the *original* clean
//! text. As pieces are inserted the text grows, so each later insertion
//! point is shifted right by the total length of everything inserted
//! before it. A single running growth counter reproduces that exactly,
//! because every anchor is computed against the original coordinate
//! space.

use crate::model::AnnotationSpan;
use crate::report::{RenderReport, Warning};

/// Splice rendered annotation pieces into `clean_text`.
///
/// Spans must arrive in ascending `original_offset` order (ties in
/// encounter order); they are processed as given and never reordered.
/// `render` produces each span's inline piece. An out-of-range offset is
/// clamped to the nearest boundary and reported; splicing never fails.
///
/// Offsets and growth are counted in characters, not bytes. For any text
/// and spans, `chars(out) == chars(in) + sum(chars(piece))`.
pub fn splice(
    clean_text: &str,
    spans: &[AnnotationSpan],
    mut render: impl FnMut(&AnnotationSpan) -> String,
    report: &mut RenderReport,
) -> String {
    let original_len = clean_text.chars().count();
    let mut text = clean_text.to_owned();
    let mut text_len = original_len;
    let mut growth = 0usize;

    for span in spans {
        let piece = render(span);
        if span.original_offset > original_len {
            report.warn(Warning::OffsetOutOfRange {
                offset: span.original_offset,
                len: original_len,
            });
        }
        let insert_at = (span.original_offset + growth).min(text_len);
        text.insert_str(byte_index(&text, insert_at), &piece);
        let piece_len = piece.chars().count();
        growth += piece_len;
        text_len += piece_len;
    }
    text
}

/// Byte index of the `char_idx`-th character, or the end of the string.
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
