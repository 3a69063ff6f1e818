//! Character-style balancing for one entry's text field.
//!
//! Inline character styles use the backslash convention of the source
//! markup: `\xx ` opens style `xx` (the single space is consumed), `\xx*`
//! closes it. The code set is open-ended; any ASCII-alphanumeric tag is a
//! style code. At most one style may be open at a time (a single slot,
//! not a stack — documented source behavior, kept as-is). Whatever the
//! input looks like, the output has an equal count of open and close
//! codes.

use memchr::memchr;

use crate::report::{RenderReport, StyleRepair, Warning};

/// Balance the character-style codes in one text field.
///
/// Repairs, each reported as an [`UnbalancedStyle`](Warning::UnbalancedStyle)
/// warning:
/// - opening a style over an already-open one force-closes the previous
///   style with a dangling close code;
/// - a close code with no matching open style is dropped;
/// - a style still open at field end is force-closed.
///
/// A lone backslash, or a code with neither a space nor a `*` terminator,
/// is passed through as literal text. Never fails.
pub fn balance(field: &str, report: &mut RenderReport) -> String {
    let bytes = field.as_bytes();
    let mut out = String::with_capacity(field.len());
    let mut open: Option<&str> = None;
    let mut pos = 0;

    while let Some(rel) = memchr(b'\\', &bytes[pos..]) {
        let start = pos + rel;
        out.push_str(&field[pos..start]);

        let mut end = start + 1;
        while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
            end += 1;
        }
        if end == start + 1 {
            // Lone backslash; literal.
            out.push('\\');
            pos = start + 1;
            continue;
        }
        let code = &field[start + 1..end];

        match bytes.get(end) {
            Some(b'*') => {
                match open.take() {
                    Some(current) if current == code => {
                        out.push('\\');
                        out.push_str(code);
                        out.push('*');
                    }
                    other => {
                        // No matching open style; the code is dropped.
                        open = other;
                        report.warn(Warning::UnbalancedStyle {
                            code: code.to_owned(),
                            repair: StyleRepair::Dropped,
                        });
                    }
                }
                pos = end + 1;
            }
            Some(b' ') => {
                if let Some(previous) = open.take() {
                    force_close(&mut out, previous, report);
                }
                out.push('\\');
                out.push_str(code);
                out.push(' ');
                open = Some(code);
                pos = end + 1;
            }
            _ => {
                // No terminator; literal passthrough.
                out.push_str(&field[start..end]);
                pos = end;
            }
        }
    }

    out.push_str(&field[pos..]);
    if let Some(previous) = open {
        force_close(&mut out, previous, report);
    }
    out
}

fn force_close(out: &mut String, code: &str, report: &mut RenderReport) {
    out.push('\\');
    out.push_str(code);
    out.push('*');
    report.warn(Warning::UnbalancedStyle {
        code: code.to_owned(),
        repair: StyleRepair::ForceClosed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(field: &str) -> (String, RenderReport) {
        let mut report = RenderReport::new();
        let out = balance(field, &mut report);
        (out, report)
    }

    /// Count style codes in balanced output: (opens, closes).
    fn code_counts(s: &str) -> (usize, usize) {
        let bytes = s.as_bytes();
        let mut opens = 0;
        let mut closes = 0;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j].is_ascii_alphanumeric() {
                    j += 1;
                }
                if j > i + 1 {
                    match bytes.get(j) {
                        Some(b'*') => closes += 1,
                        Some(b' ') => opens += 1,
                        _ => {}
                    }
                }
                i = j;
            } else {
                i += 1;
            }
        }
        (opens, closes)
    }

    #[test]
    fn well_formed_field_passes_through() {
        let (out, report) = run(r"the \nd LORD\nd* spoke");
        assert_eq!(out, r"the \nd LORD\nd* spoke");
        assert!(report.is_clean());
    }

    #[test]
    fn unclosed_style_force_closed_at_field_end() {
        let (out, report) = run(r"the \nd LORD spoke");
        assert_eq!(out, r"the \nd LORD spoke\nd*");
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            &report.warnings[0],
            Warning::UnbalancedStyle { code, repair: StyleRepair::ForceClosed } if code == "nd"
        ));
    }

    #[test]
    fn orphan_close_dropped() {
        let (out, report) = run(r"spoke\nd* loudly");
        assert_eq!(out, "spoke loudly");
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            &report.warnings[0],
            Warning::UnbalancedStyle { code, repair: StyleRepair::Dropped } if code == "nd"
        ));
    }

    #[test]
    fn open_over_open_force_closes_previous() {
        // Single-slot model: the second open evicts the first.
        let (out, report) = run(r"\it one \bd two\bd*");
        assert_eq!(out, r"\it one \it*\bd two\bd*");
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn mismatched_close_dropped_and_open_style_survives() {
        let (out, report) = run(r"\it one\bd* two");
        assert_eq!(out, r"\it one two\it*");
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn lone_backslash_is_literal() {
        let (out, report) = run(r"a \ b");
        assert_eq!(out, r"a \ b");
        assert!(report.is_clean());
    }

    #[test]
    fn unterminated_code_is_literal() {
        let (out, report) = run(r"end\nd");
        assert_eq!(out, r"end\nd");
        assert!(report.is_clean());
    }

    #[test]
    fn empty_field() {
        let (out, report) = run("");
        assert_eq!(out, "");
        assert!(report.is_clean());
    }

    proptest! {
        #[test]
        fn never_fails(field in r"[a-zé \\*]{0,32}") {
            let mut report = RenderReport::new();
            let _ = balance(&field, &mut report);
        }

        #[test]
        fn balance_law(field in r"(\\(nd|it|bd)( |\*)|[a-z ]){0,16}") {
            let mut report = RenderReport::new();
            let out = balance(&field, &mut report);
            let (opens, closes) = code_counts(&out);
            prop_assert_eq!(opens, closes);
        }
    }
}
