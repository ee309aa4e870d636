//! Inline reference marker scanning.
//!
//! Recognises `include:`, `load:`, `skill:` and `template:` markers (optionally
//! prefixed with `@`) in a skill body. Anything else that looks like a marker
//! is ignored so new marker kinds can be introduced without breaking older
//! scanners.

use std::sync::LazyLock;

use regex::Regex;
use skillpro_types::skill::{Reference, ReferenceKind};

/// A marker keyword must not be glued to a preceding word, path or `@`.
/// The target runs until whitespace or a closing delimiter.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^\w\-/.@])(@?)(include|load|skill|template):([^\s)\]}>`"',]+)"#)
        .expect("reference marker pattern is valid")
});

/// Trailing punctuation that ends a sentence rather than a target.
const TRAILING_PUNCTUATION: &[char] = &['.', ';', ':', '!', '?'];

/// Lazy iterator over the references in a piece of content.
///
/// Cloning the iterator (or calling [`ReferenceScan::restart`]) starts the
/// scan again; the same content always yields the same sequence.
#[derive(Debug, Clone)]
pub struct ReferenceScan<'a> {
    content: &'a str,
    first_line: usize,
    search_from: usize,
    line: usize,
    line_start: usize,
    counted_to: usize,
}

/// Scan `content` for reference markers, numbering lines from 1.
pub fn scan_references(content: &str) -> ReferenceScan<'_> {
    scan_references_from(content, 1)
}

/// Scan `content` whose first line is line `first_line` of a larger document.
pub fn scan_references_from(content: &str, first_line: usize) -> ReferenceScan<'_> {
    ReferenceScan {
        content,
        first_line,
        search_from: 0,
        line: first_line,
        line_start: 0,
        counted_to: 0,
    }
}

impl ReferenceScan<'_> {
    /// Rewind to the start of the content.
    pub fn restart(&mut self) {
        self.search_from = 0;
        self.line = self.first_line;
        self.line_start = 0;
        self.counted_to = 0;
    }

    /// Advance the line counter up to byte offset `pos` and return the
    /// 1-based (line, column) of that offset.
    fn position_of(&mut self, pos: usize) -> (usize, usize) {
        for (i, b) in self.content.as_bytes()[self.counted_to..pos].iter().enumerate() {
            if *b == b'\n' {
                self.line += 1;
                self.line_start = self.counted_to + i + 1;
            }
        }
        self.counted_to = pos;
        let column = self.content[self.line_start..pos].chars().count() + 1;
        (self.line, column)
    }
}

impl Iterator for ReferenceScan<'_> {
    type Item = Reference;

    fn next(&mut self) -> Option<Reference> {
        while self.search_from < self.content.len() {
            let caps = MARKER_RE.captures_at(self.content, self.search_from)?;
            let whole = caps.get(0)?;
            self.search_from = whole.end();

            let (Some(prefix), Some(keyword), Some(target)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let Some(kind) = ReferenceKind::from_keyword(keyword.as_str()) else {
                continue;
            };
            let value = target.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if value.is_empty() {
                continue;
            }

            let (line, column) = self.position_of(prefix.start());
            return Some(Reference {
                kind,
                value: value.to_owned(),
                line,
                column,
            });
        }
        None
    }
}
