//! Directory listing scraper
//!
//! The emulator prints its `dir` listing as a fixed-width table:
//!
//! ```text
//! fnr  name        blocks
//! ---------------------
//!   1  PIANO     .VC
//!   2  STRINGS   .VC
//! ---------------------
//! ```
//!
//! Listings accumulate in the session buffer between reads, possibly
//! interleaved with prompts, diagnostics and truncated tables. The scraper
//! tokenizes the text into lines, recognizes complete frames with a small
//! table grammar and returns the names from the newest one.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;
use crate::models::DirectoryEntry;
use crate::platform::Platform;

/// Token that marks the header line of a listing
pub const HEADER_TOKEN: &str = "fnr";

/// Upper bound on rows in one frame; longer runs are treated as malformed
pub const MAX_ROWS: usize = 100;

/// Width of the trailing name field in a listing row
pub const NAME_FIELD_WIDTH: usize = 11;

struct LinePatterns {
    header: Regex,
    separator: Regex,
    row: Regex,
}

static PATTERNS: Lazy<Result<LinePatterns, regex::Error>> = Lazy::new(|| {
    Ok(LinePatterns {
        header: Regex::new(&regex::escape(HEADER_TOKEN))?,
        separator: Regex::new(r"^-+-$")?,
        row: Regex::new(r"^[A-Za-z0-9\-\s.]*$")?,
    })
});

/// Classification of a single listing line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A run of at least two dashes and nothing else
    Separator,
    /// Contains the header token; a header only when a separator follows
    Header,
    /// Only characters that can appear in a table row
    Row,
    /// Anything else (prompts, diagnostics, garbage)
    Other,
}

/// One complete listing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw row lines between the two separators
    pub rows: Vec<String>,
}

impl Frame {
    /// Entry names of the frame's rows, blank rows skipped
    pub fn entries(&self) -> Vec<DirectoryEntry> {
        self.rows
            .iter()
            .map(|row| extract_name(row))
            .filter(|name| !name.is_empty())
            .map(DirectoryEntry::new)
            .collect()
    }
}

/// Extracts directory entries from accumulated console text
#[derive(Debug, Clone)]
pub struct DirectoryScraper {
    terminator: &'static str,
}

impl DirectoryScraper {
    /// Scraper splitting on the host's native line terminator
    pub fn new() -> Self {
        Self::with_terminator(Platform::line_terminator())
    }

    /// Scraper splitting on an explicit line terminator
    pub fn with_terminator(terminator: &'static str) -> Self {
        Self { terminator }
    }

    /// Entries of the newest complete listing, or an empty list if there is none
    ///
    /// Never fails: an unusable grammar is logged and treated as "no listing".
    pub fn scrape(&self, text: &str) -> Vec<DirectoryEntry> {
        match self.frames(text) {
            Ok(frames) => frames.last().map(Frame::entries).unwrap_or_default(),
            Err(e) => {
                error!("{}", e);
                Vec::new()
            }
        }
    }

    /// Every complete frame in `text`, oldest first
    pub fn frames(&self, text: &str) -> Result<Vec<Frame>, Error> {
        let patterns = PATTERNS.as_ref().map_err(|e| Error::ParseFailure {
            reason: e.to_string(),
        })?;

        let lines: Vec<&str> = text.split(self.terminator).collect();
        let mut frames = Vec::new();
        let mut current: Option<Vec<String>> = None;
        let mut i = 0;

        while i < lines.len() {
            let kind = classify(patterns, lines[i]);
            let separator_follows = lines
                .get(i + 1)
                .is_some_and(|next| classify(patterns, next) == LineKind::Separator);

            if kind == LineKind::Header && separator_follows {
                if current.is_some() {
                    trace!("Listing restarted by a newer header at line {}", i);
                }
                current = Some(Vec::new());
                i += 2;
                continue;
            }

            if let Some(rows) = current.as_mut() {
                match kind {
                    LineKind::Separator => {
                        frames.push(Frame {
                            rows: std::mem::take(rows),
                        });
                        current = None;
                    }
                    LineKind::Row | LineKind::Header if rows.len() < MAX_ROWS => {
                        rows.push(lines[i].to_string());
                    }
                    _ => {
                        trace!("Abandoning malformed listing at line {}", i);
                        current = None;
                    }
                }
            }

            i += 1;
        }

        Ok(frames)
    }
}

impl Default for DirectoryScraper {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(patterns: &LinePatterns, line: &str) -> LineKind {
    if patterns.separator.is_match(line) {
        LineKind::Separator
    } else if patterns.header.is_match(line) && patterns.row.is_match(line) {
        LineKind::Header
    } else if patterns.row.is_match(line) {
        LineKind::Row
    } else if patterns.header.is_match(line) {
        // Headers may carry column captions the row grammar rejects
        LineKind::Header
    } else {
        LineKind::Other
    }
}

/// Pull the sample name out of one listing row
///
/// The name occupies the last [`NAME_FIELD_WIDTH`] columns of the trimmed
/// row. The cut is widened to the left rather than split a token, then all
/// padding spaces are removed.
pub fn extract_name(row: &str) -> String {
    let chars: Vec<char> = row.trim().chars().collect();
    let mut start = chars.len().saturating_sub(NAME_FIELD_WIDTH);
    while start > 0 && chars[start - 1] != ' ' && chars[start] != ' ' {
        start -= 1;
    }
    chars[start..].iter().filter(|c| **c != ' ').collect()
}

/// Scrape the newest listing using the host line terminator
pub fn scrape_directory(text: &str) -> Vec<DirectoryEntry> {
    DirectoryScraper::new().scrape(text)
}
