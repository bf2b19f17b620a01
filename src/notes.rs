//! Note parsing and indexing.
//!
//! Notes are short dated fragments, many per file. A note file is Markdown
//! with `----` fences between entries; each entry is a date header line
//! followed by the body:
//!
//! ```text
//! 2024-01-01
//! Hello
//! ----
//! 2024-01-02
//! World
//! ```
//!
//! Files are read non-recursively from the notes directory (which is
//! optional — a missing directory yields an empty index). Each valid
//! fragment becomes one `notes.json` record with the body rendered through
//! plain Markdown — notes carry no diagram or video extensions.
//!
//! Fragment ordinals are the zero-based position in the split results,
//! counting segments that end up skipped, so an identical regeneration
//! assigns identical paths.
//!
//! Date headers must be ISO-8601 calendar dates (`YYYY-MM-DD`). Anything
//! else — including formats a lenient parser might guess at — is a
//! per-note recoverable skip, reported with the file and ordinal.

use crate::convert;
use crate::types::Skip;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fence token separating notes within one file.
pub const FENCE: &str = "----";

/// The index artifact at the dist root.
pub const INDEX_FILE: &str = "notes.json";

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry in `notes.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteIndexRecord {
    /// Rendered HTML body.
    pub content: String,
    /// ISO-8601 instant at midnight UTC of the header date.
    pub modified_date: String,
    /// Synthesized page path: `/notes/<file stem>-<ordinal>.html`.
    pub path: String,
}

#[derive(Debug, Default)]
pub struct NotesOutcome {
    pub records: Vec<NoteIndexRecord>,
    pub files: usize,
    pub skipped: Vec<Skip>,
}

/// Parse every note file directly under `notes_dir` and write the index to
/// `<dist_root>/notes.json`, creating the dist directory if needed.
pub fn run(notes_dir: &Path, dist_root: &Path) -> Result<NotesOutcome, NotesError> {
    let mut outcome = NotesOutcome::default();

    if notes_dir.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(notes_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .map(|e| e.eq_ignore_ascii_case("md"))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        for file in &files {
            parse_note_file(file, &mut outcome)?;
        }
    }

    fs::create_dir_all(dist_root)?;
    let json = serde_json::to_string_pretty(&outcome.records)?;
    fs::write(dist_root.join(INDEX_FILE), json)?;
    Ok(outcome)
}

fn parse_note_file(path: &Path, outcome: &mut NotesOutcome) -> Result<(), NotesError> {
    let text = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    for (ordinal, segment) in text.split(FENCE).enumerate() {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut lines = trimmed.lines();
        let raw_date = lines.next().unwrap_or("").trim();
        let body = lines.collect::<Vec<_>>().join("\n");
        let body = body.trim();
        if raw_date.is_empty() || body.is_empty() {
            continue;
        }

        let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") else {
            outcome.skipped.push(Skip::new(
                path,
                format!("segment {ordinal}: unparseable date header {raw_date:?}"),
            ));
            continue;
        };

        outcome.records.push(NoteIndexRecord {
            content: convert::markdown_to_html(body),
            modified_date: format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")),
            path: format!("/notes/{stem}-{ordinal}.html"),
        });
    }

    outcome.files += 1;
    Ok(())
}
