//! CLI output formatting for the build pipeline.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ```text
//! Articles
//! 001 Sharing gradle configuration → /articles/gradle/index.html
//! WARN content/drafts/ReadMe.md: no embedded metadata block and no metadata.json
//! Indexed 1 article, skipped 1
//!
//! Notes
//! 2 notes from 1 file
//!
//! Pages
//! home, archive, notes + 1 article page
//! ```

use crate::articles::ArticleOutcome;
use crate::compose::ComposeOutcome;
use crate::notes::NotesOutcome;
use crate::site::{CheckReport, SiteOutcome};
use crate::types::Skip;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn format_skips(skipped: &[Skip]) -> Vec<String> {
    skipped
        .iter()
        .map(|s| format!("WARN {}: {}", s.path.display(), s.reason))
        .collect()
}

pub fn format_article_output(outcome: &ArticleOutcome) -> Vec<String> {
    let mut lines = vec!["Articles".to_string()];
    for (i, record) in outcome.records.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            record.title,
            record.path
        ));
    }
    lines.extend(format_skips(&outcome.skipped));
    lines.push(format!(
        "Indexed {}, skipped {}",
        plural(outcome.records.len(), "article"),
        outcome.skipped.len()
    ));
    lines
}

pub fn format_notes_output(outcome: &NotesOutcome) -> Vec<String> {
    let mut lines = vec!["Notes".to_string()];
    lines.extend(format_skips(&outcome.skipped));
    lines.push(format!(
        "{} from {}",
        plural(outcome.records.len(), "note"),
        plural(outcome.files, "file")
    ));
    lines
}

pub fn format_compose_output(outcome: &ComposeOutcome) -> Vec<String> {
    vec![
        "Pages".to_string(),
        format!(
            "home, archive, notes + {}",
            plural(outcome.article_pages.len(), "article page")
        ),
    ]
}

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}, {}",
        plural(report.article_sources.len(), "article source"),
        plural(report.note_files.len(), "note file")
    )];
    for path in &report.article_sources {
        lines.push(format!("    Article: {}", path.display()));
    }
    for path in &report.note_files {
        lines.push(format!("    Notes:   {}", path.display()));
    }
    lines
}

pub fn print_site_output(outcome: &SiteOutcome) {
    for line in format_article_output(&outcome.articles) {
        println!("{line}");
    }
    println!();
    for line in format_notes_output(&outcome.notes) {
        println!("{line}");
    }
    println!();
    for line in format_compose_output(&outcome.pages) {
        println!("{line}");
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::ArticleIndexRecord;
    use std::path::Path;

    fn record(title: &str) -> ArticleIndexRecord {
        ArticleIndexRecord {
            title: title.to_string(),
            summary: String::new(),
            modified_date: "2024-01-01".to_string(),
            tags: vec![],
            path: "/a/index.html".to_string(),
            image: None,
            series: None,
        }
    }

    #[test]
    fn article_output_lists_records_and_skips() {
        let outcome = ArticleOutcome {
            records: vec![record("First")],
            transformed: vec![],
            skipped: vec![Skip::new(Path::new("bad/ReadMe.md"), "no metadata")],
        };

        let lines = format_article_output(&outcome);
        assert_eq!(lines[0], "Articles");
        assert_eq!(lines[1], "001 First → /a/index.html");
        assert!(lines[2].starts_with("WARN bad/ReadMe.md"));
        assert_eq!(lines[3], "Indexed 1 article, skipped 1");
    }

    #[test]
    fn pluralization() {
        assert_eq!(plural(1, "note"), "1 note");
        assert_eq!(plural(2, "note"), "2 notes");
        assert_eq!(plural(0, "article"), "0 articles");
    }

    #[test]
    fn notes_output_counts_files() {
        let outcome = NotesOutcome {
            records: vec![],
            files: 2,
            skipped: vec![],
        };
        let lines = format_notes_output(&outcome);
        assert_eq!(lines.last().unwrap(), "0 notes from 2 files");
    }
}
