//! Themed page composition.
//!
//! The last stage of a build. Consumes the index artifacts the indexers
//! wrote (`articles.json`, `notes.json`) plus the per-article `ReadMe.html`
//! artifacts, and produces the pages a visitor actually sees:
//!
//! - each `ReadMe.html` is wrapped in site chrome and replaced by an
//!   `index.html` in the same directory (the artifact is consumed);
//! - a home page at the dist root listing articles newest first;
//! - an `archive.html` with the distinct tag set — the only place tags are
//!   deduplicated, index records keep them verbatim;
//! - a `notes.html` listing note fragments newest first.
//!
//! An absent index file is treated as an empty collection, never an error:
//! a site with no notes still gets a home page.
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/) — templates are
//! type-safe Rust with automatic escaping, and the already-rendered article
//! bodies are the only `PreEscaped` injection points.

use crate::articles::{self, ArticleIndexRecord};
use crate::config::SiteConfiguration;
use crate::notes::{self, NoteIndexRecord};
use crate::walk;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct ComposeOutcome {
    /// Site-relative paths of the composed article pages.
    pub article_pages: Vec<String>,
    pub articles_listed: usize,
    pub notes_listed: usize,
}

/// Compose all pages for one site's dist tree.
pub fn run(dist_root: &Path, site: &SiteConfiguration) -> Result<ComposeOutcome, ComposeError> {
    let mut records: Vec<ArticleIndexRecord> =
        load_index(&dist_root.join(articles::INDEX_FILE))?;
    let note_records: Vec<NoteIndexRecord> = load_index(&dist_root.join(notes::INDEX_FILE))?;

    // Collect artifacts first; wrapping mutates the directories being walked.
    let mut artifacts: Vec<PathBuf> = Vec::new();
    walk::walk(dist_root, |file: &Path| -> Result<(), ComposeError> {
        if file.file_name().is_some_and(|n| n == articles::ARTICLE_ARTIFACT) {
            artifacts.push(file.to_path_buf());
        }
        Ok(())
    })?;

    let mut outcome = ComposeOutcome::default();
    for artifact in &artifacts {
        outcome
            .article_pages
            .push(wrap_article(artifact, dist_root, &records, site)?);
    }

    // Display order is newest first; the index files stay in walk order.
    records.sort_by(|a, b| b.modified_date.cmp(&a.modified_date));
    let mut note_records = note_records;
    note_records.sort_by(|a, b| b.modified_date.cmp(&a.modified_date));

    fs::create_dir_all(dist_root)?;
    fs::write(
        dist_root.join("index.html"),
        render_home(site, &records).into_string(),
    )?;
    fs::write(
        dist_root.join("archive.html"),
        render_archive(site, &records).into_string(),
    )?;
    fs::write(
        dist_root.join("notes.html"),
        render_notes_page(site, &note_records).into_string(),
    )?;

    outcome.articles_listed = records.len();
    outcome.notes_listed = note_records.len();
    Ok(outcome)
}

/// Read an index artifact; absent file means an empty collection.
fn load_index<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ComposeError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(serde_json::from_str(&text)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// Wrap one `ReadMe.html` artifact in site chrome, writing `index.html` in
/// its place and removing the consumed artifact. Returns the page's
/// site-relative path.
fn wrap_article(
    artifact: &Path,
    dist_root: &Path,
    records: &[ArticleIndexRecord],
    site: &SiteConfiguration,
) -> Result<String, ComposeError> {
    let dir = artifact.parent().unwrap_or(dist_root);
    let rel = dir.strip_prefix(dist_root).unwrap_or(Path::new(""));
    let page_path = {
        let mut segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.push(articles::ARTICLE_PAGE.to_string());
        format!("/{}", segments.join("/"))
    };

    // Unindexed articles (no metadata) fall back to the site title.
    let record = records.iter().find(|r| r.path == page_path);
    let title = record.map(|r| r.title.as_str()).unwrap_or(&site.title);

    let body = fs::read_to_string(artifact)?;
    let page = render_article_page(site, title, record, PreEscaped(body));
    fs::write(dir.join(articles::ARTICLE_PAGE), page.into_string())?;
    fs::remove_file(artifact)?;
    Ok(page_path)
}

// ============================================================================
// HTML components
// ============================================================================

const CSS: &str = include_str!("../static/style.css");

/// Base HTML document shared by all composed pages.
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn site_header(site: &SiteConfiguration) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (site.title) }
            nav.site-nav {
                a href="/archive.html" { "Archive" }
                a href="/notes.html" { "Notes" }
                @for social in &site.socials {
                    a.social href=(social.url) { (social.icon) }
                }
            }
        }
    }
}

fn article_list(records: &[ArticleIndexRecord]) -> Markup {
    html! {
        ul.article-list {
            @for record in records {
                li.article-entry {
                    a.article-title href=(record.path) { (record.title) }
                    span.article-date { (record.modified_date) }
                    @if !record.summary.is_empty() {
                        p.article-summary { (record.summary) }
                    }
                    @if !record.tags.is_empty() {
                        span.article-tags {
                            @for tag in &record.tags {
                                span.tag { (tag) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn render_home(site: &SiteConfiguration, records: &[ArticleIndexRecord]) -> Markup {
    base_document(
        &site.title,
        html! {
            (site_header(site))
            main {
                (article_list(records))
            }
        },
    )
}

pub fn render_archive(site: &SiteConfiguration, records: &[ArticleIndexRecord]) -> Markup {
    // The distinct tag set lives here and only here.
    let tags: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.tags.iter().map(String::as_str))
        .collect();

    base_document(
        &format!("Archive — {}", site.title),
        html! {
            (site_header(site))
            main {
                h1 { "Archive" }
                div.tag-cloud {
                    @for tag in &tags {
                        span.tag { (tag) }
                    }
                }
                (article_list(records))
            }
        },
    )
}

pub fn render_notes_page(site: &SiteConfiguration, records: &[NoteIndexRecord]) -> Markup {
    base_document(
        &format!("Notes — {}", site.title),
        html! {
            (site_header(site))
            main {
                h1 { "Notes" }
                @for note in records {
                    article.note {
                        span.note-date { (note.modified_date) }
                        div.note-body { (PreEscaped(note.content.as_str())) }
                    }
                }
            }
        },
    )
}

fn render_article_page(
    site: &SiteConfiguration,
    title: &str,
    record: Option<&ArticleIndexRecord>,
    body: Markup,
) -> Markup {
    base_document(
        title,
        html! {
            (site_header(site))
            main {
                article.article-body {
                    (body)
                }
                @if let Some(record) = record {
                    footer.article-meta {
                        span.article-date { (record.modified_date) }
                        @for tag in &record.tags {
                            span.tag { (tag) }
                        }
                    }
                }
            }
        },
    )
}

/// One card on the multi-site launch page.
#[derive(Debug, Clone)]
pub struct LaunchEntry {
    pub path: String,
    pub title: String,
    pub image: Option<String>,
}

pub fn render_launch_page(entries: &[LaunchEntry]) -> Markup {
    base_document(
        "Sites",
        html! {
            main.launch {
                @for entry in entries {
                    a.launch-card href=(format!("/{}/", entry.path)) {
                        @if let Some(image) = &entry.image {
                            img src=(image) alt=(entry.title);
                        }
                        span.launch-title { (entry.title) }
                    }
                }
            }
        },
    )
}
