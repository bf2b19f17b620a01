//! Article transformation and indexing.
//!
//! The core of the build pipeline. Walks the dist tree (content has already
//! been copied there), and for every recognized article source —
//! `ReadMe.md` or `ReadMe.adoc`, one per article directory — performs the
//! destructive in-place transform:
//!
//! ```text
//! read source → convert to HTML → write ReadMe.html → delete source
//! ```
//!
//! The order is load-bearing: the source is deleted only after the artifact
//! write succeeds, so a failed conversion never loses an article. Read,
//! conversion, write, and delete failures are fatal — a half-applied
//! replacement (source gone, artifact missing) would corrupt the tree, so
//! the run aborts instead.
//!
//! After the transform, metadata resolution (embedded block first, sidecar
//! `metadata.json` second — see [`crate::metadata`]) decides whether the
//! article joins the index. Metadata failures are per-article: the artifact
//! already exists either way, the article is reported and skipped, and the
//! walk continues.
//!
//! The accumulated records are written to `<dist>/articles.json` only after
//! the whole walk succeeds — a fatal error discards the partial index.

use crate::convert::{self, ConvertError, Format};
use crate::metadata;
use crate::types::Skip;
use crate::walk;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// The artifact written beside (then instead of) each article source.
pub const ARTICLE_ARTIFACT: &str = "ReadMe.html";

/// The index artifact at the dist root.
pub const INDEX_FILE: &str = "articles.json";

/// Canonical page filename an article's site URL points at. The composer
/// later replaces the `ReadMe.html` artifact with this themed page.
pub const ARTICLE_PAGE: &str = "index.html";

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("conversion failed for {path}: {source}")]
    Convert {
        path: PathBuf,
        source: ConvertError,
    },
}

/// One entry in `articles.json`. Walk insertion order; tags verbatim from
/// the metadata source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleIndexRecord {
    pub title: String,
    pub summary: String,
    pub modified_date: String,
    pub tags: Vec<String>,
    /// Site-relative URL of the article's final page, e.g.
    /// `/articles/gradle-sharing/index.html`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

/// What one run produced: the index records (already serialized to disk),
/// the directories whose sources were transformed, and the articles that
/// were converted but could not be indexed.
#[derive(Debug, Default)]
pub struct ArticleOutcome {
    pub records: Vec<ArticleIndexRecord>,
    pub transformed: Vec<PathBuf>,
    pub skipped: Vec<Skip>,
}

/// Transform every article source under `dist_root` and write the index.
pub fn run(dist_root: &Path) -> Result<ArticleOutcome, ArticleError> {
    let mut outcome = ArticleOutcome::default();

    walk::walk(dist_root, |file| {
        match Format::from_source_name(file) {
            Some(format) => transform_article(file, format, dist_root, &mut outcome),
            None => Ok(()),
        }
    })?;

    fs::create_dir_all(dist_root)?;
    let json = serde_json::to_string_pretty(&outcome.records)?;
    fs::write(dist_root.join(INDEX_FILE), json)?;
    Ok(outcome)
}

fn transform_article(
    source_path: &Path,
    format: Format,
    dist_root: &Path,
    outcome: &mut ArticleOutcome,
) -> Result<(), ArticleError> {
    // A visited file always has a parent directory.
    let dir = source_path.parent().unwrap_or(dist_root);

    let source = fs::read_to_string(source_path)?;
    let html = convert::convert(&source, format, dir).map_err(|e| ArticleError::Convert {
        path: source_path.to_path_buf(),
        source: e,
    })?;
    let embedded = metadata::extract_embedded(&source, format);

    // Write-then-delete. The artifact replacement happens regardless of the
    // metadata outcome below.
    fs::write(dir.join(ARTICLE_ARTIFACT), &html)?;
    fs::remove_file(source_path)?;
    outcome.transformed.push(dir.to_path_buf());

    let meta = match embedded {
        Some(meta) => meta,
        None => match metadata::read_sidecar(dir) {
            Ok(Some(meta)) => meta,
            Ok(None) => {
                outcome.skipped.push(Skip::new(
                    source_path,
                    "no embedded metadata block and no metadata.json",
                ));
                return Ok(());
            }
            Err(err) => {
                outcome.skipped.push(Skip::new(
                    source_path,
                    format!("malformed metadata.json: {err}"),
                ));
                return Ok(());
            }
        },
    };

    outcome.records.push(ArticleIndexRecord {
        title: meta.title,
        summary: summarize(&html),
        modified_date: meta.modified_date,
        tags: meta.tags,
        path: site_path(dist_root, dir),
        image: meta.image,
        series: meta.series,
    });
    Ok(())
}

static FIRST_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<p>(.*?)</p>").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Plain-text summary: the first single-line `<p>…</p>` of the rendered
/// HTML with all tags stripped. Empty when no paragraph matches.
fn summarize(html: &str) -> String {
    FIRST_PARAGRAPH
        .captures(html)
        .map(|caps| HTML_TAG.replace_all(&caps[1], "").into_owned())
        .unwrap_or_default()
}

/// Site-relative URL for an article directory: `/<dir relative to dist>/`
/// plus the canonical page filename, always with forward slashes.
fn site_path(dist_root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(dist_root).unwrap_or(Path::new(""));
    let mut segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    segments.push(ARTICLE_PAGE.to_string());
    format!("/{}", segments.join("/"))
}
