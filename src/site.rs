//! Per-site build orchestration.
//!
//! A site build is a strict sequence over one base directory:
//!
//! ```text
//! 1. Load    build-configuration.json + site.json
//! 2. Copy    content/ → dist/        (fresh working copy every run)
//! 3. Index   articles  → dist/articles.json   (destructive transform)
//! 4. Index   notes     → dist/notes.json
//! 5. Compose themed pages from the indices
//! ```
//!
//! The copy in step 2 is what makes the destructive step 3 idempotent
//! across runs: sources are consumed in the working copy, never in the
//! content tree itself. A missing content directory is a valid empty site.
//!
//! [`build_all`] wraps this for `sites.json` multi-site setups and renders
//! the launch page over the built sites.

use crate::articles::{self, ArticleOutcome};
use crate::compose::{self, ComposeOutcome, LaunchEntry};
use crate::config::{self, ConfigError, SitesConfiguration};
use crate::convert::Format;
use crate::notes::{self, NotesOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Subdirectory of the content tree holding note files.
pub const NOTES_DIR: &str = "notes";

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("article stage failed: {0}")]
    Articles(#[from] articles::ArticleError),
    #[error("notes stage failed: {0}")]
    Notes(#[from] notes::NotesError),
    #[error("compose stage failed: {0}")]
    Compose(#[from] compose::ComposeError),
}

/// Everything one site build produced, for reporting.
#[derive(Debug)]
pub struct SiteOutcome {
    pub base_dir: PathBuf,
    pub dist: PathBuf,
    pub articles: ArticleOutcome,
    pub notes: NotesOutcome,
    pub pages: ComposeOutcome,
}

/// Run the full pipeline for the site rooted at `base_dir`.
pub fn build(base_dir: &Path) -> Result<SiteOutcome, SiteError> {
    let build_config = config::load_build_configuration(base_dir)?;
    let site_config = config::load_site_configuration(base_dir)?;

    let content = base_dir.join(&build_config.content);
    let dist = base_dir.join(&build_config.dist);

    fs::create_dir_all(&dist)?;
    copy_dir_recursive(&content, &dist)?;

    let articles = articles::run(&dist)?;
    let notes = notes::run(&content.join(NOTES_DIR), &dist)?;
    let pages = compose::run(&dist, &site_config)?;

    Ok(SiteOutcome {
        base_dir: base_dir.to_path_buf(),
        dist,
        articles,
        notes,
        pages,
    })
}

/// Build every site listed in `<base_dir>/sites.json`, then the launch page.
pub fn build_all(base_dir: &Path) -> Result<Vec<SiteOutcome>, SiteError> {
    let sites_config = config::load_sites_configuration(base_dir)?;

    let mut outcomes = Vec::new();
    for entry in &sites_config.sites {
        outcomes.push(build(&base_dir.join(&entry.path))?);
    }

    if sites_config.include_launch_page {
        write_launch_page(base_dir, &sites_config)?;
    }

    Ok(outcomes)
}

fn write_launch_page(base_dir: &Path, sites_config: &SitesConfiguration) -> Result<(), SiteError> {
    let entries: Vec<LaunchEntry> = sites_config
        .sites
        .iter()
        .map(|entry| {
            // A site without a readable site.json still gets a card.
            let title = config::load_site_configuration(&base_dir.join(&entry.path))
                .map(|c| c.title)
                .unwrap_or_else(|_| entry.path.clone());
            LaunchEntry {
                path: entry.path.clone(),
                title,
                image: entry.image.clone(),
            }
        })
        .collect();

    let dist = base_dir.join("dist");
    fs::create_dir_all(&dist)?;
    fs::write(
        dist.join("index.html"),
        compose::render_launch_page(&entries).into_string(),
    )?;
    Ok(())
}

/// What a build would process, without mutating anything.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub article_sources: Vec<PathBuf>,
    pub note_files: Vec<PathBuf>,
}

/// Inspect the content tree of the site at `base_dir`.
pub fn check(base_dir: &Path) -> Result<CheckReport, SiteError> {
    let build_config = config::load_build_configuration(base_dir)?;
    config::load_site_configuration(base_dir)?;

    let content = base_dir.join(&build_config.content);
    let mut report = CheckReport::default();

    crate::walk::walk(&content, |file: &Path| -> Result<(), articles::ArticleError> {
        if Format::from_source_name(file).is_some() {
            report.article_sources.push(file.to_path_buf());
        }
        Ok(())
    })?;

    let notes_dir = content.join(NOTES_DIR);
    if notes_dir.is_dir() {
        for entry in fs::read_dir(&notes_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "md") {
                report.note_files.push(path);
            }
        }
    }

    Ok(report)
}

/// Copy a directory tree. A missing source is an empty content set, not an
/// error.
fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    if !src.exists() {
        return Ok(());
    }
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(std::io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walk entries start with the walk root");
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const META: &str = r#"{"title": "Post", "modifiedDate": "2024-01-01", "tags": ["t"]}"#;

    fn seed_site(base: &Path) {
        fs::write(
            base.join(config::BUILD_CONFIG_FILE),
            r#"{ "content": "content", "theme": "theme", "dist": "dist" }"#,
        )
        .unwrap();
        fs::write(base.join(config::SITE_CONFIG_FILE), r#"{ "title": "My Site" }"#).unwrap();

        let article_dir = base.join("content/articles/post");
        fs::create_dir_all(&article_dir).unwrap();
        fs::write(
            article_dir.join("ReadMe.md"),
            format!("<!--\n{META}\n-->\n\n# Post\n\nHello world.\n"),
        )
        .unwrap();

        let notes_dir = base.join("content/notes");
        fs::create_dir_all(&notes_dir).unwrap();
        fs::write(notes_dir.join("daily.md"), "2024-01-05\nA note\n").unwrap();
    }

    // =========================================================================
    // Single-site build
    // =========================================================================

    #[test]
    fn full_build_produces_site() {
        let tmp = TempDir::new().unwrap();
        seed_site(tmp.path());

        let outcome = build(tmp.path()).unwrap();

        let dist = tmp.path().join("dist");
        assert_eq!(outcome.articles.records.len(), 1);
        assert_eq!(outcome.notes.records.len(), 1);
        assert!(dist.join("articles.json").exists());
        assert!(dist.join("notes.json").exists());
        assert!(dist.join("index.html").exists());
        assert!(dist.join("archive.html").exists());
        assert!(dist.join("articles/post/index.html").exists());
        // Working copy consumed its source; content tree untouched.
        assert!(!dist.join("articles/post/ReadMe.md").exists());
        assert!(tmp.path().join("content/articles/post/ReadMe.md").exists());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        seed_site(tmp.path());

        let first = build(tmp.path()).unwrap();
        let second = build(tmp.path()).unwrap();

        assert_eq!(first.articles.records.len(), second.articles.records.len());
        let index = fs::read_to_string(tmp.path().join("dist/articles.json")).unwrap();
        let parsed: Vec<articles::ArticleIndexRecord> = serde_json::from_str(&index).unwrap();
        assert_eq!(parsed[0].title, "Post");
    }

    #[test]
    fn missing_content_directory_is_an_empty_site() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(config::BUILD_CONFIG_FILE),
            r#"{ "content": "content", "theme": "theme", "dist": "dist" }"#,
        )
        .unwrap();
        fs::write(tmp.path().join(config::SITE_CONFIG_FILE), r#"{ "title": "T" }"#).unwrap();

        let outcome = build(tmp.path()).unwrap();
        assert!(outcome.articles.records.is_empty());
        assert!(tmp.path().join("dist/index.html").exists());
    }

    #[test]
    fn missing_build_configuration_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = build(tmp.path()).unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    // =========================================================================
    // Multi-site build
    // =========================================================================

    #[test]
    fn sites_build_with_launch_page() {
        let tmp = TempDir::new().unwrap();
        let site_dir = tmp.path().join("programming");
        fs::create_dir_all(&site_dir).unwrap();
        seed_site(&site_dir);

        fs::write(
            tmp.path().join(config::SITES_CONFIG_FILE),
            r#"{ "includeLaunchPage": true, "sites": [{ "path": "programming", "image": "p.png" }] }"#,
        )
        .unwrap();

        let outcomes = build_all(tmp.path()).unwrap();

        assert_eq!(outcomes.len(), 1);
        let launch = fs::read_to_string(tmp.path().join("dist/index.html")).unwrap();
        assert!(launch.contains("href=\"/programming/\""));
        assert!(launch.contains("My Site"));
    }

    #[test]
    fn launch_page_skipped_when_disabled() {
        let tmp = TempDir::new().unwrap();
        let site_dir = tmp.path().join("a");
        fs::create_dir_all(&site_dir).unwrap();
        seed_site(&site_dir);
        fs::write(
            tmp.path().join(config::SITES_CONFIG_FILE),
            r#"{ "sites": [{ "path": "a" }] }"#,
        )
        .unwrap();

        build_all(tmp.path()).unwrap();
        assert!(!tmp.path().join("dist/index.html").exists());
    }

    // =========================================================================
    // Check
    // =========================================================================

    #[test]
    fn check_reports_without_mutating() {
        let tmp = TempDir::new().unwrap();
        seed_site(tmp.path());

        let report = check(tmp.path()).unwrap();

        assert_eq!(report.article_sources.len(), 1);
        assert_eq!(report.note_files.len(), 1);
        assert!(!tmp.path().join("dist").exists());
        assert!(tmp.path().join("content/articles/post/ReadMe.md").exists());
    }
}
