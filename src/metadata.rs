//! Article metadata extraction and resolution.
//!
//! Each article can carry metadata from two independent sources:
//!
//! - **Embedded block** (read from the source text before conversion). Both
//!   formats hide a JSON object inside a comment so it never renders:
//!   AsciiDoc uses a `////` comment block, Markdown an HTML comment
//!   (`<!-- … -->`). Only the first block is considered.
//! - **Sidecar file**: `metadata.json` in the article's directory.
//!
//! ## Resolution priority
//!
//! Embedded wins. The sidecar is consulted only when no embedded block
//! parses — an embedded block that is present but malformed falls through to
//! the sidecar rather than failing the article. A malformed sidecar is
//! reported to the caller (it distinguishes "absent" from "broken" for the
//! build log) but is never fatal. An article with neither source is simply
//! left out of the index; its HTML artifact is still produced.

use crate::convert::Format;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

pub const SIDECAR_FILE: &str = "metadata.json";

/// Metadata block schema, shared by embedded blocks and the sidecar file.
///
/// `title` is required — a block without it fails to parse and the article
/// falls through the resolution chain. Everything else defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub modified_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

static ADOC_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)////\s*\n(.*?)\n\s*////").unwrap());

static MD_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());

/// Extract the first embedded metadata block, if one is present and parses.
pub fn extract_embedded(source: &str, format: Format) -> Option<Metadata> {
    let block = match format {
        Format::Asciidoc => &ADOC_BLOCK,
        Format::Markdown => &MD_BLOCK,
    };
    let inner = block.captures(source)?.get(1)?.as_str();
    serde_json::from_str(inner.trim()).ok()
}

/// Read the sidecar `metadata.json` in an article directory.
///
/// `Ok(None)` when the file does not exist; `Err` when it exists but is not
/// valid metadata, so the caller can log it before treating it as absent.
pub fn read_sidecar(article_dir: &Path) -> Result<Option<Metadata>, serde_json::Error> {
    let Ok(text) = fs::read_to_string(article_dir.join(SIDECAR_FILE)) else {
        return Ok(None);
    };
    serde_json::from_str(&text).map(Some)
}
