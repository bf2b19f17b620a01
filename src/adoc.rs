//! AsciiDoc-to-HTML conversion.
//!
//! There is no Asciidoctor-grade converter on crates.io, so this module
//! implements the subset of AsciiDoc this pipeline actually meets, emitting
//! the same HTML structure Asciidoctor produces for those constructs (the
//! downstream video rewrite pattern-matches that structure, so fidelity
//! matters):
//!
//! - document and section titles (`=` through `=====`)
//! - paragraphs, wrapped `<div class="paragraph">` / `<p>`
//! - bare URLs auto-linked with `class="bare"`
//! - inline `*strong*`, `_emphasis_`, `` `monospace` ``
//! - listing (`----`) and literal (`....`) delimited blocks, with
//!   `[source,lang]` syntax classes
//! - `[mermaid]` diagram blocks, rendered during conversion to a kroki
//!   image reference (the Markdown path does this as a post-pass instead)
//! - unordered lists (`* item`)
//! - block image macros (`image::target[alt]`)
//! - comment lines (`//`) and comment blocks (`////`), dropped from output
//!
//! Conversion runs in safe mode: `include::target[]` resolves relative to
//! the document's directory and refuses absolute paths or `..` traversal.
//! A missing include target is a fatal conversion error.

use crate::convert::{ConvertError, diagram_image};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Convert an AsciiDoc document to HTML, resolving includes against `base_dir`.
pub fn to_html(source: &str, base_dir: &Path) -> Result<String, ConvertError> {
    let resolved = resolve_includes(source, base_dir, 0)?;
    Ok(render_blocks(&resolved))
}

// ============================================================================
// Includes
// ============================================================================

/// Nested includes beyond this depth are left in place as literal text,
/// which also breaks include cycles.
const MAX_INCLUDE_DEPTH: usize = 8;

fn resolve_includes(source: &str, base_dir: &Path, depth: usize) -> Result<String, ConvertError> {
    let mut out = String::new();
    for line in source.lines() {
        let target = line
            .strip_prefix("include::")
            .and_then(|rest| rest.strip_suffix("[]"));
        match target {
            Some(target) if depth < MAX_INCLUDE_DEPTH => {
                let target = Path::new(target);
                if target.is_absolute()
                    || target
                        .components()
                        .any(|c| matches!(c, Component::ParentDir))
                {
                    return Err(ConvertError::UnsafeInclude(target.to_path_buf()));
                }
                let full = base_dir.join(target);
                if !full.is_file() {
                    return Err(ConvertError::MissingInclude(full));
                }
                let included = fs::read_to_string(&full)?;
                let nested_base = full.parent().unwrap_or(base_dir);
                out.push_str(&resolve_includes(&included, nested_base, depth + 1)?);
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    Ok(out)
}

// ============================================================================
// Block rendering
// ============================================================================

fn is_comment_delim(line: &str) -> bool {
    line.len() >= 4 && line.bytes().all(|b| b == b'/')
}

fn is_listing_delim(line: &str) -> bool {
    line.len() >= 4 && line.bytes().all(|b| b == b'-')
}

fn is_literal_delim(line: &str) -> bool {
    line.len() >= 4 && line.bytes().all(|b| b == b'.')
}

fn is_block_delim(line: &str) -> bool {
    is_comment_delim(line) || is_listing_delim(line) || is_literal_delim(line)
}

/// Heading marker: 1-5 `=` followed by a space.
fn heading_level(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'=').count();
    if (1..=5).contains(&level)
        && let Some(text) = line[level..].strip_prefix(' ')
    {
        return Some((level, text.trim()));
    }
    None
}

fn render_blocks(source: &str) -> String {
    let lines: Vec<&str> = source.lines().map(str::trim_end).collect();
    let mut blocks: Vec<String> = Vec::new();
    let mut style: Option<String> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.is_empty() {
            style = None;
            i += 1;
        } else if is_comment_delim(line) {
            i += 1;
            while i < lines.len() && !is_comment_delim(lines[i]) {
                i += 1;
            }
            i += 1; // closing delimiter
            style = None;
        } else if line.starts_with("//") {
            i += 1;
        } else if line.starts_with('[') && line.ends_with(']') && !line.starts_with("[[") {
            style = Some(line[1..line.len() - 1].to_string());
            i += 1;
        } else if is_listing_delim(line) || is_literal_delim(line) {
            let closes = |l: &str| {
                if is_listing_delim(line) {
                    is_listing_delim(l)
                } else {
                    is_literal_delim(l)
                }
            };
            i += 1;
            let start = i;
            while i < lines.len() && !closes(lines[i]) {
                i += 1;
            }
            let body = lines[start..i].join("\n");
            i += 1; // closing delimiter
            blocks.push(render_delimited(&body, style.take().as_deref()));
        } else if let Some((level, text)) = heading_level(line) {
            blocks.push(format!("<h{level}>{}</h{level}>", inline(text)));
            style = None;
            i += 1;
        } else if line.starts_with("* ") {
            let mut items = Vec::new();
            while i < lines.len() && lines[i].starts_with("* ") {
                items.push(format!("<li>\n<p>{}</p>\n</li>", inline(&lines[i][2..])));
                i += 1;
            }
            blocks.push(format!(
                "<div class=\"ulist\">\n<ul>\n{}\n</ul>\n</div>",
                items.join("\n")
            ));
            style = None;
        } else if let Some(rest) = line.strip_prefix("image::") {
            blocks.push(render_image_macro(rest));
            style = None;
            i += 1;
        } else {
            let start = i;
            while i < lines.len()
                && !lines[i].is_empty()
                && !is_block_delim(lines[i])
                && !lines[i].starts_with("* ")
            {
                i += 1;
            }
            let text = lines[start..i].join("\n");
            blocks.push(format!(
                "<div class=\"paragraph\">\n<p>{}</p>\n</div>",
                inline(&text)
            ));
            style = None;
        }
    }

    blocks.join("\n")
}

fn render_delimited(body: &str, style: Option<&str>) -> String {
    match style {
        Some("mermaid") => format!(
            "<div class=\"imageblock kroki\">\n<div class=\"content\">\n{}\n</div>\n</div>",
            diagram_image(body)
        ),
        Some(s) if s.starts_with("source") => {
            let lang = s.split(',').nth(1).map(str::trim).unwrap_or("");
            let class = if lang.is_empty() {
                String::new()
            } else {
                format!(" class=\"language-{lang}\" data-lang=\"{lang}\"")
            };
            format!(
                "<div class=\"listingblock\">\n<div class=\"content\">\n<pre class=\"highlight\"><code{class}>{}</code></pre>\n</div>\n</div>",
                escape(body)
            )
        }
        _ => format!(
            "<div class=\"listingblock\">\n<div class=\"content\">\n<pre>{}</pre>\n</div>\n</div>",
            escape(body)
        ),
    }
}

fn render_image_macro(rest: &str) -> String {
    let (target, alt) = match rest.split_once('[') {
        Some((target, attrs)) => {
            let alt = attrs.trim_end_matches(']');
            (target, alt.to_string())
        }
        None => (rest, String::new()),
    };
    let alt = if alt.is_empty() {
        Path::new(target)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        alt
    };
    format!(
        "<div class=\"imageblock\">\n<div class=\"content\">\n<img src=\"{}\" alt=\"{}\">\n</div>\n</div>",
        escape(target),
        escape(&alt)
    )
}

// ============================================================================
// Inline formatting
// ============================================================================

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s\[\]<]+").unwrap());

static MONO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[\s(>])\*([^*\n]+)\*").unwrap());

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[\s(>])_([^_\n]+)_($|[\s).,:;!?])").unwrap());

fn inline(text: &str) -> String {
    let text = escape(text);

    let text = BARE_URL.replace_all(&text, |caps: &Captures| {
        let full = caps.get(0).unwrap().as_str();
        let url = full.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        let trailing = &full[url.len()..];
        format!("<a href=\"{url}\" class=\"bare\">{url}</a>{trailing}")
    });

    let text = MONO.replace_all(&text, "<code>$1</code>");
    let text = STRONG.replace_all(&text, "$1<strong>$2</strong>");
    let text = EMPHASIS.replace_all(&text, "$1<em>$2</em>$3");
    text.into_owned()
}
