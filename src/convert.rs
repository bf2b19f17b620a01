//! Article source conversion to HTML.
//!
//! One entry point, [`convert`], dispatching over the two supported source
//! formats. Format is a tagged variant resolved once per file from its
//! recognized basename — two fixed formats don't warrant a trait hierarchy.
//!
//! ## Markdown
//!
//! Rendered with [pulldown-cmark], then two ordered post-passes over the
//! generated HTML:
//!
//! 1. **Diagram fences**: a ` ```mermaid ` code block becomes an `<img>`
//!    pointing at kroki.io, which renders the diagram server-side when the
//!    page is viewed. The diagram text travels inside the URL itself:
//!    zlib-deflated, then base64-encoded with the URL-safe alphabet.
//! 2. **Bare video links**: a paragraph that is exactly a link to a YouTube
//!    watch URL (or `youtu.be` short link) becomes a responsive iframe embed.
//!
//! ## AsciiDoc
//!
//! Rendered by the in-crate [`crate::adoc`] converter (diagram blocks are
//! handled during conversion there), then the same bare-video rewrite
//! matching Asciidoctor's distinct paragraph wrapper.
//!
//! Both video passes emit byte-identical embed markup so themed pages render
//! consistently regardless of the source format.
//!
//! Conversion failures are fatal to the build: a malformed source document
//! is an authoring error, not something to paper over.

use crate::adoc;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use pulldown_cmark::{Parser, html as md_html};
use regex::{Captures, Regex};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("include target not found: {0}")]
    MissingInclude(PathBuf),
    #[error("include target escapes the document directory: {0}")]
    UnsafeInclude(PathBuf),
}

/// Article source format, resolved from the recognized basename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Markdown,
    Asciidoc,
}

impl Format {
    /// Match a file against the canonical article-source names.
    ///
    /// Returns `None` for everything that is not an article source — the
    /// walk-level filter that decides which files the article stage touches.
    pub fn from_source_name(path: &Path) -> Option<Format> {
        match path.file_name()?.to_str()? {
            "ReadMe.md" => Some(Format::Markdown),
            "ReadMe.adoc" => Some(Format::Asciidoc),
            _ => None,
        }
    }
}

/// Convert one article source to HTML.
///
/// `source_dir` is the directory holding the source file; the AsciiDoc path
/// resolves `include::` targets against it (and refuses to look outside it).
pub fn convert(source: &str, format: Format, source_dir: &Path) -> Result<String, ConvertError> {
    match format {
        Format::Markdown => {
            let html = markdown_to_html(source);
            let html = rewrite_diagram_blocks(&html);
            Ok(rewrite_video_links(&html, &MD_VIDEO_PARAGRAPH))
        }
        Format::Asciidoc => {
            let html = adoc::to_html(source, source_dir)?;
            Ok(rewrite_video_links(&html, &ADOC_VIDEO_PARAGRAPH))
        }
    }
}

/// Plain Markdown rendering with no post-passes. Used for note bodies, which
/// carry no diagrams or video embeds.
pub fn markdown_to_html(source: &str) -> String {
    let mut html = String::new();
    md_html::push_html(&mut html, Parser::new(source));
    html.trim_end().to_string()
}

// ============================================================================
// Diagram rewriting (Markdown only; AsciiDoc handles diagrams in-converter)
// ============================================================================

static MERMAID_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code class="language-mermaid">(.+?)</code></pre>"#).unwrap()
});

fn rewrite_diagram_blocks(html: &str) -> String {
    MERMAID_BLOCK
        .replace_all(html, |caps: &Captures| {
            diagram_image(&unescape_html(&caps[1]))
        })
        .into_owned()
}

/// Build the kroki `<img>` for a raw (unescaped) diagram source.
///
/// The encoding is kroki's GET contract: zlib deflate, then base64 with `+`
/// and `/` swapped for `-` and `_` (padding kept).
pub fn diagram_image(diagram: &str) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec cannot fail.
    encoder.write_all(diagram.as_bytes()).unwrap();
    let encoded = URL_SAFE.encode(encoder.finish().unwrap());
    format!(r#"<img src="https://kroki.io/mermaid/svg/{encoded}" alt="Mermaid diagram"/>"#)
}

/// Reverse the HTML-entity escaping the renderer applied inside code blocks.
/// `&amp;` last, so doubly-escaped text is not over-unescaped.
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

// ============================================================================
// Bare video link rewriting
// ============================================================================

const VIDEO_URL: &str = r"https?://(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)";

static MD_VIDEO_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"<p><a href="{VIDEO_URL}([-\w]+)">{VIDEO_URL}[-\w]+</a></p>"#
    ))
    .unwrap()
});

static ADOC_VIDEO_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"<div class="paragraph">\n<p><a href="{VIDEO_URL}([-\w]+)" class="bare">{VIDEO_URL}[-\w]+</a></p>\n</div>"#
    ))
    .unwrap()
});

fn rewrite_video_links(html: &str, paragraph: &Regex) -> String {
    paragraph
        .replace_all(html, |caps: &Captures| video_embed(&caps[1]))
        .into_owned()
}

/// The responsive embed block. Shared by both format paths so the output is
/// byte-identical whichever converter produced the surrounding page.
pub fn video_embed(video_id: &str) -> String {
    format!(
        r#"<div style="position: relative; padding-bottom: 56.25%; height: 0; overflow: hidden; max-width: 100%;"><iframe src="https://www.youtube.com/embed/{video_id}" frameborder="0" allowfullscreen style="position: absolute; top: 0; left: 0; width: 100%; height: 100%;"></iframe></div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert_md(source: &str) -> String {
        convert(source, Format::Markdown, Path::new(".")).unwrap()
    }

    // =========================================================================
    // Format dispatch
    // =========================================================================

    #[test]
    fn format_resolved_from_basename() {
        assert_eq!(
            Format::from_source_name(Path::new("a/b/ReadMe.md")),
            Some(Format::Markdown)
        );
        assert_eq!(
            Format::from_source_name(Path::new("a/b/ReadMe.adoc")),
            Some(Format::Asciidoc)
        );
        assert_eq!(Format::from_source_name(Path::new("a/b/readme.md")), None);
        assert_eq!(Format::from_source_name(Path::new("a/b/notes.md")), None);
        assert_eq!(Format::from_source_name(Path::new("a/b/ReadMe.html")), None);
    }

    // =========================================================================
    // Markdown rendering
    // =========================================================================

    #[test]
    fn renders_basic_markdown() {
        let html = convert_md("# Title\n\nSome *emphasis* here.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn markdown_output_has_no_trailing_newline() {
        assert_eq!(markdown_to_html("Hello"), "<p>Hello</p>");
    }

    // =========================================================================
    // Diagram rewriting
    // =========================================================================

    #[test]
    fn mermaid_fence_becomes_kroki_image() {
        let html = convert_md("```mermaid\ngraph TD;\n  A-->B;\n```\n");
        assert!(!html.contains("language-mermaid"));
        assert!(html.contains(r#"<img src="https://kroki.io/mermaid/svg/"#));
        assert!(html.contains(r#"alt="Mermaid diagram"/>"#));
    }

    #[test]
    fn kroki_url_is_deterministic_and_url_safe() {
        let a = diagram_image("graph TD;\n  A-->B;\n");
        let b = diagram_image("graph TD;\n  A-->B;\n");
        assert_eq!(a, b);

        let src = a
            .split("svg/")
            .nth(1)
            .unwrap()
            .split('"')
            .next()
            .unwrap();
        assert!(!src.contains('+'));
        assert!(!src.contains('/'));
    }

    #[test]
    fn diagram_text_is_unescaped_before_compression() {
        // `A --> B` renders as `A --&gt; B` inside the code block; the image
        // for the raw text must match the image built from the fence.
        let html = convert_md("```mermaid\ngraph TD;\nA --> B;\n```\n");
        let direct = diagram_image("graph TD;\nA --> B;\n");
        assert!(html.contains(&direct));
    }

    #[test]
    fn non_mermaid_fences_are_untouched() {
        let html = convert_md("```rust\nfn main() {}\n```\n");
        assert!(html.contains("language-rust"));
        assert!(!html.contains("kroki.io"));
    }

    #[test]
    fn multiple_diagrams_each_rewritten() {
        let html = convert_md("```mermaid\ngraph A;\n```\n\ntext\n\n```mermaid\ngraph B;\n```\n");
        assert_eq!(html.matches("kroki.io").count(), 2);
    }

    // =========================================================================
    // Video link rewriting
    // =========================================================================

    #[test]
    fn bare_watch_link_paragraph_becomes_embed() {
        let html = convert_md("<https://www.youtube.com/watch?v=dQw4w9WgXcQ>");
        assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert!(html.contains("padding-bottom: 56.25%"));
        assert!(!html.contains("<a href"));
    }

    #[test]
    fn short_link_form_is_recognized() {
        let html = convert_md("<https://youtu.be/dQw4w9WgXcQ>");
        assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
    }

    #[test]
    fn video_link_with_surrounding_text_is_left_alone() {
        let html = convert_md("Watch <https://youtu.be/dQw4w9WgXcQ> tonight");
        assert!(!html.contains("embed"));
        assert!(html.contains("<a href"));
    }

    #[test]
    fn non_video_link_paragraph_is_left_alone() {
        let html = convert_md("<https://example.com/watch?v=nope>");
        assert!(!html.contains("iframe"));
    }

    #[test]
    fn both_formats_emit_identical_embed_markup() {
        let md = convert_md("<https://www.youtube.com/watch?v=abc123XYZ-_>");
        let adoc = convert(
            "https://www.youtube.com/watch?v=abc123XYZ-_",
            Format::Asciidoc,
            Path::new("."),
        )
        .unwrap();
        let embed = video_embed("abc123XYZ-_");
        assert!(md.contains(&embed));
        assert!(adoc.contains(&embed));
    }

    #[test]
    fn mixed_document_rewrites_exactly_once_each() {
        let source = "intro\n\n```mermaid\ngraph TD;\n```\n\n<https://youtu.be/vid-01>\n\noutro\n";
        let html = convert_md(source);
        assert_eq!(html.matches("kroki.io").count(), 1);
        assert_eq!(html.matches("youtube.com/embed").count(), 1);
        assert!(html.contains("<p>intro</p>"));
        assert!(html.contains("<p>outro</p>"));
    }
}
