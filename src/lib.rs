//! # Pressroom
//!
//! A minimal static site generator for article and notes blogs. Your
//! filesystem is the data source: one directory per article holding a
//! `ReadMe.md` or `ReadMe.adoc`, metadata embedded in the document or in a
//! sibling `metadata.json`, and multi-note Markdown files with `----`
//! fences between dated entries.
//!
//! # Architecture: One-Shot Batch Pipeline
//!
//! A build is a strict, sequential transformation of a working copy:
//!
//! ```text
//! 1. Copy     content/  →  dist/           (fresh working copy)
//! 2. Articles dist/**/ReadMe.{md,adoc}  →  ReadMe.html + articles.json
//! 3. Notes    content/notes/*.md        →  notes.json
//! 4. Compose  indices + artifacts       →  themed pages
//! ```
//!
//! The article stage is deliberately destructive *inside the working copy*:
//! each source is replaced in place by its HTML artifact (write artifact,
//! then delete source — never the reverse, so a failed conversion loses
//! nothing). Re-running a build starts from a fresh copy, so the pipeline
//! as a whole is idempotent.
//!
//! The index files are the contract between stages: `articles.json` and
//! `notes.json` are small JSON manifests the composer lists and sorts
//! without re-parsing full documents. An absent index means "no items",
//! never an error.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`walk`] | Depth-first file visitor; missing roots are empty, visitors may mutate |
//! | [`convert`] | Markdown/AsciiDoc → HTML, kroki diagram and video embed rewrites |
//! | [`adoc`] | The in-crate AsciiDoc subset converter behind [`convert`] |
//! | [`metadata`] | Embedded-block extraction with sidecar `metadata.json` fallback |
//! | [`articles`] | The core transform-and-index walk over article sources |
//! | [`notes`] | Fence-separated note parsing and indexing |
//! | [`compose`] | Maud-rendered home/archive/notes/article pages from the indices |
//! | [`site`] | Per-site orchestration, multi-site builds, launch page |
//! | [`config`] | `build-configuration.json` / `site.json` / `sites.json` loading |
//! | [`output`] | CLI output formatting — pure `format_*` plus `print_*` wrappers |
//! | [`types`] | Shared types (per-item skip reports) |
//!
//! # Design Decisions
//!
//! ## Diagrams Without a Toolchain
//!
//! Mermaid blocks are not rendered at build time. The diagram text is
//! deflate-compressed into a <https://kroki.io> image URL, so the browser
//! fetches the rendered SVG when the page is viewed. The build stays pure
//! string work — no JVM, no headless browser, no network.
//!
//! ## Maud Over Template Engines
//!
//! Composed pages are generated with [Maud](https://maud.lambda.xyz/)
//! rather than a runtime template engine: malformed HTML is a build error,
//! interpolation is auto-escaped, and there is no template directory to
//! ship or get out of sync.
//!
//! ## Errors Are Either Fatal or Per-Item, Never Silent
//!
//! Anything that could corrupt the working copy (read/convert/write/delete
//! during artifact replacement, unreadable configuration, broken directory
//! walks) aborts the run. Anything scoped to one item (missing or
//! malformed metadata, an unparseable note date) is collected as a
//! [`types::Skip`] with the offending path and reported after the run.

pub mod adoc;
pub mod articles;
pub mod compose;
pub mod config;
pub mod convert;
pub mod metadata;
pub mod notes;
pub mod output;
pub mod site;
pub mod types;
pub mod walk;
