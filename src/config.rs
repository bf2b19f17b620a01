//! Build and site configuration loading.
//!
//! Three small JSON files drive the pipeline, all relative to a base
//! directory:
//!
//! - **`build-configuration.json`** — where things live for one site:
//!
//!   ```json
//!   { "content": "./content", "theme": "./theme", "dist": "./dist" }
//!   ```
//!
//! - **`site.json`** — view data for the composer. `title` and `socials`
//!   are interpreted; every other key is carried opaquely so themes can add
//!   fields without code changes:
//!
//!   ```json
//!   { "title": "My Blog", "socials": [{ "icon": "github", "url": "…" }] }
//!   ```
//!
//! - **`sites.json`** — the multi-site wrapper: a list of site directories
//!   to build, plus whether to render a launch page over them:
//!
//!   ```json
//!   { "includeLaunchPage": true, "sites": [{ "path": "programming" }] }
//!   ```
//!
//! A missing or unparseable `build-configuration.json` is fatal — nothing
//! can be built without it. `site.json` is also required per site, since the
//! composer cannot title pages without it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BUILD_CONFIG_FILE: &str = "build-configuration.json";
pub const SITE_CONFIG_FILE: &str = "site.json";
pub const SITES_CONFIG_FILE: &str = "sites.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Per-site directory layout, paths relative to the site's base directory.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfiguration {
    pub content: String,
    pub theme: String,
    pub dist: String,
}

/// Site-level view data for the composer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfiguration {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub socials: Vec<Social>,
    /// Everything else in `site.json`, passed through untouched.
    #[serde(default, flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Social {
    pub icon: String,
    pub url: String,
}

/// The multi-site wrapper configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitesConfiguration {
    #[serde(default)]
    pub include_launch_page: bool,
    pub sites: Vec<SiteEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Site directory under the shared base, also its URL prefix.
    pub path: String,
    /// Card image for the launch page.
    #[serde(default)]
    pub image: Option<String>,
}

pub fn load_build_configuration(base_dir: &Path) -> Result<BuildConfiguration, ConfigError> {
    load_json(&base_dir.join(BUILD_CONFIG_FILE))
}

pub fn load_site_configuration(base_dir: &Path) -> Result<SiteConfiguration, ConfigError> {
    load_json(&base_dir.join(SITE_CONFIG_FILE))
}

pub fn load_sites_configuration(base_dir: &Path) -> Result<SitesConfiguration, ConfigError> {
    load_json(&base_dir.join(SITES_CONFIG_FILE))
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
