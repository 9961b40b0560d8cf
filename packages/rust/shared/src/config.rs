//! Site configuration for the docs build.
//!
//! Config lives at `bestium-docs.toml` in the site root.
//! CLI flags override config file values, which override defaults.
//! The defaults describe the Bestium documentation site.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsError, Result};
use crate::types::{SidebarItem, SocialLink};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "bestium-docs.toml";

// ---------------------------------------------------------------------------
// Config structs (matching bestium-docs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level docs config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Site identity and header links.
    #[serde(default)]
    pub site: SiteConfig,

    /// Where pages are read from and HTML is written to.
    #[serde(default)]
    pub build: BuildPathsConfig,

    /// Remote version sources.
    #[serde(default)]
    pub versions: VersionsConfig,

    /// Markdown plugin settings.
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Sidebar navigation, in display order.
    #[serde(default = "default_sidebar")]
    pub sidebar: Vec<SidebarItem>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            build: BuildPathsConfig::default(),
            versions: VersionsConfig::default(),
            markdown: MarkdownConfig::default(),
            sidebar: default_sidebar(),
        }
    }
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_favicon")]
    pub favicon: String,

    #[serde(default = "default_social")]
    pub social: Vec<SocialLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            favicon: default_favicon(),
            social: default_social(),
        }
    }
}

fn default_title() -> String {
    "Bestium Docs".into()
}
fn default_favicon() -> String {
    "/favicon.ico".into()
}
fn default_social() -> Vec<SocialLink> {
    vec![
        SocialLink {
            icon: "github".into(),
            label: "GitHub".into(),
            href: "https://github.com/huzvanec/Bestium".into(),
        },
        SocialLink {
            icon: "seti:java".into(),
            label: "Javadocs".into(),
            href: "javadocs/".into(),
        },
    ]
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPathsConfig {
    /// Directory scanned for `.md`/`.mdx` pages.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory the rendered site is written to.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for BuildPathsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_content_dir() -> String {
    "src/content/docs".into()
}
fn default_out_dir() -> String {
    "dist".into()
}

/// A GitHub repository coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// `[versions]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsConfig {
    /// Skip the network and use placeholders.
    #[serde(default)]
    pub offline: bool,

    /// Base of the GitHub REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base of the raw file host.
    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    /// The documented project.
    #[serde(default = "default_project")]
    pub project: RepoRef,

    /// The userdev Gradle plugin repository.
    #[serde(default = "default_userdev")]
    pub userdev: RepoRef,

    /// Version catalog path inside the project repository.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Catalog key holding the Paper API version.
    #[serde(default = "default_catalog_key")]
    pub catalog_key: String,

    /// Javadoc host; the release version is appended as a path segment.
    #[serde(default = "default_javadoc_base")]
    pub javadoc_base: String,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            offline: false,
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            project: default_project(),
            userdev: default_userdev(),
            catalog_path: default_catalog_path(),
            catalog_key: default_catalog_key(),
            javadoc_base: default_javadoc_base(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}
fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_project() -> RepoRef {
    RepoRef::new("huzvanec", "Bestium")
}
fn default_userdev() -> RepoRef {
    RepoRef::new("PaperMC", "paperweight")
}
fn default_catalog_path() -> String {
    "gradle/libs.versions.toml".into()
}
fn default_catalog_key() -> String {
    "paper".into()
}
fn default_javadoc_base() -> String {
    "https://jd.bestium.jeme.cz".into()
}

/// `[markdown]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Code block meta word that opts a block into constant substitution.
    #[serde(default = "default_replace_marker")]
    pub replace_marker: String,

    /// Also substitute constants in prose, inline code and raw HTML.
    #[serde(default = "default_true")]
    pub replace_in_text: bool,

    /// Rewrite `jd::` links to javadoc URLs.
    #[serde(default = "default_true")]
    pub javadoc_links: bool,

    /// Static constants, overridden by resolved versions of the same name.
    #[serde(default)]
    pub constants: BTreeMap<String, String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            replace_marker: default_replace_marker(),
            replace_in_text: true,
            javadoc_links: true,
            constants: BTreeMap::new(),
        }
    }
}

fn default_replace_marker() -> String {
    "replace".into()
}
fn default_true() -> bool {
    true
}

fn default_sidebar() -> Vec<SidebarItem> {
    vec![
        SidebarItem::group(
            "Start Here",
            vec![SidebarItem::link("About Bestium", "start/about-bestium")],
        ),
        SidebarItem::group(
            "Server Setup",
            vec![
                SidebarItem::link("Installation", "server/installation"),
                SidebarItem::link("Usage", "server/usage"),
            ],
        ),
        SidebarItem::group(
            "Bestium API",
            vec![
                SidebarItem::link("Project setup", "code/project-setup"),
                SidebarItem::link("Coding an entity", "code/coding-entity"),
                SidebarItem::link("Injecting an entity", "code/injecting-entity"),
                SidebarItem::link("Spawning an entity", "code/spawning-entity"),
                SidebarItem::link("Interacting with an entity", "code/interacting-with-entity"),
                SidebarItem::group(
                    "Lifehacks",
                    vec![
                        SidebarItem::link("Introduction to Lifehacks", "code/lifehacks/introduction"),
                        SidebarItem::link("Mob aging with BetterModel", "code/lifehacks/mob-aging"),
                    ],
                ),
            ],
        ),
    ]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Resolve the config path, defaulting to `bestium-docs.toml` in the working directory.
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Load the docs config. Returns defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<DocsConfig> {
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(DocsConfig::default());
    }

    load_config_from(path)
}

/// Load the docs config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<DocsConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocsError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file. Refuses to overwrite unless `force` is set.
pub fn init_config(path: &Path, force: bool) -> Result<PathBuf> {
    if path.exists() && !force {
        return Err(DocsError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&DocsConfig::default())
        .map_err(|e| DocsError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DocsError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
