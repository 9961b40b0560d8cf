//! Shared types, error model, and configuration for the Bestium docs build.
//!
//! This crate is the foundation depended on by all other docs crates.
//! It provides:
//! - [`DocsError`]: the unified error type
//! - Domain types ([`Tag`], [`Constants`], [`ResolvedVersions`], [`SidebarItem`])
//! - Configuration ([`DocsConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BuildPathsConfig, CONFIG_FILE_NAME, DocsConfig, MarkdownConfig, RepoRef, SiteConfig,
    VersionsConfig, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DocsError, Result};
pub use types::{
    Commit, Constants, PAPER_VERSION_PLACEHOLDER, ResolvedVersions, SidebarItem, SocialLink, Tag,
    VERSION_PLACEHOLDER, javadoc_root,
};
