//! Core domain types for the docs site.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Substituted for any version that could not be resolved.
pub const VERSION_PLACEHOLDER: &str = "LATEST_VERSION";

/// Substituted for the Paper API version when it could not be resolved.
pub const PAPER_VERSION_PLACEHOLDER: &str = "LATEST_VERSION-R0.1-SNAPSHOT";

// ---------------------------------------------------------------------------
// GitHub tags
// ---------------------------------------------------------------------------

/// Commit pointer as returned by the GitHub tags endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub url: String,
}

/// A single entry of `GET /repos/{owner}/{repo}/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: Commit,
}

impl Tag {
    /// Version string carried by the tag name (`v1.2.0` -> `1.2.0`).
    pub fn version(&self) -> &str {
        self.name.strip_prefix('v').unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// ResolvedVersions
// ---------------------------------------------------------------------------

/// Versions discovered once at startup and interpolated into the docs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVersions {
    /// Latest Bestium release.
    pub latest_bestium: String,
    /// Latest paperweight-userdev release.
    pub latest_userdev: String,
    /// Paper API version Bestium's latest release builds against.
    pub bestium_paper: String,
    /// Javadoc root for the latest Bestium release.
    pub latest_javadoc: String,
}

impl ResolvedVersions {
    /// All-placeholder versions, used offline and as the failure fallback.
    pub fn placeholder(javadoc_base: &str) -> Self {
        Self {
            latest_bestium: VERSION_PLACEHOLDER.into(),
            latest_userdev: VERSION_PLACEHOLDER.into(),
            bestium_paper: PAPER_VERSION_PLACEHOLDER.into(),
            latest_javadoc: javadoc_root(javadoc_base, VERSION_PLACEHOLDER),
        }
    }

    /// Project the versions into the named constants used by markdown pages.
    pub fn to_constants(&self) -> Constants {
        let mut constants = Constants::default();
        constants.insert("LATEST_BESTIUM", &self.latest_bestium);
        constants.insert("LATEST_USERDEV", &self.latest_userdev);
        constants.insert("BESTIUM_PAPER", &self.bestium_paper);
        constants.insert("LATEST_JAVADOC", &self.latest_javadoc);
        constants
    }
}

/// Join the javadoc host with a release version.
pub fn javadoc_root(base: &str, version: &str) -> String {
    format!("{}/{version}", base.trim_end_matches('/'))
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Placeholder name -> resolved value. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constants(BTreeMap<String, String>);

impl Constants {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Add entries from `other` that are not already present.
    pub fn merge_missing(&mut self, other: &BTreeMap<String, String>) {
        for (name, value) in other {
            self.0
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Constants {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// A sidebar entry: a page link or a labelled group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarItem {
    Link { label: String, slug: String },
    Group { label: String, items: Vec<SidebarItem> },
}

impl SidebarItem {
    pub fn link(label: &str, slug: &str) -> Self {
        Self::Link {
            label: label.into(),
            slug: slug.into(),
        }
    }

    pub fn group(label: &str, items: Vec<SidebarItem>) -> Self {
        Self::Group {
            label: label.into(),
            items,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Link { label, .. } | Self::Group { label, .. } => label,
        }
    }

    /// Every page slug referenced by this entry, depth first.
    pub fn slugs(&self) -> Vec<&str> {
        match self {
            Self::Link { slug, .. } => vec![slug.as_str()],
            Self::Group { items, .. } => items.iter().flat_map(SidebarItem::slugs).collect(),
        }
    }
}

/// A header link to an external profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub icon: String,
    pub label: String,
    pub href: String,
}
