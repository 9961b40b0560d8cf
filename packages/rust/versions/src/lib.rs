//! Best-effort release version resolution against GitHub.
//!
//! Before any page is rendered the build asks GitHub for the latest Bestium
//! and paperweight tags, then reads the Paper API version out of Bestium's
//! version catalog at that tag's commit. Every fetch is allowed to fail: a
//! failed lookup yields a placeholder string instead of breaking the build.

mod catalog;

use std::time::Duration;

use bestium_docs_shared::{
    DocsError, PAPER_VERSION_PLACEHOLDER, RepoRef, ResolvedVersions, Result, Tag,
    VERSION_PLACEHOLDER, VersionsConfig, javadoc_root,
};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use catalog::extract_catalog_version;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

/// Fixed per-request timeout; not configurable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent string; the GitHub API rejects anonymous agents.
const USER_AGENT: &str = concat!("bestium-docs/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Resolver options
// ---------------------------------------------------------------------------

/// Where and how versions are looked up.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// GitHub REST API base (`https://api.github.com`).
    pub api_base: String,
    /// Raw file host base (`https://raw.githubusercontent.com`).
    pub raw_base: String,
    /// Project whose latest release is documented.
    pub project: RepoRef,
    /// Userdev plugin repository.
    pub userdev: RepoRef,
    /// Version catalog path inside the project.
    pub catalog_path: String,
    /// Catalog key holding the Paper version.
    pub catalog_key: String,
    /// Javadoc host the release version is appended to.
    pub javadoc_base: String,
    /// Return placeholders without touching the network.
    pub offline: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::from(&VersionsConfig::default())
    }
}

impl From<&VersionsConfig> for ResolverOptions {
    fn from(config: &VersionsConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            raw_base: config.raw_base.clone(),
            project: config.project.clone(),
            userdev: config.userdev.clone(),
            catalog_path: config.catalog_path.clone(),
            catalog_key: config.catalog_key.clone(),
            javadoc_base: config.javadoc_base.clone(),
            offline: config.offline,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Resolve every version constant the docs interpolate.
///
/// Fetches are awaited one after another. The catalog lookup depends on the
/// project's latest tag, so it is skipped when no tag was found. The only
/// error returned is a failure to build the HTTP client; lookup failures are
/// logged and replaced by placeholders.
#[instrument(skip_all, fields(project = %opts.project, offline = opts.offline))]
pub async fn resolve(opts: &ResolverOptions) -> Result<ResolvedVersions> {
    if opts.offline {
        info!("offline mode, using placeholder versions");
        return Ok(ResolvedVersions::placeholder(&opts.javadoc_base));
    }

    let client = build_client()?;

    let project_tag = latest_tag(&client, &opts.api_base, &opts.project).await;
    let latest_bestium = version_or_placeholder(project_tag.as_ref());

    let userdev_tag = latest_tag(&client, &opts.api_base, &opts.userdev).await;
    let latest_userdev = version_or_placeholder(userdev_tag.as_ref());

    let bestium_paper = match &project_tag {
        Some(tag) => paper_version(&client, opts, &tag.commit.sha).await,
        None => {
            debug!("no project tag, skipping catalog lookup");
            PAPER_VERSION_PLACEHOLDER.to_string()
        }
    };

    let latest_javadoc = javadoc_root(&opts.javadoc_base, &latest_bestium);

    info!(
        %latest_bestium,
        %latest_userdev,
        %bestium_paper,
        "versions resolved"
    );

    Ok(ResolvedVersions {
        latest_bestium,
        latest_userdev,
        bestium_paper,
        latest_javadoc,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn version_or_placeholder(tag: Option<&Tag>) -> String {
    tag.map(|t| t.version().to_string())
        .unwrap_or_else(|| VERSION_PLACEHOLDER.to_string())
}

/// First tag of a repository, or `None` on any failure or an empty list.
async fn latest_tag(client: &Client, api_base: &str, repo: &RepoRef) -> Option<Tag> {
    match fetch_tags(client, api_base, repo).await {
        Ok(tags) => {
            debug!(%repo, count = tags.len(), "tags fetched");
            tags.into_iter().next()
        }
        Err(e) => {
            warn!(%repo, error = %e, "tag lookup failed, using placeholder");
            None
        }
    }
}

/// Paper version from the project's catalog at `sha`, or the compound placeholder.
async fn paper_version(client: &Client, opts: &ResolverOptions, sha: &str) -> String {
    let url = catalog_url(&opts.raw_base, &opts.project, sha, &opts.catalog_path);

    let catalog = match fetch_text(client, &url).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "catalog lookup failed, using placeholder");
            return PAPER_VERSION_PLACEHOLDER.to_string();
        }
    };

    extract_catalog_version(&catalog, &opts.catalog_key).unwrap_or_else(|| {
        warn!(key = %opts.catalog_key, %url, "catalog has no matching entry");
        PAPER_VERSION_PLACEHOLDER.to_string()
    })
}

/// `GET {api_base}/repos/{owner}/{repo}/tags`, decoded.
async fn fetch_tags(client: &Client, api_base: &str, repo: &RepoRef) -> Result<Vec<Tag>> {
    let url = tags_url(api_base, repo)?;
    let body = fetch_text(client, url.as_str()).await?;

    serde_json::from_str(&body)
        .map_err(|e| DocsError::validation(format!("{url}: unexpected tags payload: {e}")))
}

fn tags_url(api_base: &str, repo: &RepoRef) -> Result<Url> {
    let raw = format!(
        "{}/repos/{}/{}/tags",
        api_base.trim_end_matches('/'),
        repo.owner,
        repo.repo
    );
    Url::parse(&raw).map_err(|e| DocsError::validation(format!("invalid tags URL {raw}: {e}")))
}

fn catalog_url(raw_base: &str, repo: &RepoRef, sha: &str, path: &str) -> String {
    format!(
        "{}/{}/{}/{sha}/{}",
        raw_base.trim_end_matches('/'),
        repo.owner,
        repo.repo,
        path.trim_start_matches('/')
    )
}

/// Build a reqwest client with appropriate settings.
fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| DocsError::Network(format!("failed to build HTTP client: {e}")))
}

/// Fetch a URL, treating any non-success status as an error.
async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DocsError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocsError::Network(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| DocsError::Network(format!("{url}: failed to read body: {e}")))
}
