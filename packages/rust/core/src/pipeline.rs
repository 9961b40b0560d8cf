//! End-to-end `build` pipeline: versions → scan → render → write site.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument, warn};

use bestium_docs_markdown::{Pipeline, render_page};
use bestium_docs_shared::{Constants, DocsConfig, DocsError, ResolvedVersions, Result};
use bestium_docs_versions::ResolverOptions;

use crate::layout::{PageShell, render_document};
use crate::nav;
use crate::scan::{self, SourcePage};

/// File the resolved constants are written to, relative to the output root.
pub const VERSIONS_FILE: &str = "versions.json";

/// Configuration for the `build_site` pipeline.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Loaded site configuration.
    pub docs: DocsConfig,
    /// Directory scanned for pages.
    pub content_dir: PathBuf,
    /// Directory the site is written to.
    pub out_dir: PathBuf,
    /// Version lookup settings.
    pub resolver: ResolverOptions,
}

impl BuildConfig {
    /// Build settings straight from the config file, paths relative to `root`.
    pub fn from_docs(docs: DocsConfig, root: &Path) -> Self {
        Self {
            content_dir: root.join(&docs.build.content_dir),
            out_dir: root.join(&docs.build.out_dir),
            resolver: ResolverOptions::from(&docs.versions),
            docs,
        }
    }
}

/// Result of the `build_site` pipeline.
#[derive(Debug)]
pub struct BuildResult {
    /// Output directory.
    pub out_dir: PathBuf,
    /// Number of pages written.
    pub page_count: usize,
    /// Versions interpolated into the pages.
    pub versions: ResolvedVersions,
    /// Sidebar slugs that have no page.
    pub missing_slugs: Vec<String>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is written.
    fn page_rendered(&self, slug: &str, current: usize, total: usize);
    /// Called when the build completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_rendered(&self, _slug: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Versions, constants and the markdown pipeline for one build.
#[derive(Debug)]
pub struct Prepared {
    pub versions: ResolvedVersions,
    pub constants: Constants,
    pub pipeline: Pipeline,
}

/// Resolve versions once and assemble the markdown pipeline from them.
pub async fn prepare(docs: &DocsConfig, resolver: &ResolverOptions) -> Result<Prepared> {
    let versions = bestium_docs_versions::resolve(resolver).await?;

    let mut constants = versions.to_constants();
    constants.merge_missing(&docs.markdown.constants);

    let pipeline = Pipeline::from_config(&docs.markdown, constants.clone(), &versions.latest_javadoc);

    Ok(Prepared {
        versions,
        constants,
        pipeline,
    })
}

/// Run the full `build` pipeline.
///
/// 1. Resolve versions (once, before any page)
/// 2. Scan the content directory
/// 3. Validate the sidebar against the pages found
/// 4. Render and write every page
/// 5. Write `versions.json`
#[instrument(skip_all, fields(content = %config.content_dir.display(), out = %config.out_dir.display()))]
pub async fn build_site(
    config: &BuildConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();

    // --- Phase 1: Versions ---
    progress.phase("Resolving versions");
    let prepared = prepare(&config.docs, &config.resolver).await?;

    // --- Phase 2: Scan ---
    progress.phase("Scanning content");
    let pages = scan::scan_pages(&config.content_dir)?;
    if pages.is_empty() {
        return Err(DocsError::validation(format!(
            "no markdown pages found in {}",
            config.content_dir.display()
        )));
    }

    // --- Phase 3: Sidebar ---
    let known: BTreeSet<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
    let missing_slugs: Vec<String> = nav::missing_slugs(&config.docs.sidebar, &known)
        .into_iter()
        .map(str::to_string)
        .collect();
    for slug in &missing_slugs {
        warn!(%slug, "sidebar entry has no matching page");
    }

    // --- Phase 4: Render ---
    progress.phase("Rendering pages");
    std::fs::create_dir_all(&config.out_dir).map_err(|e| DocsError::io(&config.out_dir, e))?;

    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        write_page(config, &prepared.pipeline, page)?;
        progress.page_rendered(&page.slug, i + 1, total);
    }

    // --- Phase 5: Versions manifest ---
    let versions_path = config.out_dir.join(VERSIONS_FILE);
    let json = serde_json::to_string_pretty(&prepared.constants)
        .map_err(|e| DocsError::Render(format!("failed to serialize constants: {e}")))?;
    std::fs::write(&versions_path, json).map_err(|e| DocsError::io(&versions_path, e))?;

    let result = BuildResult {
        out_dir: config.out_dir.clone(),
        page_count: total,
        versions: prepared.versions,
        missing_slugs,
        elapsed: start.elapsed(),
    };

    info!(
        pages = result.page_count,
        missing = result.missing_slugs.len(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "site built"
    );

    progress.done(&result);
    Ok(result)
}

/// Render one page and write it to `{out}/{slug}/index.html`.
fn write_page(config: &BuildConfig, pipeline: &Pipeline, page: &SourcePage) -> Result<()> {
    let source = std::fs::read_to_string(&page.path).map_err(|e| DocsError::io(&page.path, e))?;
    let rendered = render_page(&source, pipeline);

    let title = rendered
        .title
        .clone()
        .unwrap_or_else(|| scan::title_from_slug(&page.slug));

    let document = render_document(
        &config.docs.site,
        &PageShell {
            title: &title,
            heading: !rendered.title_in_body,
            description: rendered.description.as_deref(),
            sidebar: nav::render_sidebar(&config.docs.sidebar, &page.slug),
            body_html: &rendered.html,
        },
    );

    let dir = output_dir_for(&config.out_dir, &page.slug);
    std::fs::create_dir_all(&dir).map_err(|e| DocsError::io(&dir, e))?;
    let target = dir.join("index.html");
    std::fs::write(&target, document).map_err(|e| DocsError::io(&target, e))?;

    Ok(())
}

fn output_dir_for(out_dir: &Path, slug: &str) -> PathBuf {
    slug.split('/')
        .filter(|s| !s.is_empty())
        .fold(out_dir.to_path_buf(), |dir, segment| dir.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestium_docs_shared::{PAPER_VERSION_PLACEHOLDER, VERSION_PLACEHOLDER};
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/site")
    }

    fn temp_out(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bestium-docs-{name}-{}", Uuid::now_v7()))
    }

    fn offline_config(out_dir: PathBuf) -> BuildConfig {
        let mut docs = DocsConfig::default();
        docs.versions.offline = true;
        let mut config = BuildConfig::from_docs(docs, &fixture_root());
        config.content_dir = fixture_root().join("docs");
        config.out_dir = out_dir;
        config
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
    }

    #[test]
    fn output_dir_for_slugs() {
        let out = Path::new("/site");
        assert_eq!(output_dir_for(out, ""), PathBuf::from("/site"));
        assert_eq!(
            output_dir_for(out, "server/installation"),
            PathBuf::from("/site/server/installation")
        );
    }

    #[test]
    fn build_config_paths_are_relative_to_root() {
        let config = BuildConfig::from_docs(DocsConfig::default(), Path::new("/repo"));
        assert_eq!(config.content_dir, PathBuf::from("/repo/src/content/docs"));
        assert_eq!(config.out_dir, PathBuf::from("/repo/dist"));
        assert_eq!(config.resolver.catalog_key, "paper");
    }

    #[tokio::test]
    async fn prepare_merges_static_constants() {
        let mut docs = DocsConfig::default();
        docs.markdown
            .constants
            .insert("MC_VERSION".into(), "1.21.4".into());
        docs.markdown
            .constants
            .insert("LATEST_BESTIUM".into(), "shadowed".into());
        let resolver = ResolverOptions {
            offline: true,
            ..ResolverOptions::from(&docs.versions)
        };

        let prepared = prepare(&docs, &resolver).await.unwrap();

        assert_eq!(prepared.constants.get("MC_VERSION"), Some("1.21.4"));
        assert_eq!(prepared.constants.get("LATEST_BESTIUM"), Some(VERSION_PLACEHOLDER));
    }

    #[tokio::test]
    async fn offline_build_writes_site() {
        let out = temp_out("offline");
        let config = offline_config(out.clone());

        let result = build_site(&config, &SilentProgress).await.unwrap();

        assert_eq!(result.page_count, 4);
        assert_eq!(result.versions.latest_bestium, VERSION_PLACEHOLDER);

        let setup = read(&out.join("code/project-setup/index.html"));
        assert!(setup.contains("<title>Project setup | Bestium Docs</title>"));
        assert!(setup.contains("cz.jeme:bestium:LATEST_VERSION"));
        assert!(setup.contains(PAPER_VERSION_PLACEHOLDER));
        assert!(setup.contains("https://jd.bestium.jeme.cz/LATEST_VERSION/cz/jeme/bestium/api/Injectable.html#inject()"));
        // Not opted in, left alone.
        assert!(setup.contains("{const::LATEST_USERDEV}"));
        assert!(setup.contains("aria-current=\"page\">Project setup</a>"));

        let home = read(&out.join("index.html"));
        assert!(home.contains("<title>Bestium | Bestium Docs</title>"));
        assert_eq!(home.matches("<h1>").count(), 1);

        let versions: serde_json::Value =
            serde_json::from_str(&read(&out.join(VERSIONS_FILE))).unwrap();
        assert_eq!(versions["BESTIUM_PAPER"], PAPER_VERSION_PLACEHOLDER);

        // The default sidebar names pages the fixture site doesn't have.
        assert!(result.missing_slugs.contains(&"server/usage".to_string()));
        assert!(!result.missing_slugs.contains(&"server/installation".to_string()));

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn build_interpolates_resolved_versions() {
        let server = MockServer::start().await;
        let tags = |name: &str, sha: &str| {
            serde_json::json!([{ "name": name, "commit": { "sha": sha, "url": "u" } }]).to_string()
        };

        Mock::given(method("GET"))
            .and(path("/repos/huzvanec/Bestium/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string(tags("v2.1.0", "cafe01")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/PaperMC/paperweight/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string(tags("v1.7.7", "beef")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/huzvanec/Bestium/cafe01/gradle/libs.versions.toml"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("[versions]\npaper = \"1.21.4-R0.1-SNAPSHOT\"\n"),
            )
            .mount(&server)
            .await;

        let out = temp_out("online");
        let mut config = offline_config(out.clone());
        config.resolver.offline = false;
        config.resolver.api_base = server.uri();
        config.resolver.raw_base = server.uri();

        let result = build_site(&config, &SilentProgress).await.unwrap();
        assert_eq!(result.versions.latest_userdev, "1.7.7");

        let setup = read(&out.join("code/project-setup/index.html"));
        assert!(setup.contains("cz.jeme:bestium:2.1.0"));
        assert!(setup.contains("1.21.4-R0.1-SNAPSHOT"));
        assert!(setup.contains("https://jd.bestium.jeme.cz/2.1.0/cz/jeme/bestium/api/Injectable.html#inject()"));

        let install = read(&out.join("server/installation/index.html"));
        assert!(install.contains("Bestium 2.1.0"));

        let _ = std::fs::remove_dir_all(&out);
    }

    #[tokio::test]
    async fn empty_content_dir_is_an_error() {
        let content = temp_out("empty-content");
        std::fs::create_dir_all(&content).unwrap();

        let mut config = offline_config(temp_out("empty-out"));
        config.content_dir = content.clone();

        let err = build_site(&config, &SilentProgress).await.unwrap_err();
        assert!(err.to_string().contains("no markdown pages"));

        let _ = std::fs::remove_dir_all(&content);
    }
}
