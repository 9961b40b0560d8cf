//! Markdown-to-HTML rendering with the docs rewriting passes.
//!
//! Pages are parsed into an owned [`Node`] tree, run through a [`Pipeline`]
//! of [`Transform`] passes, and rendered back to HTML:
//! - [`ReplaceConstants`] interpolates resolved versions into opted-in code blocks
//! - [`JavadocLinks`] turns `jd::` links into javadoc URLs

mod constants;
mod frontmatter;
mod javadoc;
pub mod tree;

use pulldown_cmark::{HeadingLevel, Tag};
use tracing::{debug, instrument};

use bestium_docs_shared::{Constants, MarkdownConfig};

pub use constants::{ReplaceConstants, substitute};
pub use frontmatter::{FrontMatter, split as split_front_matter};
pub use javadoc::{JavadocLinks, javadoc_url, rewrite_url};
pub use tree::{LiteralKind, Node, NodeKind, parse};

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// A single in-place rewrite of a document tree.
pub trait Transform: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite the tree in place.
    fn transform(&self, tree: &mut Node<'_>);
}

/// Ordered list of transforms applied to every page.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform; transforms run in insertion order.
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// The standard docs pipeline: constants first, then javadoc links.
    pub fn from_config(config: &MarkdownConfig, constants: Constants, javadoc_root: &str) -> Self {
        let mut pipeline = Self::new().with(
            ReplaceConstants::new(constants)
                .with_marker(config.replace_marker.clone())
                .with_text(config.replace_in_text),
        );
        if config.javadoc_links {
            pipeline = pipeline.with(JavadocLinks::new(javadoc_root));
        }
        pipeline
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn run(&self, tree: &mut Node<'_>) {
        for transform in &self.transforms {
            transform.transform(tree);
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("transforms", &self.names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// A rendered page body.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Front matter title, else the first H1.
    pub title: Option<String>,
    /// Whether the title came from a heading already in the body.
    pub title_in_body: bool,
    /// Front matter description.
    pub description: Option<String>,
    /// HTML of the page body.
    pub html: String,
}

/// Render a Markdown source file (front matter included) through `pipeline`.
#[instrument(skip_all, fields(len = source.len()))]
pub fn render_page(source: &str, pipeline: &Pipeline) -> RenderedPage {
    let (front_matter, body) = split_front_matter(source);

    let mut tree = parse(body);
    pipeline.run(&mut tree);

    let declared = front_matter.title().map(str::to_string);
    let title_in_body = declared.is_none();
    let title = declared.or_else(|| first_h1(&tree));

    let html = render_html(&tree);
    debug!(html_len = html.len(), title = ?title, "page rendered");

    RenderedPage {
        title_in_body: title_in_body && title.is_some(),
        title,
        description: front_matter.description().map(str::to_string),
        html,
    }
}

/// Render a tree to HTML.
pub fn render_html(tree: &Node<'_>) -> String {
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, tree.to_events().into_iter());
    html
}

/// Text of the first level-one heading.
fn first_h1(tree: &Node<'_>) -> Option<String> {
    let mut title = None;
    tree.visit(&mut |node| {
        if title.is_some() {
            return;
        }
        if let NodeKind::Container(Tag::Heading {
            level: HeadingLevel::H1,
            ..
        }) = &node.kind
        {
            let text = node.text_content().trim().to_string();
            if !text.is_empty() {
                title = Some(text);
            }
        }
    });
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        let constants: Constants = [
            ("LATEST_BESTIUM", "2.1.0"),
            ("LATEST_JAVADOC", "https://jd.bestium.jeme.cz/2.1.0"),
        ]
        .into_iter()
        .collect();
        Pipeline::from_config(
            &MarkdownConfig::default(),
            constants,
            "https://jd.bestium.jeme.cz/2.1.0",
        )
    }

    #[test]
    fn default_pipeline_order() {
        assert_eq!(pipeline().names(), vec!["replace-constants", "javadoc-links"]);
    }

    #[test]
    fn javadoc_links_can_be_disabled() {
        let config = MarkdownConfig {
            javadoc_links: false,
            ..MarkdownConfig::default()
        };
        let pipeline = Pipeline::from_config(&config, Constants::default(), "x");
        assert_eq!(pipeline.names(), vec!["replace-constants"]);

        let page = render_page("[A](jd::a.B)\n", &pipeline);
        assert!(page.html.contains("href=\"jd::a.B\""));
    }

    #[test]
    fn renders_page_with_both_passes() {
        let source = "---\ntitle: Project setup\n---\n\
Add Bestium {const::LATEST_BESTIUM}, see [Bestium](jd::cz.jeme.bestium.Bestium#getInjector()).\n\n\
```kotlin replace\ncompileOnly(\"cz.jeme:bestium:{const::LATEST_BESTIUM}\")\n```\n\n\
```kotlin\n// {const::LATEST_BESTIUM}\n```\n";

        let page = render_page(source, &pipeline());

        assert_eq!(page.title.as_deref(), Some("Project setup"));
        assert!(!page.title_in_body);
        assert!(page.html.contains("Add Bestium 2.1.0"));
        assert!(page.html.contains(
            "href=\"https://jd.bestium.jeme.cz/2.1.0/cz/jeme/bestium/Bestium.html#getInjector()\""
        ));
        assert!(page.html.contains("cz.jeme:bestium:2.1.0"));
        assert!(page.html.contains("// {const::LATEST_BESTIUM}"));
        assert!(page.html.contains("class=\"language-kotlin\""));
    }

    #[test]
    fn title_falls_back_to_first_h1() {
        let page = render_page("Intro\n\n## Not this\n\n# Usage *guide*\n", &pipeline());
        assert_eq!(page.title.as_deref(), Some("Usage guide"));
        assert!(page.title_in_body);
    }

    #[test]
    fn no_title() {
        let page = render_page("just text\n", &pipeline());
        assert_eq!(page.title, None);
        assert_eq!(page.html, "<p>just text</p>\n");
    }
}
