//! The HTML shell every page body is wrapped in.

use bestium_docs_shared::SiteConfig;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Everything the shell needs for one page.
#[derive(Debug, Clone)]
pub struct PageShell<'p> {
    pub title: &'p str,
    /// Emit the title as the page heading (false when the body has one).
    pub heading: bool,
    pub description: Option<&'p str>,
    pub sidebar: Markup,
    /// Already rendered page body, inserted verbatim.
    pub body_html: &'p str,
}

/// Render a complete HTML document.
pub fn render_document(site: &SiteConfig, page: &PageShell<'_>) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page.title) " | " (site.title) }
                @if let Some(description) = page.description {
                    meta name="description" content=(description);
                }
                link rel="icon" href=(site.favicon);
            }
            body {
                header {
                    a class="site-title" href="/" { (site.title) }
                    @for social in &site.social {
                        a class="social" data-icon=(social.icon) href=(social.href) {
                            (social.label)
                        }
                    }
                }
                (page.sidebar)
                main {
                    @if page.heading {
                        h1 { (page.title) }
                    }
                    (PreEscaped(page.body_html))
                }
            }
        }
    }
    .into_string()
}
