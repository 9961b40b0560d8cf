//! Sidebar navigation rendering and validation.

use std::collections::BTreeSet;

use bestium_docs_shared::SidebarItem;
use maud::{Markup, html};

/// Site-absolute URL of a slug.
pub fn page_href(slug: &str) -> String {
    if slug.is_empty() {
        "/".to_string()
    } else {
        format!("/{slug}/")
    }
}

/// Render the sidebar as nested lists, marking `current` with `aria-current`.
///
/// Groups containing the current page are rendered open.
pub fn render_sidebar(items: &[SidebarItem], current: &str) -> Markup {
    html! {
        nav class="sidebar" aria-label="Main" {
            (sidebar_list(items, current))
        }
    }
}

fn sidebar_list(items: &[SidebarItem], current: &str) -> Markup {
    html! {
        ul {
            @for item in items {
                @match item {
                    SidebarItem::Link { label, slug } => {
                        li {
                            a href=(page_href(slug)) aria-current=[(slug == current).then_some("page")] {
                                (label)
                            }
                        }
                    }
                    SidebarItem::Group { label, items: children } => {
                        li {
                            details open[item.slugs().contains(&current)] {
                                summary { (label) }
                                (sidebar_list(children, current))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Sidebar slugs with no matching page, in sidebar order.
pub fn missing_slugs<'s>(items: &'s [SidebarItem], pages: &BTreeSet<&str>) -> Vec<&'s str> {
    items
        .iter()
        .flat_map(SidebarItem::slugs)
        .filter(|slug| !pages.contains(slug))
        .collect()
}
