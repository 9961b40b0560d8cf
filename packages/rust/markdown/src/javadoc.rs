//! `jd::` link rewriting.
//!
//! `[Bestium](jd::cz.jeme.bestium.Bestium#getInjector())` points at the
//! javadoc page of a class, member, or package. The first dotted segment
//! whose first character is unchanged by uppercasing (so uppercase letters,
//! digits and `_`) starts the class name; everything before it is the
//! package. Empty segments are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::Transform;
use crate::tree::{Node, NodeKind};

static JD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^jd::(\S+)$").expect("valid regex"));

/// Javadoc URL for a `jd::` target (the part after the scheme).
pub fn javadoc_url(root: &str, target: &str) -> String {
    let root = root.trim_end_matches('/');
    let mut halves = target.split('#');
    let class_path = halves.next().unwrap_or_default();
    let member = halves.next().filter(|m| !m.is_empty());

    let parts: Vec<&str> = class_path.split('.').filter(|p| !p.is_empty()).collect();
    let class_start = parts.iter().position(|part| is_class_segment(part));

    let Some(class_start) = class_start else {
        if parts.is_empty() {
            return format!("{root}/package-summary.html");
        }
        return format!("{root}/{}/package-summary.html", parts.join("/"));
    };

    let package = parts[..class_start].join("/");
    let class_name = parts[class_start..].join(".");
    let anchor = member.map(|m| format!("#{m}")).unwrap_or_default();

    if package.is_empty() {
        format!("{root}/{class_name}.html{anchor}")
    } else {
        format!("{root}/{package}/{class_name}.html{anchor}")
    }
}

/// Rewrite `url` if it uses the `jd::` scheme.
pub fn rewrite_url(root: &str, url: &str) -> Option<String> {
    JD_RE
        .captures(url)
        .map(|caps| javadoc_url(root, &caps[1]))
}

/// A segment starts a class name when uppercasing leaves its first character
/// unchanged. Callers drop empty segments first.
fn is_class_segment(part: &str) -> bool {
    part.chars()
        .next()
        .is_some_and(|c| c.to_uppercase().eq(std::iter::once(c)))
}

/// Rewrites `jd::` links against a javadoc root.
#[derive(Debug, Clone)]
pub struct JavadocLinks {
    root: String,
}

impl JavadocLinks {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl Transform for JavadocLinks {
    fn name(&self) -> &'static str {
        "javadoc-links"
    }

    fn transform(&self, tree: &mut Node<'_>) {
        tree.visit_mut(&mut |node| {
            if let NodeKind::Link { url, .. } = &mut node.kind {
                if let Some(rewritten) = rewrite_url(&self.root, url) {
                    tracing::trace!(from = %url, to = %rewritten, "rewrote javadoc link");
                    *url = rewritten;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse;

    const ROOT: &str = "https://jd.bestium.jeme.cz/2.1.0";

    fn link_urls(tree: &Node<'_>) -> Vec<String> {
        let mut urls = Vec::new();
        tree.visit(&mut |n| {
            if let NodeKind::Link { url, .. } = &n.kind {
                urls.push(url.clone());
            }
        });
        urls
    }

    #[test]
    fn class_with_member() {
        let url = rewrite_url(ROOT, "jd::com.example.Foo#bar").unwrap();
        assert_eq!(url, "https://jd.bestium.jeme.cz/2.1.0/com/example/Foo.html#bar");
        assert!(url.ends_with("com/example/Foo.html#bar"));
    }

    #[test]
    fn package_only() {
        let url = rewrite_url(ROOT, "jd::com.example").unwrap();
        assert!(url.ends_with("com/example/package-summary.html"));
    }

    #[test]
    fn package_ignores_member() {
        let url = rewrite_url(ROOT, "jd::com.example#ignored").unwrap();
        assert_eq!(url, format!("{ROOT}/com/example/package-summary.html"));
    }

    #[test]
    fn nested_class_keeps_dots() {
        let url = rewrite_url(ROOT, "jd::cz.jeme.bestium.api.Injectable.Builder#build()").unwrap();
        assert_eq!(
            url,
            format!("{ROOT}/cz/jeme/bestium/api/Injectable.Builder.html#build()")
        );
    }

    #[test]
    fn empty_member_adds_no_anchor() {
        let url = rewrite_url(ROOT, "jd::com.example.Foo#").unwrap();
        assert_eq!(url, format!("{ROOT}/com/example/Foo.html"));
    }

    #[test]
    fn class_without_package() {
        let url = rewrite_url(ROOT, "jd::Foo").unwrap();
        assert_eq!(url, format!("{ROOT}/Foo.html"));
    }

    #[test]
    fn trailing_slash_on_root() {
        let url = rewrite_url("https://jd.example.com/1.0/", "jd::a.B").unwrap();
        assert_eq!(url, "https://jd.example.com/1.0/a/B.html");
    }

    #[test]
    fn digits_and_underscores_count_as_class_start() {
        assert!(is_class_segment("Foo"));
        assert!(is_class_segment("_internal"));
        assert!(is_class_segment("1x"));
        assert!(!is_class_segment("foo"));
        assert!(!is_class_segment("émile"));
        assert!(!is_class_segment(""));
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert_eq!(
            rewrite_url(ROOT, "jd::com.example.").unwrap(),
            format!("{ROOT}/com/example/package-summary.html")
        );
        assert_eq!(rewrite_url(ROOT, "jd::a..B").unwrap(), format!("{ROOT}/a/B.html"));
        assert_eq!(
            rewrite_url(ROOT, "jd::.#x").unwrap(),
            format!("{ROOT}/package-summary.html")
        );
    }

    #[test]
    fn non_jd_urls_are_not_rewritten() {
        assert_eq!(rewrite_url(ROOT, "https://example.com/jd::x"), None);
        assert_eq!(rewrite_url(ROOT, "jd::"), None);
        assert_eq!(rewrite_url(ROOT, "jd::a b"), None);
        assert_eq!(rewrite_url(ROOT, "../usage"), None);
    }

    #[test]
    fn transform_rewrites_only_jd_links() {
        let mut tree = parse(
            "See [Bestium](jd::cz.jeme.bestium.Bestium), [home](https://example.com) and [pkg](jd::cz.jeme.bestium).\n",
        );
        JavadocLinks::new(ROOT).transform(&mut tree);
        assert_eq!(
            link_urls(&tree),
            vec![
                format!("{ROOT}/cz/jeme/bestium/Bestium.html"),
                "https://example.com".to_string(),
                format!("{ROOT}/cz/jeme/bestium/package-summary.html"),
            ]
        );
    }
}
