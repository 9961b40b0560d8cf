//! `{const::NAME}` / `%{NAME}%` substitution.

use std::borrow::Cow;
use std::sync::LazyLock;

use bestium_docs_shared::Constants;
use regex::{Captures, Regex};

use crate::Transform;
use crate::tree::{Node, NodeKind};

/// Matches either token syntax; the name lands in group 1 or 2.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{const::([^\s}]+)\}|%\{([^\s}]+)\}%").expect("valid regex")
});

/// Replace every token in `text`. Unknown names collapse to the bare name.
pub fn substitute<'t>(text: &'t str, constants: &Constants) -> Cow<'t, str> {
    TOKEN_RE.replace_all(text, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        constants.get(name).unwrap_or(name).to_string()
    })
}

/// Substitutes constants in opted-in code blocks and, optionally, in prose.
#[derive(Debug, Clone)]
pub struct ReplaceConstants {
    constants: Constants,
    marker: String,
    include_text: bool,
}

impl ReplaceConstants {
    pub fn new(constants: Constants) -> Self {
        Self {
            constants,
            marker: "replace".into(),
            include_text: true,
        }
    }

    /// Meta word that opts a code block in.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Whether text, inline code and raw HTML are substituted too.
    pub fn with_text(mut self, include_text: bool) -> Self {
        self.include_text = include_text;
        self
    }

    fn opted_in(&self, meta: Option<&str>) -> bool {
        meta.is_some_and(|m| m.contains(self.marker.as_str()))
    }

    fn replace(&self, value: &mut String) {
        if TOKEN_RE.is_match(value) {
            *value = substitute(value, &self.constants).into_owned();
        }
    }
}

impl Transform for ReplaceConstants {
    fn name(&self) -> &'static str {
        "replace-constants"
    }

    fn transform(&self, tree: &mut Node<'_>) {
        tree.visit_mut(&mut |node| match &mut node.kind {
            NodeKind::Code { meta, value, .. } => {
                if self.opted_in(meta.as_deref()) {
                    self.replace(value);
                }
            }
            NodeKind::Literal { value, .. } if self.include_text => self.replace(value),
            _ => {}
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse;

    fn constants() -> Constants {
        [
            ("LATEST_BESTIUM", "2.1.0"),
            ("BESTIUM_PAPER", "1.21.4-R0.1-SNAPSHOT"),
        ]
        .into_iter()
        .collect()
    }

    fn code_values(tree: &Node<'_>) -> Vec<String> {
        let mut values = Vec::new();
        tree.visit(&mut |n| {
            if let NodeKind::Code { value, .. } = &n.kind {
                values.push(value.clone());
            }
        });
        values
    }

    #[test]
    fn substitutes_both_token_syntaxes() {
        let out = substitute("a {const::LATEST_BESTIUM} b %{BESTIUM_PAPER}% c", &constants());
        assert_eq!(out, "a 2.1.0 b 1.21.4-R0.1-SNAPSHOT c");
    }

    #[test]
    fn unknown_name_becomes_bare_name() {
        let out = substitute("v{const::NOPE} %{ALSO_NOPE}%", &constants());
        assert_eq!(out, "vNOPE ALSO_NOPE");
        // Running again is a no-op.
        assert_eq!(substitute(&out, &constants()), out);
    }

    #[test]
    fn adjacent_tokens_are_separate() {
        let out = substitute("{const::LATEST_BESTIUM}{const::BESTIUM_PAPER}", &constants());
        assert_eq!(out, "2.1.01.21.4-R0.1-SNAPSHOT");
    }

    #[test]
    fn malformed_tokens_are_untouched() {
        let text = "{const::} {const::A B} %{X} {const:X}";
        assert!(matches!(substitute(text, &constants()), Cow::Borrowed(_)));
    }

    #[test]
    fn opted_in_code_block_is_substituted() {
        let mut tree = parse(
            "```kotlin replace\nimplementation(\"cz.jeme:bestium:{const::LATEST_BESTIUM}\")\n```\n",
        );
        ReplaceConstants::new(constants()).transform(&mut tree);
        assert_eq!(
            code_values(&tree),
            vec!["implementation(\"cz.jeme:bestium:2.1.0\")\n"]
        );
    }

    #[test]
    fn code_block_without_marker_is_untouched() {
        let md = "```kotlin\nval v = \"{const::LATEST_BESTIUM}\"\n```\n\n    %{BESTIUM_PAPER}%\n";
        let mut tree = parse(md);
        let before = tree.clone();
        ReplaceConstants::new(constants()).transform(&mut tree);
        assert_eq!(tree, before);
    }

    #[test]
    fn custom_marker() {
        let mut tree = parse("```toml interpolate\nv = \"{const::LATEST_BESTIUM}\"\n```\n");
        ReplaceConstants::new(constants())
            .with_marker("interpolate")
            .transform(&mut tree);
        assert_eq!(code_values(&tree), vec!["v = \"2.1.0\"\n"]);
    }

    #[test]
    fn prose_and_inline_code_follow_text_flag() {
        let md = "Bestium {const::LATEST_BESTIUM} needs `paper %{BESTIUM_PAPER}%`.\n";

        let mut tree = parse(md);
        ReplaceConstants::new(constants()).transform(&mut tree);
        assert_eq!(
            tree.text_content(),
            "Bestium 2.1.0 needs paper 1.21.4-R0.1-SNAPSHOT."
        );

        let mut tree = parse(md);
        ReplaceConstants::new(constants())
            .with_text(false)
            .transform(&mut tree);
        assert_eq!(
            tree.text_content(),
            "Bestium {const::LATEST_BESTIUM} needs paper %{BESTIUM_PAPER}%."
        );
    }
}
