//! Front matter splitting.
//!
//! Pages may start with a `---` delimited block of `key: value` lines.
//! Only flat string values are read; nested YAML is ignored.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // The closing fence must sit on its own line.
    Regex::new(r"\A---[ \t]*\r?\n(?:((?s:.*?))\r?\n)?---[ \t]*(?:\r?\n|\z)")
        .expect("valid regex")
});

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][\w-]*):[ \t]*(.*?)[ \t]*$").expect("valid regex")
});

/// Parsed front matter fields, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: Vec<(String, String)>,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").filter(|t| !t.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description").filter(|d| !d.is_empty())
    }
}

/// Split `source` into front matter and the Markdown body.
pub fn split(source: &str) -> (FrontMatter, &str) {
    let Some(caps) = BLOCK_RE.captures(source) else {
        return (FrontMatter::default(), source);
    };

    let block = caps.get(1).map_or("", |m| m.as_str());
    let body_start = caps.get(0).map_or(0, |m| m.end());

    let fields = block
        .lines()
        .filter_map(|line| FIELD_RE.captures(line))
        .map(|c| (c[1].to_string(), unquote(&c[2])))
        .collect();

    (FrontMatter { fields }, &source[body_start..])
}

/// Strip one level of matching quotes, undoing `\"` and `\\` escapes.
fn unquote(value: &str) -> String {
    let quoted = |q: char| value.len() >= 2 && value.starts_with(q) && value.ends_with(q);

    if quoted('"') {
        value[1..value.len() - 1]
            .replace("\\\"", "\"")
            .replace("\\\\", "\\")
    } else if quoted('\'') {
        value[1..value.len() - 1].replace("''", "'")
    } else {
        value.to_string()
    }
}
