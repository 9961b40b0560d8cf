//! Gradle version catalog (`libs.versions.toml`) lookup.
//!
//! The catalog is not parsed as TOML: only the first `key = "value"` line
//! for the requested key matters, wherever it sits in the file.

use regex::Regex;

/// Return the quoted value of the first `key = "..."` line in `catalog`.
pub fn extract_catalog_version(catalog: &str, key: &str) -> Option<String> {
    let pattern = format!(r#"(?m)^\s*{}\s*=\s*"([^"]+)""#, regex::escape(key));
    let re = Regex::new(&pattern).ok()?;

    re.captures(catalog).map(|c| c[1].to_string())
}
