//! Attribute-list parsing
//!
//! `KEY=value,KEY="quoted, value",...`. Quoted values may contain commas.

/// Parse an attribute list into `(name, value)` pairs in document order
///
/// Quotes around values are removed. Fragments without `=` are skipped.
pub(crate) fn parse(input: &str) -> Vec<(&str, &str)> {
    regex!(r#"([a-zA-Z0-9_-]+)\s*=\s*("[^"]*"|[^",]*)"#)
        .captures_iter(input)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str().trim();
            Some((name, unquote(value)))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
