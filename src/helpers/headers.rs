//! Header merging.

use std::collections::HashMap;

/// Merges request headers over default headers.
///
/// Keys are compared case-insensitively and request headers win on
/// collision, keeping the request's spelling of the name. When a body
/// `content_type` is given and neither side sets `Content-Type`, it is added.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn merge_headers_with_defaults(
    defaults: &HashMap<String, String>,
    headers: &HashMap<String, String>,
    content_type: Option<&str>,
) -> HashMap<String, String> {
    let mut merged: HashMap<String, String> = defaults
        .iter()
        .filter(|(name, _)| !headers.keys().any(|k| k.eq_ignore_ascii_case(name)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    for (name, value) in headers {
        merged.insert(name.clone(), value.clone());
    }

    if let Some(content_type) = content_type {
        if !merged.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
            merged.insert("Content-Type".to_string(), content_type.to_string());
        }
    }

    merged
}
