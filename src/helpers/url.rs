//! URL building helpers.

use std::collections::BTreeMap;

use crate::config::{is_absolute_url, BaseUrl};
use crate::validators::QueryValue;

/// Joins a base URL and an endpoint template with exactly one `/` between.
///
/// Absolute endpoints (containing `://`) are returned unchanged, as is any
/// endpoint when there is no base URL.
///
/// # Example
///
/// ```rust
/// use http_alchemy::config::BaseUrl;
/// use http_alchemy::helpers::merge_base_url_and_endpoint_template;
///
/// let base = BaseUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(
///     merge_base_url_and_endpoint_template(Some(&base), "/users/{id}"),
///     "https://api.example.com/v1/users/{id}"
/// );
/// ```
#[must_use]
pub fn merge_base_url_and_endpoint_template(base: Option<&BaseUrl>, endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    match base {
        Some(base) if !is_absolute_url(endpoint) => {
            let path = endpoint.trim_start_matches('/');
            if path.is_empty() {
                base.as_ref().to_string()
            } else {
                format!("{}/{path}", base.as_ref().trim_end_matches('/'))
            }
        }
        _ => endpoint.to_string(),
    }
}

/// Substitutes path parameter values into a URL template.
///
/// Every `{key}` occurrence is replaced with the percent-encoded value.
/// Placeholders without a value are left as they are.
#[must_use]
pub fn replace_path_params(template: &str, params: &BTreeMap<String, String>) -> String {
    let mut result = template.to_string();

    for (key, value) in params {
        let placeholder = format!("{{{key}}}");
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }

    result
}

/// Encodes query parameters as a query string, without the leading `?`.
///
/// [`QueryValue::Many`] expands to one `key=value` pair per item.
#[must_use]
pub fn encode_query_string(params: &[(String, QueryValue)]) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        let key = urlencoding::encode(key);
        match value {
            QueryValue::Single(v) => pairs.push(format!("{key}={}", urlencoding::encode(v))),
            QueryValue::Many(items) => {
                pairs.extend(
                    items
                        .iter()
                        .map(|v| format!("{key}={}", urlencoding::encode(v))),
                );
            }
        }
    }
    pairs.join("&")
}

/// Appends a query string to a URL, respecting any query already present.
#[must_use]
pub fn append_query_string(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{url}&{query}")
    } else {
        format!("{url}?{query}")
    }
}
