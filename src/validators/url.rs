//! URL template validation.

use std::collections::BTreeSet;

use crate::clients::{Constraint, ValidationError, ValidationField};
use crate::config::{is_absolute_url, split_authority};

/// A well-formed URL template and the placeholders it contains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlTemplate {
    /// The trimmed template string.
    pub template: String,
    /// Distinct placeholder names, sorted.
    pub placeholders: BTreeSet<String>,
}

impl UrlTemplate {
    /// Returns `true` if the template starts with a scheme.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        is_absolute_url(&self.template)
    }
}

/// Validates a URL template.
///
/// Placeholders are written `{name}` where `name` is an identifier. Absolute
/// templates must have an alphabetic scheme and a non-empty host.
///
/// # Errors
///
/// Returns a [`ValidationError`] on [`ValidationField::Url`] if the template
/// is empty, has unbalanced braces or malformed placeholders, or is absolute
/// with a bad scheme or missing host.
///
/// # Example
///
/// ```rust
/// use http_alchemy::validators::parse_url;
///
/// let url = parse_url(" /users/{id}/posts/{post_id} ").unwrap();
/// assert_eq!(url.template, "/users/{id}/posts/{post_id}");
/// assert!(url.placeholders.contains("post_id"));
/// ```
pub fn parse_url(template: &str) -> Result<UrlTemplate, ValidationError> {
    let template = template.trim();
    let fail = |constraint| ValidationError::new(ValidationField::Url, constraint, template);

    if template.is_empty() {
        return Err(fail(Constraint::Empty));
    }

    let mut placeholders = BTreeSet::new();
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(fail(Constraint::UnbalancedBrace));
        }
        let after = &rest[open + 1..];
        let close = after.find(['{', '}']).ok_or_else(|| fail(Constraint::UnbalancedBrace))?;
        if after[close..].starts_with('{') {
            return Err(fail(Constraint::UnbalancedBrace));
        }

        let name = &after[..close];
        if !is_identifier(name) {
            return Err(fail(Constraint::MalformedPlaceholder).with_key(name));
        }
        placeholders.insert(name.to_string());
        rest = &after[close + 1..];
    }

    if is_absolute_url(template) && split_authority(template).is_none() {
        let scheme = template.split("://").next().unwrap_or_default();
        let valid_scheme = !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic());
        return Err(fail(if valid_scheme {
            Constraint::MissingHost
        } else {
            Constraint::InvalidScheme
        }));
    }

    Ok(UrlTemplate {
        template: template.to_string(),
        placeholders,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_placeholders() {
        let url = parse_url("/orgs/{org}/repos/{repo}").unwrap();
        assert_eq!(
            url.placeholders,
            BTreeSet::from(["org".to_string(), "repo".to_string()])
        );
        assert!(!url.is_absolute());
    }

    #[test]
    fn test_repeated_placeholder_counted_once() {
        let url = parse_url("/a/{id}/b/{id}").unwrap();
        assert_eq!(url.placeholders.len(), 1);
    }

    #[test]
    fn test_accepts_absolute_url() {
        let url = parse_url("https://api.example.com:8443/v1/{id}").unwrap();
        assert!(url.is_absolute());
        assert!(url.placeholders.contains("id"));
    }

    #[test]
    fn test_absolute_url_in_query_stays_relative() {
        let url = parse_url("/redirect?next=https://other.example.com").unwrap();
        assert!(!url.is_absolute());
        assert!(url.placeholders.is_empty());
    }

    #[test]
    fn test_rejects_empty() {
        let error = parse_url("   ").unwrap_err();
        assert_eq!(error.field, ValidationField::Url);
        assert_eq!(error.constraint, Constraint::Empty);
    }

    #[test]
    fn test_rejects_unbalanced_braces() {
        for template in ["/users/{id", "/users/id}", "/users/{{id}}", "/a/{b{c}"] {
            let error = parse_url(template).unwrap_err();
            assert_eq!(error.constraint, Constraint::UnbalancedBrace, "{template}");
        }
    }

    #[test]
    fn test_rejects_malformed_placeholder() {
        let error = parse_url("/users/{user-id}").unwrap_err();
        assert_eq!(error.constraint, Constraint::MalformedPlaceholder);
        assert_eq!(error.key.as_deref(), Some("user-id"));

        let error = parse_url("/users/{}").unwrap_err();
        assert_eq!(error.constraint, Constraint::MalformedPlaceholder);

        let error = parse_url("/users/{1st}").unwrap_err();
        assert_eq!(error.constraint, Constraint::MalformedPlaceholder);
    }

    #[test]
    fn test_rejects_bad_scheme_and_host() {
        assert_eq!(
            parse_url("://example.com").unwrap_err().constraint,
            Constraint::InvalidScheme
        );
        assert_eq!(
            parse_url("h3tp://example.com").unwrap_err().constraint,
            Constraint::InvalidScheme
        );
        assert_eq!(
            parse_url("https:///users").unwrap_err().constraint,
            Constraint::MissingHost
        );
    }

    #[test]
    fn test_error_keeps_raw_value() {
        let error = parse_url("/x/{").unwrap_err();
        assert_eq!(error.value, "/x/{");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let once = parse_url("  /users/{id} ").unwrap();
        let twice = parse_url(&once.template).unwrap();
        assert_eq!(once, twice);
    }
}
