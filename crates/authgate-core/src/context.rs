//! Per-call request context: raw facts plus the service name pulled from the path.
//!
//! The extractor never panics on unexpected traffic. A path that does not
//! match the service pattern leaves `extracted_service` empty, and
//! `RequestContext::service` surfaces that as `PatternMismatch` so each
//! policy decides what absence means.

use regex::Regex;

use crate::error::{AuthzError, Result};

/// Raw facts handed to the engine by the transport.
#[derive(Debug, Clone, Default)]
pub struct CheckInput {
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// Opaque description of the caller (e.g. peer address), logged only.
    pub source: Option<String>,
}

impl CheckInput {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// Ordered, case-sensitive header map. Re-inserting a key replaces the value
/// in place (last value wins, first position kept).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Exact-key lookup; `None` means the header was not sent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut h = Headers::new();
        for (k, v) in iter {
            h.insert(k, v);
        }
        h
    }
}

/// Compiled path pattern with exactly one capture group.
#[derive(Debug, Clone)]
pub struct ServicePattern {
    re: Regex,
}

impl ServicePattern {
    pub const DEFAULT: &'static str = "/service/(.*)";

    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| AuthzError::Config(format!("invalid path_pattern {pattern:?}: {e}")))?;
        // captures_len counts the implicit whole-match group.
        if re.captures_len() != 2 {
            return Err(AuthzError::Config(format!(
                "path_pattern {pattern:?} must contain exactly one capture group"
            )));
        }
        Ok(Self { re })
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }

    /// Unanchored search; returns the captured segment.
    pub fn capture<'p>(&self, path: &'p str) -> Result<&'p str> {
        self.re
            .captures(path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| AuthzError::PatternMismatch {
                path: path.to_string(),
            })
    }
}

/// Path without its query string or fragment.
pub fn strip_query(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(i) => &path[..i],
        None => path,
    }
}

/// Typed view of one inbound check. Owned by a single call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request path with query and fragment removed.
    pub path: String,
    pub headers: Headers,
    pub extracted_service: Option<String>,
    pub source: Option<String>,
}

impl RequestContext {
    pub fn extract(input: CheckInput, pattern: &ServicePattern) -> Self {
        let path = strip_query(&input.path).to_string();
        let extracted_service = pattern.capture(&path).ok().map(str::to_string);
        Self {
            headers: input.headers.into_iter().collect(),
            extracted_service,
            path,
            source: input.source,
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// The service segment, or `PatternMismatch` when the path did not match.
    pub fn service(&self) -> Result<&str> {
        self.extracted_service
            .as_deref()
            .ok_or_else(|| AuthzError::PatternMismatch {
                path: self.path.clone(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn default_pattern() -> ServicePattern {
        ServicePattern::new(ServicePattern::DEFAULT).unwrap()
    }

    #[test]
    fn headers_last_value_wins_in_first_position() {
        let h: Headers = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(h.get("a"), Some("3"));
        assert_eq!(h.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(h.get("A"), None);
    }

    #[test]
    fn pattern_must_have_one_group() {
        assert!(ServicePattern::new("/service/.*").is_err());
        assert!(ServicePattern::new("/(a)/(b)").is_err());
        assert!(ServicePattern::new("/service/(").is_err());
        assert!(ServicePattern::new("/svc/([^/]+)").is_ok());
    }

    #[test]
    fn extract_service_segment() {
        let p = default_pattern();
        let ctx = RequestContext::extract(CheckInput::new("/service/service1"), &p);
        assert_eq!(ctx.service().ok(), Some("service1"));

        // unanchored search
        let ctx = RequestContext::extract(CheckInput::new("/v1/service/x/y"), &p);
        assert_eq!(ctx.service().ok(), Some("x/y"));
    }

    #[test]
    fn query_and_fragment_are_not_part_of_the_path() {
        let p = default_pattern();
        let ctx = RequestContext::extract(CheckInput::new("/service/service1?x=1#top"), &p);
        assert_eq!(ctx.path, "/service/service1");
        assert_eq!(ctx.service().ok(), Some("service1"));

        let ctx = RequestContext::extract(CheckInput::new("/other#/service/x"), &p);
        assert!(ctx.extracted_service.is_none());
        assert_eq!(strip_query("/a"), "/a");
    }

    #[test]
    fn mismatch_is_typed_error() {
        let ctx = RequestContext::extract(CheckInput::new("/other"), &default_pattern());
        assert!(ctx.extracted_service.is_none());
        assert!(matches!(ctx.service(), Err(AuthzError::PatternMismatch { .. })));
    }
}
