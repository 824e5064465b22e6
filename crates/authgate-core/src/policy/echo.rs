//! Request-header echoing shared by the prefix and static policies.

use crate::context::RequestContext;

/// Ordered `target <- source` header mappings.
#[derive(Debug, Clone)]
pub struct EchoSet {
    mappings: Vec<(String, String)>,
    /// When the source header is absent: emit `""` (true) or skip the target.
    missing_as_empty: bool,
}

impl EchoSet {
    pub fn new(mappings: Vec<(String, String)>, missing_as_empty: bool) -> Self {
        Self {
            mappings,
            missing_as_empty,
        }
    }

    /// `x-auth-a <- x-req-a` through `x-auth-e <- x-req-e`.
    pub fn standard(missing_as_empty: bool) -> Self {
        let mappings = ['a', 'b', 'c', 'd', 'e']
            .iter()
            .map(|c| (format!("x-auth-{c}"), format!("x-req-{c}")))
            .collect();
        Self::new(mappings, missing_as_empty)
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.mappings.iter().map(|(t, _)| t.as_str())
    }

    /// Echoed value of `source`, applying the missing-header rule.
    pub fn resolve(&self, ctx: &RequestContext, source: &str) -> Option<String> {
        match ctx.header(source) {
            Some(v) => Some(v.to_string()),
            None if self.missing_as_empty => Some(String::new()),
            None => None,
        }
    }

    pub fn headers(&self, ctx: &RequestContext) -> Vec<(String, String)> {
        self.headers_with(ctx, |_| None)
    }

    /// Like `headers`, but `fixed(target)` supplies a value that skips echoing.
    pub fn headers_with<F>(&self, ctx: &RequestContext, fixed: F) -> Vec<(String, String)>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.mappings
            .iter()
            .filter_map(|(target, source)| {
                let value = fixed(target).or_else(|| self.resolve(ctx, source));
                value.map(|v| (target.clone(), v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CheckInput, ServicePattern};

    fn ctx(input: CheckInput) -> RequestContext {
        match ServicePattern::new(ServicePattern::DEFAULT) {
            Ok(p) => RequestContext::extract(input, &p),
            Err(e) => unreachable!("default pattern: {e}"),
        }
    }

    #[test]
    fn echoes_present_and_blanks_missing() {
        let c = ctx(CheckInput::new("/").header("x-req-a", "alpha"));
        let h = EchoSet::standard(true).headers(&c);
        assert_eq!(h.len(), 5);
        assert_eq!(h[0], ("x-auth-a".to_string(), "alpha".to_string()));
        assert_eq!(h[1], ("x-auth-b".to_string(), String::new()));
    }

    #[test]
    fn strict_mode_omits_missing() {
        let c = ctx(CheckInput::new("/").header("x-req-c", "c"));
        let h = EchoSet::standard(false).headers(&c);
        assert_eq!(h, vec![("x-auth-c".to_string(), "c".to_string())]);
    }
}
