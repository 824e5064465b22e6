//! Path-prefix allow rule with an optional bypass header.

use super::{EchoSet, Policy};
use crate::context::RequestContext;
use crate::decision::Decision;
use crate::error::{DenyCode, Result};

/// Header that forces an allow when it carries exactly `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassFlag {
    pub header: String,
    pub value: String,
}

impl Default for BypassFlag {
    fn default() -> Self {
        Self {
            header: "always-approve".to_string(),
            value: "true".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathPrefixPolicy {
    prefix: String,
    bypass: Option<BypassFlag>,
    echo: EchoSet,
}

impl PathPrefixPolicy {
    pub fn new(prefix: impl Into<String>, bypass: Option<BypassFlag>, echo: EchoSet) -> Self {
        Self {
            prefix: prefix.into(),
            bypass,
            echo,
        }
    }

    fn bypassed(&self, ctx: &RequestContext) -> bool {
        self.bypass
            .as_ref()
            .is_some_and(|b| ctx.header(&b.header) == Some(b.value.as_str()))
    }
}

impl Policy for PathPrefixPolicy {
    fn name(&self) -> &'static str {
        "path_prefix"
    }

    fn evaluate(&self, ctx: &RequestContext) -> Result<Decision> {
        let headers = self.echo.headers(ctx);
        if ctx.path.starts_with(&self.prefix) || self.bypassed(ctx) {
            Ok(Decision::allow(headers))
        } else {
            Ok(Decision::deny(DenyCode::Denied, headers))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::context::{CheckInput, ServicePattern};

    fn eval(policy: &PathPrefixPolicy, input: CheckInput) -> Decision {
        let p = ServicePattern::new(ServicePattern::DEFAULT).unwrap();
        policy.evaluate(&RequestContext::extract(input, &p)).unwrap()
    }

    fn policy(bypass: Option<BypassFlag>) -> PathPrefixPolicy {
        PathPrefixPolicy::new("/api/pets", bypass, EchoSet::standard(true))
    }

    #[test]
    fn bypass_requires_exact_value() {
        let p = policy(Some(BypassFlag::default()));
        assert!(eval(&p, CheckInput::new("/other").header("always-approve", "true")).allowed);
        assert!(!eval(&p, CheckInput::new("/other").header("always-approve", "TRUE")).allowed);
        assert!(!eval(&p, CheckInput::new("/other").header("always-approve", "")).allowed);
    }

    #[test]
    fn prefix_only_ignores_bypass() {
        let p = policy(None);
        assert!(!eval(&p, CheckInput::new("/other").header("always-approve", "true")).allowed);
        assert!(eval(&p, CheckInput::new("/api/pets")).allowed);
    }

    #[test]
    fn deny_still_enriches() {
        let d = eval(&policy(None), CheckInput::new("/other").header("x-req-e", "e"));
        assert!(!d.allowed);
        assert_eq!(d.denial_body.as_deref(), Some(r#"{"msg":"denied"}"#));
        assert_eq!(d.enrichment_headers.len(), 5);
        assert_eq!(d.enrichment_headers[4], ("x-auth-e".to_string(), "e".to_string()));
    }
}
