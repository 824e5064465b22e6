//! Prefix-only allow rule with fixed enrichment values.

use std::collections::HashMap;

use super::{EchoSet, Policy};
use crate::context::RequestContext;
use crate::decision::Decision;
use crate::error::{DenyCode, Result};

/// Targets with a configured value get that value; the rest are echoed.
#[derive(Debug, Clone)]
pub struct StaticEnrichmentPolicy {
    prefix: String,
    echo: EchoSet,
    fixed: HashMap<String, String>,
}

impl StaticEnrichmentPolicy {
    pub fn new(prefix: impl Into<String>, echo: EchoSet, fixed: HashMap<String, String>) -> Self {
        Self {
            prefix: prefix.into(),
            echo,
            fixed,
        }
    }
}

impl Policy for StaticEnrichmentPolicy {
    fn name(&self) -> &'static str {
        "static_enrichment"
    }

    fn evaluate(&self, ctx: &RequestContext) -> Result<Decision> {
        let headers = self
            .echo
            .headers_with(ctx, |target| self.fixed.get(target).cloned());
        if ctx.path.starts_with(&self.prefix) {
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

    #[test]
    fn fixed_values_override_echo_and_bypass_is_ignored() {
        let fixed = HashMap::from([("x-auth-a".to_string(), "tenant-1".to_string())]);
        let policy = StaticEnrichmentPolicy::new("/api", EchoSet::standard(true), fixed);
        let p = ServicePattern::new(ServicePattern::DEFAULT).unwrap();

        let ctx = RequestContext::extract(
            CheckInput::new("/other")
                .header("x-req-a", "ignored")
                .header("x-req-b", "b")
                .header("always-approve", "true"),
            &p,
        );
        let d = policy.evaluate(&ctx).unwrap();
        assert!(!d.allowed);
        assert_eq!(d.enrichment_headers[0].1, "tenant-1");
        assert_eq!(d.enrichment_headers[1].1, "b");
        assert_eq!(d.enrichment_headers[2].1, "");
    }
}
