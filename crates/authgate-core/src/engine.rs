//! Extractor -> policy -> enrichment -> responder pipeline.
//!
//! `AuthzEngine` is built once at startup and shared across calls. It holds no
//! mutable state, so concurrent checks need no locking.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::context::{CheckInput, RequestContext, ServicePattern};
use crate::decision::Decision;
use crate::policy::Policy;
use crate::verdict::{respond, WireVerdict};

#[derive(Debug, Clone)]
pub struct AuthzEngine {
    pattern: ServicePattern,
    policy: Arc<dyn Policy>,
}

impl AuthzEngine {
    pub fn new(pattern: ServicePattern, policy: Arc<dyn Policy>) -> Self {
        Self { pattern, policy }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn pattern(&self) -> &ServicePattern {
        &self.pattern
    }

    pub fn context(&self, input: CheckInput) -> RequestContext {
        RequestContext::extract(input, &self.pattern)
    }

    /// Evaluate one context; evaluation errors become explicit denials.
    pub fn decide(&self, ctx: &RequestContext) -> Decision {
        match self.policy.evaluate(ctx) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    policy = self.policy.name(),
                    path = %ctx.path,
                    source = ctx.source.as_deref().unwrap_or("-"),
                    error = %e,
                    code = e.deny_code().as_str(),
                    "check denied on error"
                );
                Decision::from_error(&e)
            }
        }
    }

    /// Extract and decide, logging the outcome.
    pub fn evaluate(&self, input: CheckInput) -> Decision {
        let started = Instant::now();
        let ctx = self.context(input);
        let decision = self.decide(&ctx);
        debug!(
            policy = self.policy.name(),
            path = %ctx.path,
            service = ctx.extracted_service.as_deref().unwrap_or("-"),
            allowed = decision.allowed,
            outcome = decision.outcome(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "authorization decision"
        );
        decision
    }

    /// Full pipeline for one inbound check.
    pub fn check(&self, input: CheckInput) -> WireVerdict {
        respond(self.evaluate(input))
    }
}
