//! Shared application state for the authgate server.
//!
//! Holds the compiled decision engine and metrics. Built once at startup from
//! a validated config; every field is read-only afterwards except the
//! draining flag.

use std::sync::Arc;
use std::time::Instant;

use authgate_core::error::Result;
use authgate_core::{respond, AuthzEngine, CheckInput, WireVerdict};

use crate::config::{self, AuthgateConfig};
use crate::obs::metrics::AuthzMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<AuthzMetrics>,
}

struct AppStateInner {
    engine: AuthzEngine,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle config errors without panicking.
    pub fn new(cfg: &AuthgateConfig) -> Result<Self> {
        let engine = config::build_engine(cfg)?;
        tracing::info!(
            policy = engine.policy_name(),
            path_pattern = engine.pattern().as_str(),
            "decision engine ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { engine }),
            metrics: Arc::new(AuthzMetrics::default()),
        })
    }

    pub fn engine(&self) -> &AuthzEngine {
        &self.inner.engine
    }

    pub fn metrics(&self) -> Arc<AuthzMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Run one check and record its outcome and latency.
    pub fn check(&self, input: CheckInput) -> WireVerdict {
        let started = Instant::now();
        let engine = self.engine();
        let decision = engine.evaluate(input);

        let policy = engine.policy_name();
        self.metrics
            .checks
            .inc(&[("policy", policy), ("outcome", decision.outcome())]);
        self.metrics
            .check_duration
            .observe(&[("policy", policy)], started.elapsed());

        respond(decision)
    }
}
