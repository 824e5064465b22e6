//! Config loader (strict parsing) and compilation into the decision engine.

pub mod schema;

use std::fs;
use std::sync::Arc;

use authgate_core::error::{AuthzError, Result};
use authgate_core::policy::{
    BypassFlag, EchoSet, PathPrefixPolicy, PlanLookupPolicy, Policy, StaticEnrichmentPolicy,
    UnknownService, UnknownUser,
};
use authgate_core::{AuthzEngine, Registry, ServicePattern};

pub use schema::{
    AuthgateConfig, PathPrefixConfig, PlanLookupConfig, PolicyConfig, ServerSection,
    StaticEnrichmentConfig, UnknownServiceConfig, UnknownUserConfig,
};

pub fn load_from_file(path: &str) -> Result<AuthgateConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AuthzError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AuthgateConfig> {
    let cfg: AuthgateConfig = serde_yaml::from_str(s)
        .map_err(|e| AuthzError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Compile a validated config into the immutable engine snapshot.
pub fn build_engine(cfg: &AuthgateConfig) -> Result<AuthzEngine> {
    let pattern = ServicePattern::new(&cfg.path_pattern)?;
    let policy: Arc<dyn Policy> = match &cfg.policy {
        PolicyConfig::PlanLookup(c) => Arc::new(build_plan_lookup(c)),
        PolicyConfig::PathPrefix(c) => {
            let bypass = c.bypass_header.as_ref().map(|b| BypassFlag {
                header: b.header.clone(),
                value: b.value.clone(),
            });
            Arc::new(PathPrefixPolicy::new(
                c.prefix.clone(),
                bypass,
                EchoSet::standard(c.missing_as_empty),
            ))
        }
        PolicyConfig::StaticEnrichment(c) => Arc::new(StaticEnrichmentPolicy::new(
            c.prefix.clone(),
            EchoSet::standard(c.missing_as_empty),
            c.values.clone(),
        )),
    };
    Ok(AuthzEngine::new(pattern, policy))
}

fn build_plan_lookup(c: &PlanLookupConfig) -> PlanLookupPolicy {
    let registry = Registry::new(c.users.clone(), c.accounts.clone());
    for (user, account_id) in registry.dangling_users() {
        tracing::warn!(user, account_id, "user refers to an account with no plans");
    }

    let unknown_user = match c.unknown_user {
        UnknownUserConfig::DefaultAccount { account_id } => UnknownUser::DefaultAccount(account_id),
        UnknownUserConfig::Deny => UnknownUser::Deny,
    };
    let unknown_service = match c.unknown_service {
        UnknownServiceConfig::DefaultPlan => UnknownService::DefaultPlan(c.default_plan.clone()),
        UnknownServiceConfig::Deny => UnknownService::Deny,
    };

    tracing::info!(
        users = registry.user_count(),
        accounts = registry.account_count(),
        "plan registry loaded"
    );

    PlanLookupPolicy::new(Arc::new(registry))
        .with_identity_header(c.identity_header.clone())
        .with_unknown_user(unknown_user)
        .with_unknown_service(unknown_service)
}
