use std::collections::HashMap;
use std::net::SocketAddr;

use serde::Deserialize;

use authgate_core::error::{AuthzError, Result};
use authgate_core::policy::EchoSet;
use authgate_core::{PlanTier, ServicePattern};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthgateConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default = "default_path_pattern")]
    pub path_pattern: String,

    pub policy: PolicyConfig,
}

impl AuthgateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AuthzError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        ServicePattern::new(&self.path_pattern)?;
        self.policy.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// gRPC ext_authz listener.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Ops HTTP listener (`/healthz`, `/readyz`, `/metrics`); disabled when absent.
    #[serde(default)]
    pub admin_listen: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            admin_listen: None,
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        self.admin_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_addr("server.listen", &self.listen)
    }

    pub fn admin_addr(&self) -> Result<Option<SocketAddr>> {
        self.admin_listen
            .as_deref()
            .map(|a| parse_addr("server.admin_listen", a))
            .transpose()
    }
}

fn parse_addr(field: &str, s: &str) -> Result<SocketAddr> {
    s.parse()
        .map_err(|_| AuthzError::Config(format!("{field} must be a valid socket address: {s}")))
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_path_pattern() -> String {
    ServicePattern::DEFAULT.into()
}

/// Active policy variant, selected by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    PlanLookup(PlanLookupConfig),
    PathPrefix(PathPrefixConfig),
    StaticEnrichment(StaticEnrichmentConfig),
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            PolicyConfig::PlanLookup(c) => c.validate(),
            PolicyConfig::PathPrefix(c) => validate_prefix("policy.prefix", &c.prefix),
            PolicyConfig::StaticEnrichment(c) => c.validate(),
        }
    }
}

fn validate_prefix(field: &str, prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(AuthzError::Config(format!("{field} must not be empty")));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanLookupConfig {
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    #[serde(default)]
    pub unknown_user: UnknownUserConfig,

    #[serde(default)]
    pub unknown_service: UnknownServiceConfig,

    /// Plan for services the account has no entry for when
    /// `unknown_service.mode` is `default_plan`. Empty string allows.
    #[serde(default = "default_plan")]
    pub default_plan: PlanTier,

    pub users: HashMap<String, u64>,

    #[serde(default)]
    pub accounts: HashMap<u64, HashMap<String, PlanTier>>,
}

impl PlanLookupConfig {
    pub fn validate(&self) -> Result<()> {
        if self.identity_header.is_empty() {
            return Err(AuthzError::Config(
                "policy.identity_header must not be empty".into(),
            ));
        }
        if self.users.is_empty() {
            return Err(AuthzError::Config("policy.users must not be empty".into()));
        }
        Ok(())
    }
}

fn default_identity_header() -> String {
    "user".into()
}
fn default_plan() -> PlanTier {
    PlanTier::Custom(String::new())
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UnknownUserConfig {
    DefaultAccount {
        #[serde(default)]
        account_id: u64,
    },
    Deny,
}

impl Default for UnknownUserConfig {
    fn default() -> Self {
        UnknownUserConfig::DefaultAccount { account_id: 0 }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UnknownServiceConfig {
    #[default]
    DefaultPlan,
    Deny,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathPrefixConfig {
    pub prefix: String,

    /// `null` disables the bypass check (prefix-only deployments).
    #[serde(default = "default_bypass")]
    pub bypass_header: Option<BypassConfig>,

    #[serde(default = "default_true")]
    pub missing_as_empty: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BypassConfig {
    pub header: String,
    #[serde(default = "default_bypass_value")]
    pub value: String,
}

fn default_bypass() -> Option<BypassConfig> {
    Some(BypassConfig {
        header: "always-approve".into(),
        value: default_bypass_value(),
    })
}
fn default_bypass_value() -> String {
    "true".into()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticEnrichmentConfig {
    pub prefix: String,

    /// Fixed values keyed by enrichment header (`x-auth-a`..`x-auth-e`).
    #[serde(default)]
    pub values: HashMap<String, String>,

    #[serde(default = "default_true")]
    pub missing_as_empty: bool,
}

impl StaticEnrichmentConfig {
    pub fn validate(&self) -> Result<()> {
        validate_prefix("policy.prefix", &self.prefix)?;
        let echo = EchoSet::standard(self.missing_as_empty);
        let targets: Vec<&str> = echo.targets().collect();
        for key in self.values.keys() {
            if !targets.contains(&key.as_str()) {
                return Err(AuthzError::Config(format!(
                    "policy.values has unknown header {key} (expected one of {})",
                    targets.join(", ")
                )));
            }
        }
        Ok(())
    }
}
