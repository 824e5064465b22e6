//! Identity -> account -> plan lookup.

use std::sync::Arc;

use tracing::debug;

use super::Policy;
use crate::context::RequestContext;
use crate::decision::Decision;
use crate::error::{AuthzError, DenyCode, Result};
use crate::registry::{PlanTier, Registry};

pub const HEADER_ACCOUNT_ID: &str = "x-account-id";
pub const HEADER_PLAN: &str = "x-plan";
pub const HEADER_SERVICE: &str = "x-service";

/// What to do when the identity header names a user the registry lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownUser {
    /// Continue as this account id (`0` is the unassigned sentinel).
    DefaultAccount(u64),
    /// Deny with `UnknownIdentity`.
    Deny,
}

impl Default for UnknownUser {
    fn default() -> Self {
        UnknownUser::DefaultAccount(0)
    }
}

/// What to do when the account has no plan entry for the requested service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnknownService {
    /// Continue with this plan (empty custom tier by default, which allows).
    DefaultPlan(PlanTier),
    /// Deny with `UnknownService`.
    Deny,
}

impl Default for UnknownService {
    fn default() -> Self {
        UnknownService::DefaultPlan(PlanTier::Custom(String::new()))
    }
}

#[derive(Debug, Clone)]
pub struct PlanLookupPolicy {
    registry: Arc<Registry>,
    identity_header: String,
    unknown_user: UnknownUser,
    unknown_service: UnknownService,
}

impl PlanLookupPolicy {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            identity_header: "user".to_string(),
            unknown_user: UnknownUser::default(),
            unknown_service: UnknownService::default(),
        }
    }

    pub fn with_identity_header(mut self, header: impl Into<String>) -> Self {
        self.identity_header = header.into();
        self
    }

    pub fn with_unknown_user(mut self, mode: UnknownUser) -> Self {
        self.unknown_user = mode;
        self
    }

    pub fn with_unknown_service(mut self, mode: UnknownService) -> Self {
        self.unknown_service = mode;
        self
    }

    fn resolve_account(&self, user: &str) -> Result<u64> {
        match (self.registry.account_of(user), self.unknown_user) {
            (Some(id), _) => Ok(id),
            (None, UnknownUser::DefaultAccount(id)) => {
                debug!(user, account_id = id, "unknown user, using default account");
                Ok(id)
            }
            (None, UnknownUser::Deny) => Err(AuthzError::UnknownIdentity(user.to_string())),
        }
    }

    fn resolve_plan(&self, account_id: u64, service: &str) -> Result<&PlanTier> {
        match (self.registry.plan_of(account_id, service), &self.unknown_service) {
            (Some(plan), _) => Ok(plan),
            (None, UnknownService::DefaultPlan(plan)) => Ok(plan),
            (None, UnknownService::Deny) => Err(AuthzError::UnknownService {
                account: account_id,
                service: service.to_string(),
            }),
        }
    }
}

impl Policy for PlanLookupPolicy {
    fn name(&self) -> &'static str {
        "plan_lookup"
    }

    fn evaluate(&self, ctx: &RequestContext) -> Result<Decision> {
        let user = ctx
            .header(&self.identity_header)
            .ok_or(AuthzError::MissingIdentity)?;
        let account_id = self.resolve_account(user)?;
        let service = ctx.service()?;

        let plan = self.resolve_plan(account_id, service)?;

        let headers = vec![
            (HEADER_ACCOUNT_ID.to_string(), account_id.to_string()),
            (HEADER_PLAN.to_string(), plan.to_string()),
            (HEADER_SERVICE.to_string(), service.to_string()),
        ];

        if plan.grants_access() {
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

    fn eval(policy: &PlanLookupPolicy, input: CheckInput) -> Result<Decision> {
        let p = ServicePattern::new(ServicePattern::DEFAULT).unwrap();
        policy.evaluate(&RequestContext::extract(input, &p))
    }

    fn demo() -> PlanLookupPolicy {
        PlanLookupPolicy::new(Arc::new(Registry::demo()))
    }

    #[test]
    fn missing_user_is_typed_error() {
        let err = eval(&demo(), CheckInput::new("/service/service1")).unwrap_err();
        assert!(matches!(err, AuthzError::MissingIdentity));
    }

    #[test]
    fn unknown_user_defaults_to_account_zero() {
        let d = eval(&demo(), CheckInput::new("/service/service1").header("user", "Mallory")).unwrap();
        assert!(d.allowed);
        assert_eq!(d.enrichment_headers[0].1, "0");
        assert_eq!(d.enrichment_headers[1].1, "");
    }

    #[test]
    fn unknown_user_deny_mode() {
        let p = demo().with_unknown_user(UnknownUser::Deny);
        let err = eval(&p, CheckInput::new("/service/service1").header("user", "Mallory")).unwrap_err();
        assert!(matches!(err, AuthzError::UnknownIdentity(u) if u == "Mallory"));
    }

    #[test]
    fn default_plan_none_fails_closed() {
        let p = demo().with_unknown_service(UnknownService::DefaultPlan(PlanTier::None));
        let d = eval(&p, CheckInput::new("/service/service9").header("user", "Scott")).unwrap();
        assert!(!d.allowed);
        assert_eq!(d.enrichment_headers[1].1, "NONE");
    }

    #[test]
    fn unknown_service_deny_mode() {
        let p = demo().with_unknown_service(UnknownService::Deny);
        let err = eval(&p, CheckInput::new("/service/service9").header("user", "Scott")).unwrap_err();
        assert!(matches!(
            &err,
            AuthzError::UnknownService { account: 1, service } if service == "service9"
        ));
        assert_eq!(err.deny_code(), DenyCode::UnknownService);

        // known services are unaffected
        let d = eval(&p, CheckInput::new("/service/service1").header("user", "Scott")).unwrap();
        assert!(d.allowed);
    }

    #[test]
    fn pattern_mismatch_surfaces() {
        let err = eval(&demo(), CheckInput::new("/elsewhere").header("user", "Scott")).unwrap_err();
        assert_eq!(err.deny_code(), DenyCode::BadRequest);
    }

    #[test]
    fn custom_identity_header() {
        let p = demo().with_identity_header("x-user");
        let d = eval(&p, CheckInput::new("/service/service2").header("x-user", "Yuliia")).unwrap();
        assert!(d.allowed);
        assert_eq!(d.enrichment_headers[1].1, "BASIC");
    }
}
