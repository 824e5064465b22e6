//! Engine builders shared by the integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;

use authgate_core::policy::{BypassFlag, EchoSet, PathPrefixPolicy, PlanLookupPolicy};
use authgate_core::{AuthzEngine, Registry, ServicePattern};

pub fn pattern() -> ServicePattern {
    ServicePattern::new(ServicePattern::DEFAULT).unwrap()
}

pub fn plan_engine() -> AuthzEngine {
    let policy = PlanLookupPolicy::new(Arc::new(Registry::demo()));
    AuthzEngine::new(pattern(), Arc::new(policy))
}

pub fn prefix_engine(bypass: bool) -> AuthzEngine {
    let bypass = bypass.then(BypassFlag::default);
    let policy = PathPrefixPolicy::new("/api/pets", bypass, EchoSet::standard(true));
    AuthzEngine::new(pattern(), Arc::new(policy))
}
