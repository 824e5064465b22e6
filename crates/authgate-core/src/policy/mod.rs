//! Policy layer: one `Policy` implementation is chosen at startup and
//! evaluated for every check.
//!
//! Policies return `Result<Decision>`; the engine turns any `AuthzError`
//! into an explicit denial so nothing escapes to the transport.

pub mod echo;
pub mod path_prefix;
pub mod plan_lookup;
pub mod static_enrichment;

use std::fmt;

use crate::context::RequestContext;
use crate::decision::Decision;
use crate::error::Result;

pub use echo::EchoSet;
pub use path_prefix::{BypassFlag, PathPrefixPolicy};
pub use plan_lookup::{PlanLookupPolicy, UnknownService, UnknownUser};
pub use static_enrichment::StaticEnrichmentPolicy;

/// Decision capability shared by all policy variants.
///
/// Implementations must be free of interior mutability: evaluating the same
/// context twice yields the same decision.
pub trait Policy: Send + Sync + fmt::Debug {
    /// Stable name used in logs and metric labels.
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &RequestContext) -> Result<Decision>;
}
