//! authgate core: the external authorization decision engine.
//!
//! This crate turns the raw facts of one proxied HTTP request (path + headers)
//! into an allow/deny verdict with enrichment headers. It carries no transport
//! or runtime dependencies; the gRPC surface lives in `authgate-server`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Unexpected traffic (missing headers, unmatched paths) surfaces as
//! `AuthzError` and is resolved into an explicit denial, never a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod context;
pub mod decision;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod policy;
pub mod registry;
pub mod verdict;

pub use context::{CheckInput, Headers, RequestContext, ServicePattern};
pub use decision::Decision;
pub use engine::AuthzEngine;
pub use error::{AuthzError, DenyCode, Result};
pub use policy::Policy;
pub use registry::{PlanTier, Registry};
pub use verdict::{respond, VerdictStatus, WireVerdict};
