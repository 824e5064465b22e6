//! Transport layer (Envoy ext_authz over gRPC).
//!
//! Adapts `CheckRequest` into the engine's `CheckInput` and the engine's
//! `WireVerdict` back into a `CheckResponse`.

pub mod grpc;
