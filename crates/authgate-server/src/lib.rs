//! authgate server library entry.
//!
//! This crate wires config loading, the shared decision engine, the Envoy
//! ext_authz gRPC transport, and the ops endpoints into a deployable service.
//! It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
