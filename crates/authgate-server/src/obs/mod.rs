//! Lightweight in-process metrics.
//!
//! Decision counters and check latency are stored as atomics and rendered in
//! the Prometheus text format by the `/metrics` handler.

pub mod metrics;
