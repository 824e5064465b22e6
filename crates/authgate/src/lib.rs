//! Top-level facade crate for authgate.
//!
//! Re-exports the decision engine and the ext_authz server library so users can depend on a single crate.

pub mod core {
    pub use authgate_core::*;
}

pub mod server {
    pub use authgate_server::*;
}
