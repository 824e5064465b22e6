//! Shared error type across authgate crates.

use thiserror::Error;

/// Caller-facing denial codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyCode {
    /// Required identity header absent.
    MissingIdentity,
    /// Identity not present in the user registry (deny mode only).
    UnknownIdentity,
    /// Service not present in the account's plan table (deny mode only).
    UnknownService,
    /// Request did not carry the facts the policy needs.
    BadRequest,
    /// Not allowed by policy.
    Denied,
    /// Internal server error.
    Internal,
}

impl DenyCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            DenyCode::MissingIdentity => "MISSING_IDENTITY",
            DenyCode::UnknownIdentity => "UNKNOWN_IDENTITY",
            DenyCode::UnknownService => "UNKNOWN_SERVICE",
            DenyCode::BadRequest => "BAD_REQUEST",
            DenyCode::Denied => "DENIED",
            DenyCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status carried in the denied response.
    pub fn http_status(self) -> u16 {
        match self {
            DenyCode::BadRequest => 400,
            DenyCode::Internal => 500,
            DenyCode::MissingIdentity
            | DenyCode::UnknownIdentity
            | DenyCode::UnknownService
            | DenyCode::Denied => 403,
        }
    }

    /// Value of the `msg` field in the JSON denial body.
    pub fn message(self) -> &'static str {
        match self {
            DenyCode::MissingIdentity => "no user specified",
            DenyCode::UnknownIdentity => "unknown user",
            DenyCode::UnknownService => "unknown service",
            DenyCode::BadRequest => "bad request",
            DenyCode::Denied => "denied",
            DenyCode::Internal => "internal error",
        }
    }

    /// JSON denial body, e.g. `{"msg":"denied"}`.
    pub fn body(self) -> String {
        serde_json::json!({ "msg": self.message() }).to_string()
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Unified error type used by the engine and the server.
#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("identity header missing")]
    MissingIdentity,
    #[error("path does not match service pattern: {path}")]
    PatternMismatch { path: String },
    #[error("unknown user: {0}")]
    UnknownIdentity(String),
    #[error("unknown service {service} for account {account}")]
    UnknownService { account: u64, service: String },
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl AuthzError {
    /// Map internal error to a stable caller-facing code.
    pub fn deny_code(&self) -> DenyCode {
        match self {
            AuthzError::MissingIdentity => DenyCode::MissingIdentity,
            AuthzError::PatternMismatch { .. } => DenyCode::BadRequest,
            AuthzError::UnknownIdentity(_) => DenyCode::UnknownIdentity,
            AuthzError::UnknownService { .. } => DenyCode::UnknownService,
            AuthzError::Config(_) | AuthzError::Internal(_) => DenyCode::Internal,
        }
    }
}
