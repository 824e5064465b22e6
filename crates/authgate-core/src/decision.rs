//! Policy outcome handed from the engine to the responder.

use crate::error::{AuthzError, DenyCode};

/// Result of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Raw `(key, value)` pairs, attached on both allow and deny.
    pub enrichment_headers: Vec<(String, String)>,
    pub denial_body: Option<String>,
    pub denial_status: Option<u16>,
    /// Why the request was denied; `None` when allowed.
    pub deny_code: Option<DenyCode>,
}

impl Decision {
    pub fn allow(enrichment_headers: Vec<(String, String)>) -> Self {
        Self {
            allowed: true,
            enrichment_headers,
            denial_body: None,
            denial_status: None,
            deny_code: None,
        }
    }

    /// Denial with the status and JSON body `code` maps to.
    pub fn deny(code: DenyCode, enrichment_headers: Vec<(String, String)>) -> Self {
        Self {
            allowed: false,
            enrichment_headers,
            denial_body: Some(code.body()),
            denial_status: Some(code.http_status()),
            deny_code: Some(code),
        }
    }

    /// Turn an evaluation failure into an explicit denial with no enrichment.
    pub fn from_error(err: &AuthzError) -> Self {
        Self::deny(err.deny_code(), Vec::new())
    }

    /// Label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self.deny_code {
            None => "allow",
            Some(code) => code.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_identity_denial() {
        let d = Decision::from_error(&AuthzError::MissingIdentity);
        assert!(!d.allowed);
        assert_eq!(d.denial_status, Some(403));
        assert_eq!(d.denial_body.as_deref(), Some(r#"{"msg":"no user specified"}"#));
        assert!(d.enrichment_headers.is_empty());
        assert_eq!(d.outcome(), "MISSING_IDENTITY");
    }

    #[test]
    fn allow_has_no_denial_fields() {
        let d = Decision::allow(vec![("x-a".into(), "1".into())]);
        assert!(d.allowed);
        assert!(d.denial_body.is_none() && d.denial_status.is_none());
        assert_eq!(d.outcome(), "allow");
    }
}
