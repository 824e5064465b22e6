//! Decision responder: maps a `Decision` onto the ext_authz verdict shape.

use crate::decision::Decision;
use crate::enrich::{build_headers, HeaderEntry};

/// Coarse result code, separate from the HTTP status of a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStatus {
    Ok,
    PermissionDenied,
}

pub const DEFAULT_DENY_STATUS: u16 = 403;
pub const DEFAULT_DENY_BODY: &str = "{}";

/// Transport-agnostic response for one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireVerdict {
    Ok {
        headers: Vec<HeaderEntry>,
    },
    Denied {
        http_status: u16,
        headers: Vec<HeaderEntry>,
        body: String,
    },
}

impl WireVerdict {
    pub fn status(&self) -> VerdictStatus {
        match self {
            WireVerdict::Ok { .. } => VerdictStatus::Ok,
            WireVerdict::Denied { .. } => VerdictStatus::PermissionDenied,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, WireVerdict::Ok { .. })
    }

    pub fn headers(&self) -> &[HeaderEntry] {
        match self {
            WireVerdict::Ok { headers } | WireVerdict::Denied { headers, .. } => headers,
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|h| h.key == key)
            .map(|h| h.value.as_str())
    }
}

/// Pure and total: every decision maps to exactly one verdict.
pub fn respond(decision: Decision) -> WireVerdict {
    let headers = build_headers(&decision.enrichment_headers);
    if decision.allowed {
        return WireVerdict::Ok { headers };
    }
    WireVerdict::Denied {
        http_status: decision.denial_status.unwrap_or(DEFAULT_DENY_STATUS),
        headers,
        body: decision
            .denial_body
            .unwrap_or_else(|| DEFAULT_DENY_BODY.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DenyCode;

    #[test]
    fn denial_defaults_fill_in() {
        let d = Decision {
            allowed: false,
            enrichment_headers: vec![("x-a".into(), "1".into())],
            denial_body: None,
            denial_status: None,
            deny_code: None,
        };
        let v = respond(d);
        assert_eq!(v.status(), VerdictStatus::PermissionDenied);
        match v {
            WireVerdict::Denied { http_status, body, headers } => {
                assert_eq!(http_status, 403);
                assert_eq!(body, "{}");
                assert_eq!(headers.len(), 1);
            }
            WireVerdict::Ok { .. } => unreachable!("denied decision produced ok verdict"),
        }
    }

    #[test]
    fn allow_carries_only_headers() {
        let v = respond(Decision::allow(vec![("x-plan".into(), "BASIC".into())]));
        assert!(v.is_allowed());
        assert_eq!(v.header("x-plan"), Some("BASIC"));
    }

    #[test]
    fn bad_request_status_passes_through() {
        let v = respond(Decision::deny(DenyCode::BadRequest, Vec::new()));
        assert!(matches!(v, WireVerdict::Denied { http_status: 400, .. }));
    }
}
