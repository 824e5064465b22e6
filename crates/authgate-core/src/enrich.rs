//! Header enrichment: the ordered header set attached to the verdict.

/// How the proxy applies an injected header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Overwrite any existing header of the same name.
    Replace,
    /// Add alongside an existing header of the same name.
    Append,
}

impl HeaderAction {
    /// Value of the wire-level `append` flag.
    pub fn is_append(self) -> bool {
        matches!(self, HeaderAction::Append)
    }
}

/// One header to inject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
    pub action: HeaderAction,
}

/// Builds the final ordered header list from a policy's raw pairs.
///
/// Every entry is emitted with `HeaderAction::Replace`. A key seen twice keeps
/// its first position and takes the later value.
pub fn build_headers(pairs: &[(String, String)]) -> Vec<HeaderEntry> {
    let mut out: Vec<HeaderEntry> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match out.iter_mut().find(|e| e.key == *key) {
            Some(existing) => existing.value = value.clone(),
            None => out.push(HeaderEntry {
                key: key.clone(),
                value: value.clone(),
                action: HeaderAction::Replace,
            }),
        }
    }
    out
}
