//! Immutable user/account snapshot consulted by the plan lookup policy.
//!
//! Built once at startup and shared behind `Arc`; nothing exposes a mutable
//! handle after construction.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Entitlement level an account holds for a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanTier {
    /// `NONE`: the account has no access to the service.
    None,
    Basic,
    Plus,
    /// Any other tier name, kept verbatim.
    Custom(String),
}

impl PlanTier {
    pub fn as_str(&self) -> &str {
        match self {
            PlanTier::None => "NONE",
            PlanTier::Basic => "BASIC",
            PlanTier::Plus => "PLUS",
            PlanTier::Custom(s) => s,
        }
    }

    /// Only the exact `NONE` sentinel revokes access.
    pub fn grants_access(&self) -> bool {
        !matches!(self, PlanTier::None)
    }
}

impl From<String> for PlanTier {
    fn from(s: String) -> Self {
        match s.as_str() {
            "NONE" => PlanTier::None,
            "BASIC" => PlanTier::Basic,
            "PLUS" => PlanTier::Plus,
            _ => PlanTier::Custom(s),
        }
    }
}

impl From<&str> for PlanTier {
    fn from(s: &str) -> Self {
        PlanTier::from(s.to_string())
    }
}

impl From<PlanTier> for String {
    fn from(p: PlanTier) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username -> account id, account id -> (service -> plan).
#[derive(Debug, Clone, Default)]
pub struct Registry {
    users: HashMap<String, u64>,
    accounts: HashMap<u64, HashMap<String, PlanTier>>,
}

impl Registry {
    pub fn new(
        users: HashMap<String, u64>,
        accounts: HashMap<u64, HashMap<String, PlanTier>>,
    ) -> Self {
        Self { users, accounts }
    }

    /// Case-sensitive username lookup.
    pub fn account_of(&self, user: &str) -> Option<u64> {
        self.users.get(user).copied()
    }

    pub fn plan_of(&self, account_id: u64, service: &str) -> Option<&PlanTier> {
        self.accounts.get(&account_id)?.get(service)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Users whose account id has no plan table.
    pub fn dangling_users(&self) -> impl Iterator<Item = (&str, u64)> {
        self.users
            .iter()
            .filter(|(_, id)| !self.accounts.contains_key(id))
            .map(|(u, id)| (u.as_str(), *id))
    }

    /// Registry used by the sample deployment.
    pub fn demo() -> Self {
        let users = [
            ("Scott", 1),
            ("Yuval", 1),
            ("Jonathan", 2),
            ("Yuliia", 2),
            ("Bill", 3),
        ]
        .into_iter()
        .map(|(u, id)| (u.to_string(), id))
        .collect();

        let plans = |s1: &str, s2: &str| -> HashMap<String, PlanTier> {
            HashMap::from([
                ("service1".to_string(), PlanTier::from(s1)),
                ("service2".to_string(), PlanTier::from(s2)),
            ])
        };
        let accounts = HashMap::from([
            (1, plans("BASIC", "NONE")),
            (2, plans("PLUS", "BASIC")),
            (3, plans("NONE", "PLUS")),
        ]);

        Self::new(users, accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_tier_parses_sentinels_case_sensitively() {
        assert_eq!(PlanTier::from("NONE"), PlanTier::None);
        assert_eq!(PlanTier::from("none"), PlanTier::Custom("none".into()));
        assert!(PlanTier::from("none").grants_access());
        assert!(!PlanTier::None.grants_access());
    }

    #[test]
    fn demo_lookups() {
        let r = Registry::demo();
        assert_eq!(r.account_of("Scott"), Some(1));
        assert_eq!(r.account_of("scott"), None);
        assert_eq!(r.plan_of(2, "service1"), Some(&PlanTier::Plus));
        assert_eq!(r.plan_of(3, "service9"), None);
        assert_eq!(r.plan_of(42, "service1"), None);
        assert_eq!(r.dangling_users().count(), 0);
    }
}
