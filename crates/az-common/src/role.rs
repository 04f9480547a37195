//! Roles and Capabilities
//!
//! Role claims come from the backend as Spring authority strings
//! (`ROLE_ADMIN`, ...). Capability flags are derived from the role set on
//! every read and are UI affordances only; the server re-enforces access.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Console role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_SECRETARY")]
    Secretary,
    #[serde(rename = "ROLE_PROFESSOR")]
    Professor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Secretary, Role::Professor];

    /// Authority string used on the wire
    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Secretary => "ROLE_SECRETARY",
            Role::Professor => "ROLE_PROFESSOR",
        }
    }

    /// Human-readable label shown next to the signed-in user
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Secretary => "Secretariat",
            Role::Professor => "Profesor",
        }
    }

    pub fn from_authority(authority: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.authority() == authority)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.authority())
    }
}

/// Ordered set of roles held by a principal
pub type RoleSet = BTreeSet<Role>;

/// Build a role set from authority strings, dropping the ones we don't know.
pub fn parse_roles<I, S>(authorities: I) -> RoleSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    authorities
        .into_iter()
        .filter_map(|a| {
            let role = Role::from_authority(a.as_ref());
            if role.is_none() {
                debug!(authority = %a.as_ref(), "Ignoring unknown role claim");
            }
            role
        })
        .collect()
}

/// True when `roles` contains at least one of `required`
pub fn has_any_role(roles: &RoleSet, required: &[Role]) -> bool {
    required.iter().any(|r| roles.contains(r))
}

/// Serde helper for `roles: [String]` fields that may carry unknown authorities
pub fn deserialize_role_set<'de, D>(deserializer: D) -> Result<RoleSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(parse_roles(raw.unwrap_or_default()))
}

/// UI capability flags derived from a role set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_create: bool,
    pub can_delete: bool,
    pub is_admin: bool,
}

impl Capabilities {
    pub fn from_roles(roles: &RoleSet) -> Self {
        let is_admin = roles.contains(&Role::Admin);
        Self {
            can_create: has_any_role(roles, &[Role::Admin, Role::Secretary]),
            can_delete: is_admin,
            is_admin,
        }
    }

    /// Capabilities of an anonymous visitor
    pub fn none() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_role_sets() -> Vec<RoleSet> {
        (0u8..8)
            .map(|mask| {
                Role::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, r)| *r)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_capabilities_for_every_role_set() {
        for roles in all_role_sets() {
            let caps = Capabilities::from_roles(&roles);
            let admin = roles.contains(&Role::Admin);
            let secretary = roles.contains(&Role::Secretary);

            assert_eq!(caps.can_delete, admin, "canDelete for {:?}", roles);
            assert_eq!(caps.can_create, admin || secretary, "canCreate for {:?}", roles);
            assert_eq!(caps.is_admin, admin, "isAdmin for {:?}", roles);
        }
    }

    #[test]
    fn test_professor_only_has_no_capabilities() {
        let roles: RoleSet = [Role::Professor].into_iter().collect();
        assert_eq!(Capabilities::from_roles(&roles), Capabilities::none());
    }

    #[test]
    fn test_parse_roles_ignores_unknown_authorities() {
        let roles = parse_roles(["ROLE_SECRETARY", "ROLE_JANITOR", "ROLE_ADMIN"]);
        assert_eq!(roles.len(), 2);
        assert!(roles.contains(&Role::Admin));
        assert!(roles.contains(&Role::Secretary));
    }

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&vec![Role::Professor, Role::Admin]).unwrap();
        assert_eq!(json, r#"["ROLE_PROFESSOR","ROLE_ADMIN"]"#);
        assert_eq!(Role::from_authority("ROLE_SECRETARY"), Some(Role::Secretary));
        assert_eq!(Role::Secretary.label(), "Secretariat");
    }
}
