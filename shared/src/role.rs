//! Role derivation.
//!
//! The API never sends a single authoritative role; it is inferred from the
//! profile flags. This is the only place that inference happens.

use crate::UserProfile;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const ROLE_NAME_ADMIN: &str = "admin";
const ROLE_NAMES_TECHNICIAN: [&str; 2] = ["tecnico", "technician"];

/// Named role entry as the API lists them (`roles: [{ "name": "..." }]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub name: String,
}

impl RoleEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Which views a user may reach.
///
/// The wire names match what the registration endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    #[serde(rename = "cliente")]
    Client,
    #[serde(rename = "tecnico")]
    Technician,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::Client => "cliente",
            Role::Technician => "tecnico",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Technician => "Technician",
            Role::Admin => "Administrator",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn has_role(roles: &[RoleEntry], names: &[&str]) -> bool {
    roles
        .iter()
        .any(|r| names.iter().any(|n| r.name.eq_ignore_ascii_case(n)))
}

pub(crate) fn role_from_flags(is_admin: bool, roles: &[RoleEntry], technician_profile: bool) -> Role {
    if is_admin || has_role(roles, &[ROLE_NAME_ADMIN]) {
        Role::Admin
    } else if technician_profile || has_role(roles, &ROLE_NAMES_TECHNICIAN) {
        Role::Technician
    } else {
        Role::Client
    }
}

/// Total mapping from profile flags to a [`Role`].
///
/// Admin wins over technician, technician wins over client:
/// - `is_admin` or a role named `admin` gives [`Role::Admin`]
/// - a technician profile or a role named `tecnico`/`technician` gives [`Role::Technician`]
/// - anything else is [`Role::Client`]
pub fn derive_role(profile: &UserProfile) -> Role {
    role_from_flags(
        profile.is_admin,
        &profile.roles,
        profile.technician.is_some(),
    )
}
