use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use taskdeck_core::DomainError;

/// Privilege tier of a signed-in user.
///
/// Exactly one role is active per identity; there is no role composition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    User,
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::User, Role::Guest];

    /// Role used for identities whose role claim is missing or unrecognized.
    pub const DEFAULT: Role = Role::User;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::User => "User",
            Role::Guest => "Guest",
        }
    }

    /// Short human-readable summary (role badges, audit output).
    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Full administrator: manages users, teams and settings",
            Role::Manager => "Runs projects and tasks; read access to people and settings",
            Role::User => "Works on tasks; read access elsewhere",
            Role::Guest => "Read-only visitor",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the role name.
impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{}'", s)))
    }
}

/// A role as claimed by the identity service, normalized at the boundary.
///
/// The identity service does not type its role field. This is the only place
/// that looks at the raw value; everything downstream works with
/// [`RoleClaim::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleClaim {
    Recognized(Role),
    /// Present but not one of the known role names (e.g. `"SuperAdmin"`).
    Unrecognized(String),
    /// Absent, `null` or empty.
    Missing,
}

impl RoleClaim {
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            return RoleClaim::Missing;
        }
        match raw.parse::<Role>() {
            Ok(role) => RoleClaim::Recognized(role),
            Err(_) => RoleClaim::Unrecognized(raw.to_string()),
        }
    }

    /// Normalize a JSON role field of any shape.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => RoleClaim::Missing,
            Some(Value::String(s)) => RoleClaim::from_raw(s),
            Some(other) => RoleClaim::Unrecognized(other.to_string()),
        }
    }

    /// Role used for authorization: the claimed role if recognized, else
    /// [`Role::DEFAULT`]. Never escalates.
    pub fn resolve(&self) -> Role {
        match self {
            RoleClaim::Recognized(role) => *role,
            RoleClaim::Unrecognized(_) | RoleClaim::Missing => Role::DEFAULT,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, RoleClaim::Recognized(_))
    }

    /// The claim as it was received, if any.
    pub fn raw(&self) -> Option<&str> {
        match self {
            RoleClaim::Recognized(role) => Some(role.as_str()),
            RoleClaim::Unrecognized(raw) => Some(raw),
            RoleClaim::Missing => None,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(role: Role) -> Self {
        RoleClaim::Recognized(role)
    }
}
