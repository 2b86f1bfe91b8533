//! Identity boundary: wire payloads from the identity service and the typed
//! [`Identity`] the evaluator works with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use taskdeck_core::{DomainResult, UserId};

use crate::roles::{Role, RoleClaim};

/// Signed-in user as the identity service returns it.
///
/// `role` is untyped: the service has been seen to send strings
/// outside the known role set, `null`, or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Response of the login/register endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<CurrentUser>,
}

/// An authenticated user, with the role claim already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: UserId,
    email: String,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    role: RoleClaim,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>, role: impl Into<RoleClaim>) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            role: role.into(),
        }
    }

    pub fn with_name(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Convert a wire payload. Fails only on a blank id; the role field can
    /// never make this fail.
    pub fn from_current_user(user: &CurrentUser) -> DomainResult<Self> {
        Ok(Self {
            id: user.id.parse()?,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            role: RoleClaim::from_json(user.role.as_ref()),
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    /// "First Last", or the email when no name is known.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    pub fn role_claim(&self) -> &RoleClaim {
        &self.role
    }

    /// Role used for authorization decisions.
    pub fn resolved_role(&self) -> Role {
        self.role.resolve()
    }
}
