//! Session script steps (one JSON object per line).

use serde::Deserialize;

use taskdeck_auth::{Action, AuthResponse, CurrentUser, Resource};

/// One scripted event.
///
/// ```text
/// {"op":"login","response":{"success":true,"data":{...}}}
/// {"op":"refresh","user":{...}}
/// {"op":"logout"}
/// {"op":"check","resource":"task","action":"delete"}
/// {"op":"explain","resource":"task","action":"delete"}
/// {"op":"show"}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Feed a login/register response to the session.
    Login { response: AuthResponse },
    /// Replace the signed-in identity (token refresh).
    Refresh { user: CurrentUser },
    Logout,
    /// Ask for a decision by name; unknown names are denied.
    Check { resource: String, action: String },
    /// Print the decision explanation as JSON.
    Explain { resource: Resource, action: Action },
    /// Print the whole shell.
    Show,
}
