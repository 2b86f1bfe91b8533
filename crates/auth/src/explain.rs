//! Decision explanations (audit trail / debugging).
//!
//! Answers "why is the delete button hidden for this user?" with the same
//! policy the evaluator applies.

use serde::Serialize;

use taskdeck_core::UserId;

use crate::evaluator::allowed_for;
use crate::identity::Identity;
use crate::matrix;
use crate::permissions::{Action, ActionSet, PermissionCheck, Resource};
use crate::roles::Role;

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionExplanation {
    /// The question that was asked.
    pub check: PermissionCheck,

    /// Whether the permission holds.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Who was evaluated; `None` when signed out.
    pub principal: Option<PrincipalState>,

    /// If denied, what was missing.
    pub denial_reason: Option<DenialReason>,
}

/// State of the identity the decision was made for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalState {
    pub user_id: UserId,
    /// Role value as received from the identity service, if any.
    pub claimed_role: Option<String>,
    pub resolved_role: Role,
    pub role_source: RoleSource,
    pub allowed_actions: ActionSet,
}

/// How the resolved role was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    /// The claimed role is one of the known roles.
    Claimed,
    /// The claim was missing or unrecognized; the default role applies.
    Defaulted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingAction,
}

pub(crate) fn explain_decision(
    identity: Option<&Identity>,
    resource: Resource,
    action: Action,
) -> DecisionExplanation {
    let check = PermissionCheck::new(resource, action);

    let Some(identity) = identity else {
        return DecisionExplanation {
            check,
            granted: false,
            reason: format!("No user is signed in; '{}' is denied", check),
            principal: None,
            denial_reason: Some(DenialReason {
                kind: DenialKind::Unauthenticated,
                message: "Unauthenticated sessions are denied every permission".to_string(),
                suggestions: vec!["Sign in to continue".to_string()],
            }),
        };
    };

    let claim = identity.role_claim();
    let resolved_role = identity.resolved_role();
    let allowed_actions = allowed_for(Some(identity), resource);
    let granted = allowed_actions.contains(action);

    let principal = PrincipalState {
        user_id: identity.id().clone(),
        claimed_role: claim.raw().map(str::to_string),
        resolved_role,
        role_source: if claim.is_recognized() {
            RoleSource::Claimed
        } else {
            RoleSource::Defaulted
        },
        allowed_actions,
    };

    let role_note = match principal.role_source {
        RoleSource::Claimed => format!("role {}", resolved_role),
        RoleSource::Defaulted => format!(
            "role {} (defaulted from {})",
            resolved_role,
            claim.raw().unwrap_or("a missing role claim")
        ),
    };

    if granted {
        return DecisionExplanation {
            check,
            granted,
            reason: format!("{} grants '{}'", role_note, check),
            principal: Some(principal),
            denial_reason: None,
        };
    }

    let granting: Vec<&str> = matrix::roles_granting(resource, action)
        .into_iter()
        .map(|r| r.as_str())
        .collect();
    let mut suggestions = Vec::new();
    if granting.is_empty() {
        suggestions.push(format!("No role grants '{}'", check));
    } else {
        suggestions.push(format!("Roles granting '{}': {}", check, granting.join(", ")));
    }

    DecisionExplanation {
        check,
        granted,
        reason: format!(
            "{} does not grant '{}'. Allowed on {}: {}",
            role_note, check, resource, allowed_actions
        ),
        principal: Some(principal),
        denial_reason: Some(DenialReason {
            kind: DenialKind::MissingAction,
            message: format!("Missing required permission: '{}'", check),
            suggestions,
        }),
    }
}
