//! `taskdeck-auth`: role-based access control for the TaskDeck UI.
//!
//! The crate answers one question, "may the signed-in user perform this action
//! on this kind of resource?", either once ([`PermissionEvaluator::has_permission`])
//! or continuously ([`PermissionEvaluator::has_permission_stream`]).
//!
//! The role → resource → action table is compiled in and private; every
//! question goes through the evaluator so the fail-closed policy is applied
//! uniformly:
//!
//! - no identity: every decision is `false`
//! - identity with a recognized role: the role's row of the table
//! - identity with any other role value: the `User` row
//!
//! Nothing in this crate returns an error from a decision.

mod matrix;

pub mod evaluator;
pub mod explain;
pub mod identity;
pub mod permissions;
pub mod roles;
pub mod session;

pub use evaluator::{PermissionEvaluator, PermissionStream};
pub use explain::{DecisionExplanation, DenialKind, DenialReason, PrincipalState, RoleSource};
pub use identity::{AuthResponse, CurrentUser, Identity};
pub use permissions::{Action, ActionSet, PermissionCheck, Resource};
pub use roles::{Role, RoleClaim};
pub use session::{IdentitySignal, SessionError, SessionStore};
