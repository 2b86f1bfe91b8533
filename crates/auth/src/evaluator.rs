//! Authorization decisions over the current identity.
//!
//! - No IO
//! - No panics
//! - No errors: every query yields a `bool` or an [`ActionSet`]

use std::time::Duration;

use taskdeck_events::{Signal, Subscription};

use crate::explain::{DecisionExplanation, explain_decision};
use crate::identity::Identity;
use crate::matrix;
use crate::permissions::{Action, ActionSet, PermissionCheck, Resource};
use crate::roles::Role;

/// Actions the identity may perform on `resource`.
///
/// Absent identity short-circuits to the empty set without consulting the
/// table. A present identity always resolves to some role (see
/// [`crate::RoleClaim::resolve`]).
pub(crate) fn allowed_for(identity: Option<&Identity>, resource: Resource) -> ActionSet {
    match identity {
        None => ActionSet::empty(),
        Some(identity) => matrix::actions_for(identity.resolved_role(), resource),
    }
}

pub(crate) fn decide(identity: Option<&Identity>, resource: Resource, action: Action) -> bool {
    allowed_for(identity, resource).contains(action)
}

/// Evaluates permissions for whoever the identity signal currently holds.
///
/// The evaluator stores no decisions: each query reads the signal's current
/// value, so results can never go stale across sign-in/sign-out.
///
/// ```ignore
/// let session = SessionStore::new();
/// let evaluator = PermissionEvaluator::new(session.signal());
///
/// if evaluator.has_permission(Resource::Task, Action::Delete) {
///     // show the delete button
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PermissionEvaluator<S> {
    identity: S,
}

impl<S> PermissionEvaluator<S>
where
    S: Signal<Option<Identity>>,
{
    pub fn new(identity: S) -> Self {
        Self { identity }
    }

    /// Point-in-time decision for the current identity.
    pub fn has_permission(&self, resource: Resource, action: Action) -> bool {
        decide(self.identity.get().as_ref(), resource, action)
    }

    /// Live decision: the current value first, then one value per identity
    /// change, until the stream is dropped.
    pub fn has_permission_stream(&self, resource: Resource, action: Action) -> PermissionStream {
        PermissionStream {
            resource,
            action,
            subscription: self.identity.subscribe(),
        }
    }

    /// True iff the current identity may do anything at all with `resource`.
    pub fn can_access_resource(&self, resource: Resource) -> bool {
        !self.allowed_actions(resource).is_empty()
    }

    pub fn allowed_actions(&self, resource: Resource) -> ActionSet {
        allowed_for(self.identity.get().as_ref(), resource)
    }

    /// Resolved role of the current identity; `None` when signed out.
    ///
    /// For display (role badges). Authorization goes through the other
    /// queries.
    pub fn current_role(&self) -> Option<Role> {
        self.identity.get().map(|identity| identity.resolved_role())
    }

    pub fn check(&self, check: PermissionCheck) -> bool {
        self.has_permission(check.resource, check.action)
    }

    /// All checks hold for one identity snapshot.
    ///
    /// Signed out is always `false`, even for an empty list.
    pub fn has_all(&self, checks: &[PermissionCheck]) -> bool {
        let identity = self.identity.get();
        identity.is_some()
            && checks
                .iter()
                .all(|c| decide(identity.as_ref(), c.resource, c.action))
    }

    /// At least one check holds for one identity snapshot.
    pub fn has_any(&self, checks: &[PermissionCheck]) -> bool {
        let identity = self.identity.get();
        checks
            .iter()
            .any(|c| decide(identity.as_ref(), c.resource, c.action))
    }

    /// Like [`Self::has_permission`] for callers holding untyped names.
    /// Unrecognized names are denied.
    pub fn has_permission_named(&self, resource: &str, action: &str) -> bool {
        match PermissionCheck::parse(resource, action) {
            Ok(check) => self.check(check),
            Err(err) => {
                tracing::debug!(
                    resource,
                    action,
                    error = %err,
                    "permission query with unknown name denied"
                );
                false
            }
        }
    }

    /// Like [`Self::allowed_actions`] for an untyped resource name.
    /// An unrecognized resource has no permissions.
    pub fn allowed_actions_named(&self, resource: &str) -> ActionSet {
        match resource.parse::<Resource>() {
            Ok(resource) => self.allowed_actions(resource),
            Err(err) => {
                tracing::debug!(resource, error = %err, "unknown resource has no permissions");
                ActionSet::empty()
            }
        }
    }

    /// Why [`Self::has_permission`] answers the way it does right now.
    pub fn explain(&self, resource: Resource, action: Action) -> DecisionExplanation {
        explain_decision(self.identity.get().as_ref(), resource, action)
    }
}

/// Continuously updated decision for one (resource, action) pair.
///
/// Values are produced by the identity signal; this type maps each identity
/// snapshot to a decision as it is read. Dropping the stream (or calling
/// [`PermissionStream::dispose`]) detaches it from the signal immediately.
#[derive(Debug)]
pub struct PermissionStream {
    resource: Resource,
    action: Action,
    subscription: Subscription<Option<Identity>>,
}

impl PermissionStream {
    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn action(&self) -> Action {
        self.action
    }

    fn decide(&self, identity: Option<Identity>) -> bool {
        decide(identity.as_ref(), self.resource, self.action)
    }

    /// Next pending decision, without blocking.
    pub fn next_decision(&self) -> Option<bool> {
        self.subscription
            .try_recv()
            .ok()
            .map(|identity| self.decide(identity))
    }

    /// Every pending decision, oldest first.
    pub fn drain(&self) -> Vec<bool> {
        self.subscription
            .drain()
            .into_iter()
            .map(|identity| self.decide(identity))
            .collect()
    }

    /// Block until the next decision. `None` once the signal is gone.
    pub fn recv(&self) -> Option<bool> {
        self.subscription.recv().ok().map(|identity| self.decide(identity))
    }

    /// Block for up to `timeout`. `None` on timeout or once the signal is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<bool> {
        self.subscription
            .recv_timeout(timeout)
            .ok()
            .map(|identity| self.decide(identity))
    }

    pub fn dispose(self) {}
}
