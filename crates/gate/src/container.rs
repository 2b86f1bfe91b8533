//! Two-branch gate: exactly one of an allowed and a denied fragment.

use taskdeck_auth::{Action, Identity, PermissionEvaluator, Resource};
use taskdeck_events::Signal;

use crate::state::{GateState, Render};
use crate::watch::DecisionWatch;

/// Configuration of a two-branch gate.
///
/// Without a denied fragment, a denied gate renders nothing.
#[derive(Debug, Clone)]
pub struct ProtectedActionContainer<F> {
    resource: Option<Resource>,
    action: Option<Action>,
    allowed: F,
    denied: Option<F>,
}

impl<F> ProtectedActionContainer<F> {
    pub fn new(allowed: F) -> Self {
        Self {
            resource: None,
            action: None,
            allowed,
            denied: None,
        }
    }

    pub fn for_permission(resource: Resource, action: Action, allowed: F) -> Self {
        Self::new(allowed).resource(resource).action(action)
    }

    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn denied(mut self, denied: F) -> Self {
        self.denied = Some(denied);
        self
    }

    pub fn mount<S>(self, evaluator: &PermissionEvaluator<S>) -> ProtectedActionContainerView<F>
    where
        S: Signal<Option<Identity>>,
    {
        ProtectedActionContainerView {
            watch: DecisionWatch::mount(
                "protected_action_container",
                evaluator,
                self.resource,
                self.action,
            ),
            allowed: self.allowed,
            denied: self.denied,
        }
    }
}

/// A mounted [`ProtectedActionContainer`].
#[derive(Debug)]
pub struct ProtectedActionContainerView<F> {
    watch: DecisionWatch,
    allowed: F,
    denied: Option<F>,
}

impl<F> ProtectedActionContainerView<F> {
    pub fn render(&self) -> Render<'_, F> {
        if self.watch.is_allowed() {
            return Render::Content(&self.allowed);
        }
        match &self.denied {
            Some(denied) => Render::Denied(denied),
            None => Render::Nothing,
        }
    }

    pub fn poll(&mut self) -> bool {
        self.watch.poll()
    }

    pub fn state(&self) -> GateState {
        self.watch.state()
    }

    pub fn unmount(self) {}
}
