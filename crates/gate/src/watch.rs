//! Subscription-and-diff helper shared by every gate shape.

use taskdeck_auth::{Action, Identity, PermissionEvaluator, PermissionStream, Resource};
use taskdeck_events::Signal;

use crate::state::{Decision, GateState};

/// Owns one gate's permission stream and its current [`GateState`].
///
/// At most one stream is held; rebinding or dropping releases the previous
/// one before anything else happens.
#[derive(Debug)]
pub(crate) struct DecisionWatch {
    gate: &'static str,
    stream: Option<PermissionStream>,
    state: GateState,
}

impl DecisionWatch {
    pub(crate) fn new(gate: &'static str) -> Self {
        Self {
            gate,
            stream: None,
            state: GateState::Uninitialized,
        }
    }

    pub(crate) fn mount<S>(
        gate: &'static str,
        evaluator: &PermissionEvaluator<S>,
        resource: Option<Resource>,
        action: Option<Action>,
    ) -> Self
    where
        S: Signal<Option<Identity>>,
    {
        let mut watch = Self::new(gate);
        watch.bind(evaluator, resource, action);
        watch
    }

    /// (Re)subscribe for `resource`/`action` and read the first decision.
    ///
    /// Incomplete configuration logs a warning and renders denied.
    pub(crate) fn bind<S>(
        &mut self,
        evaluator: &PermissionEvaluator<S>,
        resource: Option<Resource>,
        action: Option<Action>,
    ) where
        S: Signal<Option<Identity>>,
    {
        self.stream = None;

        let (Some(resource), Some(action)) = (resource, action) else {
            tracing::warn!(
                gate = self.gate,
                resource = ?resource,
                action = ?action,
                "gate requires both resource and action; rendering as denied"
            );
            self.state = GateState::Rendered(Decision::Denied);
            return;
        };

        self.state = GateState::Evaluating;
        self.stream = Some(evaluator.has_permission_stream(resource, action));
        self.poll();
    }

    /// Apply pending decisions. Returns whether the rendered decision changed.
    ///
    /// Several identity changes between polls collapse into their final
    /// decision; a flip that returns to the current decision reports `false`.
    pub(crate) fn poll(&mut self) -> bool {
        let Some(stream) = &self.stream else {
            return false;
        };

        let before = self.state;
        for allowed in stream.drain() {
            self.state = GateState::Rendered(Decision::from(allowed));
        }

        let changed = self.state != before;
        if changed {
            tracing::debug!(
                gate = self.gate,
                resource = %stream.resource(),
                action = %stream.action(),
                from = ?before,
                to = ?self.state,
                "gate decision changed"
            );
        }
        changed
    }

    pub(crate) fn state(&self) -> GateState {
        self.state
    }

    pub(crate) fn is_allowed(&self) -> bool {
        self.state.is_allowed()
    }

    #[cfg(test)]
    pub(crate) fn is_subscribed(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use taskdeck_auth::Role;
    use taskdeck_core::UserId;
    use taskdeck_events::InMemorySignal;

    fn identity(role: Role) -> Option<Identity> {
        Some(Identity::new(UserId::new(), "w@example.com", role))
    }

    #[test]
    fn mount_reads_first_decision() {
        let signal = Arc::new(InMemorySignal::new(identity(Role::Admin)));
        let evaluator = PermissionEvaluator::new(signal.clone());

        let watch = DecisionWatch::mount(
            "test",
            &evaluator,
            Some(Resource::User),
            Some(Action::Delete),
        );
        assert_eq!(watch.state(), GateState::Rendered(Decision::Allowed));
        assert!(watch.is_subscribed());
        assert_eq!(signal.subscriber_count(), 1);
    }

    #[test]
    fn poll_reports_only_net_changes() {
        let signal = Arc::new(InMemorySignal::new(identity(Role::Guest)));
        let evaluator = PermissionEvaluator::new(signal.clone());
        let mut watch = DecisionWatch::mount(
            "test",
            &evaluator,
            Some(Resource::Task),
            Some(Action::Create),
        );
        assert!(!watch.is_allowed());

        assert!(!watch.poll());

        signal.set(identity(Role::User)).unwrap();
        assert!(watch.poll());
        assert!(watch.is_allowed());

        signal.set(identity(Role::Manager)).unwrap();
        assert!(!watch.poll());

        signal.set(None).unwrap();
        signal.set(identity(Role::Admin)).unwrap();
        assert!(!watch.poll());
        assert!(watch.is_allowed());
    }

    #[test]
    fn rebinding_releases_previous_stream() {
        let signal = Arc::new(InMemorySignal::new(identity(Role::Manager)));
        let evaluator = PermissionEvaluator::new(signal.clone());
        let mut watch = DecisionWatch::mount(
            "test",
            &evaluator,
            Some(Resource::Team),
            Some(Action::Update),
        );
        assert!(watch.is_allowed());

        watch.bind(&evaluator, Some(Resource::Team), Some(Action::Delete));
        assert!(!watch.is_allowed());
        assert_eq!(signal.subscriber_count(), 1);

        drop(watch);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn incomplete_configuration_denies_without_subscribing() {
        let signal = Arc::new(InMemorySignal::new(identity(Role::Admin)));
        let evaluator = PermissionEvaluator::new(signal.clone());

        let mut watch = DecisionWatch::mount("test", &evaluator, None, Some(Action::Read));
        assert_eq!(watch.state(), GateState::Rendered(Decision::Denied));
        assert!(!watch.is_subscribed());
        assert!(!watch.poll());
        assert_eq!(signal.subscriber_count(), 0);
    }
}
