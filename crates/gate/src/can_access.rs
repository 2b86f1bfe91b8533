//! Structural conditional: render content only while a permission holds.
//!
//! Unlike the builder-configured gates, resource and action arrive through
//! independent setters (the way template inputs do); the gate re-subscribes
//! whenever both are known and one of them changes.

use taskdeck_auth::{Action, Identity, PermissionEvaluator, Resource};
use taskdeck_events::Signal;

use crate::state::{GateState, Render};
use crate::watch::DecisionWatch;

#[derive(Debug)]
pub struct CanAccess<S, F> {
    evaluator: PermissionEvaluator<S>,
    resource: Option<Resource>,
    action: Option<Action>,
    content: F,
    watch: DecisionWatch,
}

impl<S, F> CanAccess<S, F>
where
    S: Signal<Option<Identity>>,
{
    /// Mount with whatever inputs are known. Missing inputs log a warning and
    /// keep the content hidden until both are set.
    pub fn mount(
        evaluator: PermissionEvaluator<S>,
        resource: Option<Resource>,
        action: Option<Action>,
        content: F,
    ) -> Self {
        let watch = DecisionWatch::mount("can_access", &evaluator, resource, action);
        Self {
            evaluator,
            resource,
            action,
            content,
            watch,
        }
    }

    pub fn set_resource(&mut self, resource: Resource) {
        if self.resource != Some(resource) {
            self.resource = Some(resource);
            self.rebind();
        }
    }

    pub fn set_action(&mut self, action: Action) {
        if self.action != Some(action) {
            self.action = Some(action);
            self.rebind();
        }
    }

    fn rebind(&mut self) {
        if self.resource.is_some() && self.action.is_some() {
            self.watch.bind(&self.evaluator, self.resource, self.action);
        }
    }

    pub fn render(&self) -> Render<'_, F> {
        if self.watch.is_allowed() {
            Render::Content(&self.content)
        } else {
            Render::Nothing
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use taskdeck_auth::Role;
    use taskdeck_core::UserId;
    use taskdeck_events::InMemorySignal;

    use crate::state::Decision;

    type TestSignal = Arc<InMemorySignal<Option<Identity>>>;

    fn setup(role: Role) -> (TestSignal, PermissionEvaluator<TestSignal>) {
        let signal = Arc::new(InMemorySignal::new(Some(Identity::new(
            UserId::new(),
            "d@example.com",
            role,
        ))));
        (signal.clone(), PermissionEvaluator::new(signal))
    }

    #[test]
    fn inputs_set_after_mount_take_effect() {
        let (signal, evaluator) = setup(Role::Manager);
        let mut gate = CanAccess::mount(evaluator, None, None, "Create Project");
        assert!(gate.render().is_nothing());
        assert_eq!(signal.subscriber_count(), 0);

        gate.set_resource(Resource::Project);
        assert!(gate.render().is_nothing());

        gate.set_action(Action::Create);
        assert_eq!(gate.render(), Render::Content(&"Create Project"));
        assert_eq!(signal.subscriber_count(), 1);
    }

    #[test]
    fn changing_an_input_re_evaluates_with_one_subscription() {
        let (signal, evaluator) = setup(Role::Manager);
        let mut gate = CanAccess::mount(
            evaluator,
            Some(Resource::Project),
            Some(Action::Update),
            "Edit",
        );
        assert_eq!(gate.state(), GateState::Rendered(Decision::Allowed));

        gate.set_action(Action::Delete);
        assert_eq!(gate.state(), GateState::Rendered(Decision::Denied));
        assert_eq!(signal.subscriber_count(), 1);

        gate.unmount();
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn follows_sign_out() {
        let (signal, evaluator) = setup(Role::Guest);
        let mut gate =
            CanAccess::mount(evaluator, Some(Resource::Team), Some(Action::Read), "Team");
        assert!(!gate.render().is_nothing());

        signal.set(None).unwrap();
        assert!(gate.poll());
        assert!(gate.render().is_nothing());
    }
}
