//! Single-branch gate: content when allowed, optional fallback when denied.

use taskdeck_auth::{Action, Identity, PermissionEvaluator, Resource};
use taskdeck_events::Signal;

use crate::state::{GateState, Render};
use crate::watch::DecisionWatch;

/// Notice shown by a denied gate that should show a fallback but has none.
pub const DEFAULT_DENIED_NOTICE: &str = "You don't have permission to perform this action.";

/// Configuration of a single-branch gate.
///
/// ```ignore
/// let view = ProtectedAction::new(delete_button)
///     .resource(Resource::Task)
///     .action(Action::Delete)
///     .mount(&evaluator);
///
/// if let Some(button) = view.render().fragment() { draw(button) }
/// ```
///
/// Denied rendering:
///
/// | `show_fallback` | fallback given | renders |
/// |---|---|---|
/// | false | either | nothing |
/// | true | yes | the fallback |
/// | true | no | [`DEFAULT_DENIED_NOTICE`] |
#[derive(Debug, Clone)]
pub struct ProtectedAction<F> {
    resource: Option<Resource>,
    action: Option<Action>,
    content: F,
    fallback: Option<F>,
    show_fallback: bool,
}

impl<F> ProtectedAction<F> {
    pub fn new(content: F) -> Self {
        Self {
            resource: None,
            action: None,
            content,
            fallback: None,
            show_fallback: false,
        }
    }

    /// Shorthand for a fully configured gate.
    pub fn for_permission(resource: Resource, action: Action, content: F) -> Self {
        Self::new(content).resource(resource).action(action)
    }

    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn fallback(mut self, fallback: F) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn show_fallback(mut self, show: bool) -> Self {
        self.show_fallback = show;
        self
    }

    pub fn mount<S>(self, evaluator: &PermissionEvaluator<S>) -> ProtectedActionView<F>
    where
        S: Signal<Option<Identity>>,
    {
        ProtectedActionView {
            watch: DecisionWatch::mount("protected_action", evaluator, self.resource, self.action),
            content: self.content,
            fallback: self.fallback,
            show_fallback: self.show_fallback,
        }
    }
}

/// A mounted [`ProtectedAction`]. Dropping it releases its subscription.
#[derive(Debug)]
pub struct ProtectedActionView<F> {
    watch: DecisionWatch,
    content: F,
    fallback: Option<F>,
    show_fallback: bool,
}

impl<F> ProtectedActionView<F> {
    pub fn render(&self) -> Render<'_, F> {
        if self.watch.is_allowed() {
            return Render::Content(&self.content);
        }
        match (self.show_fallback, &self.fallback) {
            (false, _) => Render::Nothing,
            (true, Some(fallback)) => Render::Denied(fallback),
            (true, None) => Render::DefaultNotice(DEFAULT_DENIED_NOTICE),
        }
    }

    /// Apply identity changes; `true` when the view must be re-rendered.
    pub fn poll(&mut self) -> bool {
        self.watch.poll()
    }

    pub fn state(&self) -> GateState {
        self.watch.state()
    }

    pub fn is_allowed(&self) -> bool {
        self.watch.is_allowed()
    }

    /// Unmount, returning the content fragment.
    pub fn unmount(self) -> F {
        self.content
    }
}
