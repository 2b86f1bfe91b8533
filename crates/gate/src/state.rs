/// Outcome of a permission decision as seen by a gate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Decision {
    Allowed,
    Denied,
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allowed
        } else {
            Decision::Denied
        }
    }
}

/// Lifecycle of a mounted gate.
///
/// `Uninitialized → Evaluating → Rendered(_)`; afterwards only
/// `Rendered(x) → Rendered(y)` with `x != y`. Unmounting ends the lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GateState {
    Uninitialized,
    /// Subscribed, first decision not read yet.
    Evaluating,
    Rendered(Decision),
}

impl GateState {
    pub fn decision(&self) -> Option<Decision> {
        match self {
            GateState::Rendered(decision) => Some(*decision),
            GateState::Uninitialized | GateState::Evaluating => None,
        }
    }

    /// Only a rendered `Allowed` counts; every other state hides content.
    pub fn is_allowed(&self) -> bool {
        self.decision() == Some(Decision::Allowed)
    }
}

/// What a gate shows right now.
#[derive(Debug, PartialEq, Eq)]
pub enum Render<'a, F> {
    /// The protected content.
    Content(&'a F),
    /// The caller-supplied denied/fallback fragment.
    Denied(&'a F),
    /// Built-in notice for a denied gate asked to show a fallback it was not given.
    DefaultNotice(&'static str),
    Nothing,
}

impl<'a, F> Render<'a, F> {
    /// The caller's fragment being shown, if any.
    pub fn fragment(&self) -> Option<&'a F> {
        match self {
            Render::Content(f) | Render::Denied(f) => Some(*f),
            Render::DefaultNotice(_) | Render::Nothing => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Render::Nothing)
    }
}
