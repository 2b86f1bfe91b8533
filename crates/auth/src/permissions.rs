use core::str::FromStr;

use serde::{Deserialize, Serialize};

use taskdeck_core::DomainError;

/// Class of protected functionality (never a specific record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Task,
    Project,
    User,
    Team,
    Settings,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Task,
        Resource::Project,
        Resource::User,
        Resource::Team,
        Resource::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Task => "task",
            Resource::Project => "project",
            Resource::User => "user",
            Resource::Team => "team",
            Resource::Settings => "settings",
        }
    }
}

/// Operation checked against a resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Export,
    Share,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Export,
        Action::Share,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Export => "export",
            Action::Share => "share",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

macro_rules! impl_name_traits {
    ($t:ty, $kind:literal) => {
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$t>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| DomainError::validation(format!("unknown {} '{}'", $kind, s)))
            }
        }
    };
}

impl_name_traits!(Resource, "resource");
impl_name_traits!(Action, "action");

/// Set of actions, stored by value.
///
/// Sets handed out by the evaluator are copies; changing one never affects the
/// permission table.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Action>", from = "Vec<Action>")]
pub struct ActionSet(u8);

impl ActionSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self::of(&Action::ALL)
    }

    pub const fn of(actions: &[Action]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < actions.len() {
            bits |= actions[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_subset(&self, other: &ActionSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn insert(&mut self, action: Action) -> bool {
        let added = !self.contains(action);
        self.0 |= action.bit();
        added
    }

    pub fn remove(&mut self, action: Action) -> bool {
        let removed = self.contains(action);
        self.0 &= !action.bit();
        removed
    }

    /// Actions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        for action in iter {
            set.insert(action);
        }
        set
    }
}

impl From<Vec<Action>> for ActionSet {
    fn from(actions: Vec<Action>) -> Self {
        actions.into_iter().collect()
    }
}

impl From<ActionSet> for Vec<Action> {
    fn from(set: ActionSet) -> Self {
        set.iter().collect()
    }
}

impl core::fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl core::fmt::Display for ActionSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let names: Vec<&str> = self.iter().map(|a| a.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

/// A single (resource, action) question.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub resource: Resource,
    pub action: Action,
}

impl PermissionCheck {
    pub fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Build a check from untyped names (templates, scripts).
    pub fn parse(resource: &str, action: &str) -> Result<Self, DomainError> {
        Ok(Self {
            resource: resource.parse()?,
            action: action.parse()?,
        })
    }
}

impl core::fmt::Display for PermissionCheck {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_exactly() {
        for resource in Resource::ALL {
            assert_eq!(resource.as_str().parse::<Resource>().unwrap(), resource);
        }
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!("Task".parse::<Resource>().is_err());
        assert!("archive".parse::<Action>().is_err());
    }

    #[test]
    fn action_set_basics() {
        let mut set = ActionSet::of(&[Action::Read, Action::Create]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Action::Read));
        assert!(!set.contains(Action::Delete));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Action::Create, Action::Read]);

        assert!(set.insert(Action::Delete));
        assert!(!set.insert(Action::Delete));
        assert!(set.remove(Action::Create));
        assert_eq!(set.to_string(), "read,delete");
        assert!(set.is_subset(&ActionSet::all()));
        assert_eq!(ActionSet::all().len(), Action::ALL.len());
    }

    #[test]
    fn empty_set_displays_none() {
        assert!(ActionSet::empty().is_empty());
        assert_eq!(ActionSet::empty().to_string(), "(none)");
    }

    #[test]
    fn action_set_serializes_as_names() {
        let set = ActionSet::of(&[Action::Share, Action::Read]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["read","share"]"#);
        let back: ActionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn permission_check_parse() {
        let check = PermissionCheck::parse("task", "delete").unwrap();
        assert_eq!(check, PermissionCheck::new(Resource::Task, Action::Delete));
        assert_eq!(check.to_string(), "task:delete");

        let err = PermissionCheck::parse("invoice", "read").unwrap_err();
        assert_eq!(err, DomainError::validation("unknown resource 'invoice'"));
    }
}
