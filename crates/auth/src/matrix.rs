//! The compiled-in role → resource → action table.
//!
//! Private to the crate: callers ask the evaluator, which applies the
//! unauthenticated/default-role policy before looking here.
//!
//! The table is an exhaustive `match` over both enums. Adding a role or a
//! resource does not compile until every row has an entry for it.

use crate::permissions::{Action, ActionSet, Resource};
use crate::roles::Role;

use Action::{Create, Delete, Export, Read, Share, Update};

const FULL: ActionSet = ActionSet::all();
const CRUD: ActionSet = ActionSet::of(&[Create, Read, Update, Delete]);
const READ_ONLY: ActionSet = ActionSet::of(&[Read]);
const NONE: ActionSet = ActionSet::empty();

/// Actions `role` may perform on `resource`. Total: every pair has an entry.
pub(crate) const fn actions_for(role: Role, resource: Resource) -> ActionSet {
    match (role, resource) {
        (Role::Admin, Resource::Task) => FULL,
        (Role::Admin, Resource::Project) => FULL,
        (Role::Admin, Resource::User) => CRUD,
        (Role::Admin, Resource::Team) => CRUD,
        (Role::Admin, Resource::Settings) => CRUD,

        (Role::Manager, Resource::Task) => FULL,
        (Role::Manager, Resource::Project) => ActionSet::of(&[Create, Read, Update, Export, Share]),
        (Role::Manager, Resource::User) => READ_ONLY,
        (Role::Manager, Resource::Team) => ActionSet::of(&[Read, Update]),
        (Role::Manager, Resource::Settings) => READ_ONLY,

        (Role::User, Resource::Task) => ActionSet::of(&[Create, Read, Update, Export, Share]),
        (Role::User, Resource::Project) => ActionSet::of(&[Read, Export]),
        (Role::User, Resource::User) => READ_ONLY,
        (Role::User, Resource::Team) => READ_ONLY,
        (Role::User, Resource::Settings) => READ_ONLY,

        (Role::Guest, Resource::Task) => READ_ONLY,
        (Role::Guest, Resource::Project) => READ_ONLY,
        (Role::Guest, Resource::User) => READ_ONLY,
        (Role::Guest, Resource::Team) => READ_ONLY,
        (Role::Guest, Resource::Settings) => NONE,
    }
}

/// Roles whose row grants `action` on `resource`.
pub(crate) fn roles_granting(resource: Resource, action: Action) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| actions_for(*role, resource).contains(action))
        .collect()
}
