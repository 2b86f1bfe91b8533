//! `taskdeck-gate`: permission-gated UI fragments.
//!
//! Gates wrap any fragment type `F` (a view, a widget, a string) and decide
//! which fragment, if any, is visible for the signed-in user:
//!
//! - [`ProtectedAction`]: content when allowed; optionally a fallback or a
//!   default notice when denied
//! - [`ProtectedActionContainer`]: an allowed branch and an optional denied
//!   branch
//! - [`CanAccess`]: structural conditional, content or nothing
//!
//! Every gate subscribes to the evaluator's permission stream when mounted.
//! The host loop calls `poll()` after identity changes and re-renders when it
//! returns `true`. Unmounting (or dropping) a gate releases its subscription.
//!
//! A gate missing its resource or action logs a warning and stays denied.

pub mod can_access;
pub mod container;
pub mod protected_action;
pub mod state;

mod watch;

pub use can_access::CanAccess;
pub use container::{ProtectedActionContainer, ProtectedActionContainerView};
pub use protected_action::{DEFAULT_DENIED_NOTICE, ProtectedAction, ProtectedActionView};
pub use state::{Decision, GateState, Render};
