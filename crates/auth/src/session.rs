//! Session store: the identity-signal adapter.
//!
//! Converts identity-service payloads into [`Identity`] values and publishes
//! them on an [`IdentitySignal`]. The evaluator only ever sees the signal.
//! Token storage is limited to holding the bearer token for the host.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;

use taskdeck_core::DomainError;
use taskdeck_events::{InMemorySignal, Signal};

use crate::identity::{AuthResponse, CurrentUser, Identity};

/// Signal carrying the signed-in identity (`None` when signed out).
pub type IdentitySignal = InMemorySignal<Option<Identity>>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("sign-in rejected: {0}")]
    Rejected(String),

    #[error("sign-in response carried no user")]
    MissingIdentity,

    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] DomainError),

    #[error("malformed session payload: {0}")]
    MalformedPayload(String),

    #[error("identity signal unavailable: {0}")]
    Signal(String),
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<CurrentUser>,
    token: Option<String>,
    established_at: Option<DateTime<Utc>>,
}

/// Holds the signed-in user and publishes identity transitions.
///
/// Emits exactly one value per transition: sign-in, sign-out, identity
/// replacement.
#[derive(Debug)]
pub struct SessionStore {
    signal: Arc<IdentitySignal>,
    state: Mutex<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// A signed-out session.
    pub fn new() -> Self {
        Self {
            signal: Arc::new(InMemorySignal::new(None)),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Rehydrate from a persisted [`CurrentUser`] JSON snapshot.
    ///
    /// A malformed snapshot is logged and yields a signed-out session.
    pub fn restore(snapshot: Option<&str>) -> Self {
        let Some(snapshot) = snapshot else {
            return Self::new();
        };

        let user = match serde_json::from_str::<CurrentUser>(snapshot) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed session snapshot");
                return Self::new();
            }
        };

        let identity = match Identity::from_current_user(&user) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "discarding session snapshot with invalid identity");
                return Self::new();
            }
        };

        tracing::info!(
            user_id = %identity.id(),
            role = %identity.resolved_role(),
            "session restored"
        );
        Self {
            signal: Arc::new(InMemorySignal::new(Some(identity))),
            state: Mutex::new(SessionState {
                token: user.token.clone(),
                user: Some(user),
                established_at: Some(Utc::now()),
            }),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, identity: Option<Identity>) -> Result<(), SessionError> {
        self.signal
            .set(identity)
            .map_err(|e| SessionError::Signal(format!("{:?}", e)))
    }

    /// Handle for constructing a `PermissionEvaluator`.
    pub fn signal(&self) -> Arc<IdentitySignal> {
        self.signal.clone()
    }

    /// Accept a login/register response.
    pub fn sign_in(&self, response: AuthResponse) -> Result<Identity, SessionError> {
        if !response.success {
            return Err(SessionError::Rejected(response.message));
        }
        let accepted = response
            .data
            .ok_or(SessionError::MissingIdentity)
            .and_then(|user| {
                let identity = Identity::from_current_user(&user)?;
                Ok((user, identity))
            });
        let (user, identity) = match accepted {
            Ok(accepted) => accepted,
            Err(err) => {
                // The service switched users; the previous identity must not survive.
                tracing::warn!(error = %err, "unusable sign-in payload; ending previous session");
                self.sign_out()?;
                return Err(err);
            }
        };

        if !identity.role_claim().is_recognized() {
            tracing::warn!(
                user_id = %identity.id(),
                claimed = ?identity.role_claim().raw(),
                "unrecognized role claim; evaluating as {}",
                identity.resolved_role()
            );
        }

        {
            let mut state = self.lock_state();
            state.token = user.token.clone();
            state.user = Some(user);
            state.established_at = Some(Utc::now());
        }
        self.publish(Some(identity.clone()))?;

        tracing::info!(user_id = %identity.id(), role = %identity.resolved_role(), "signed in");
        Ok(identity)
    }

    /// Parse and accept a raw JSON login/register response.
    pub fn sign_in_json(&self, json: &str) -> Result<Identity, SessionError> {
        let response: AuthResponse = serde_json::from_str(json)
            .map_err(|e| SessionError::MalformedPayload(e.to_string()))?;
        self.sign_in(response)
    }

    /// Swap the signed-in identity (e.g. after a token refresh).
    ///
    /// The previous token is kept unless the new payload carries one.
    pub fn replace_identity(&self, user: CurrentUser) -> Result<Identity, SessionError> {
        let identity = Identity::from_current_user(&user)?;
        {
            let mut state = self.lock_state();
            if user.token.is_some() {
                state.token = user.token.clone();
            }
            state.user = Some(user);
            state.established_at = Some(Utc::now());
        }
        self.publish(Some(identity.clone()))?;

        tracing::info!(
            user_id = %identity.id(),
            role = %identity.resolved_role(),
            "identity replaced"
        );
        Ok(identity)
    }

    /// End the session. Publishes `None` only when someone was signed in.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        let previous = {
            let mut state = self.lock_state();
            let previous = state.user.take();
            *state = SessionState::default();
            previous
        };
        if previous.is_none() && self.signal.get().is_none() {
            tracing::debug!("sign-out without an active session");
            return Ok(());
        }
        self.publish(None)?;

        tracing::info!(user_email = ?previous.as_ref().map(|u| u.email.as_str()), "signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.signal.get()
    }

    /// Signed in and holding a token.
    pub fn is_authenticated(&self) -> bool {
        self.signal.get().is_some() && self.lock_state().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.lock_state().token.clone()
    }

    pub fn established_at(&self) -> Option<DateTime<Utc>> {
        self.lock_state().established_at
    }

    /// JSON of the signed-in [`CurrentUser`] (token included) for the host to
    /// persist; `None` when signed out.
    pub fn snapshot_json(&self) -> Option<String> {
        let state = self.lock_state();
        let mut user = state.user.clone()?;
        user.token = state.token.clone();
        serde_json::to_string(&user).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::roles::Role;

    const ALICE: &str = "123e4567-e89b-12d3-a456-426614174000";

    fn response(role: serde_json::Value, token: Option<&str>) -> AuthResponse {
        serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "data": {
                "id": ALICE,
                "email": "alice@example.com",
                "firstName": "Alice",
                "lastName": "Johnson",
                "role": role,
                "token": token
            }
        }))
        .unwrap()
    }

    #[test]
    fn sign_in_publishes_identity_once() {
        let store = SessionStore::new();
        let sub = store.signal().subscribe();

        let identity = store.sign_in(response(json!("Admin"), Some("t1"))).unwrap();
        assert_eq!(identity.resolved_role(), Role::Admin);
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("t1"));
        assert!(store.established_at().is_some());

        let seen = sub.drain();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_none());
        assert_eq!(seen[1].as_ref(), Some(&identity));
    }

    #[test]
    fn rejected_response_leaves_session_signed_out() {
        let store = SessionStore::new();
        let err = store
            .sign_in(AuthResponse {
                success: false,
                message: "Invalid credentials".to_string(),
                data: None,
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::Rejected(msg) if msg == "Invalid credentials"));
        assert!(store.current_user().is_none());
    }

    #[test]
    fn successful_response_without_data_is_an_error() {
        let store = SessionStore::new();
        let err = store
            .sign_in(AuthResponse {
                success: true,
                message: String::new(),
                data: None,
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingIdentity));
    }

    #[test]
    fn malformed_json_is_reported() {
        let store = SessionStore::new();
        let err = store.sign_in_json("{not json").unwrap_err();
        assert!(matches!(err, SessionError::MalformedPayload(_)));
    }

    #[test]
    fn sign_out_when_signed_out_publishes_nothing() {
        let store = SessionStore::new();
        let sub = store.signal().subscribe();

        store.sign_out().unwrap();
        store.sign_out().unwrap();
        assert_eq!(sub.drain(), vec![None]);

        store.sign_in(response(json!("User"), Some("t1"))).unwrap();
        store.sign_out().unwrap();
        store.sign_out().unwrap();
        let seen = sub.drain();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].is_none());
    }

    #[test]
    fn unusable_successful_login_ends_previous_session() {
        let store = SessionStore::new();
        store.sign_in(response(json!("Admin"), Some("t1"))).unwrap();

        let err = store
            .sign_in(AuthResponse {
                success: true,
                message: "ok".to_string(),
                data: None,
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingIdentity));
        assert!(store.current_user().is_none());
        assert!(store.token().is_none());

        store.sign_in(response(json!("Admin"), Some("t1"))).unwrap();
        let mut blank = response(json!("Guest"), Some("t2"));
        if let Some(user) = blank.data.as_mut() {
            user.id = "   ".to_string();
        }
        let err = store.sign_in(blank).unwrap_err();
        assert!(matches!(err, SessionError::InvalidIdentity(_)));
        assert!(store.current_user().is_none());
    }

    #[test]
    fn rejected_credentials_keep_the_current_session() {
        let store = SessionStore::new();
        store.sign_in(response(json!("Manager"), Some("t1"))).unwrap();
        store
            .sign_in(AuthResponse {
                success: false,
                message: "Invalid credentials".to_string(),
                data: None,
            })
            .unwrap_err();
        assert_eq!(
            store.current_user().map(|u| u.resolved_role()),
            Some(Role::Manager)
        );
    }

    #[test]
    fn signed_in_without_token_is_not_authenticated() {
        let store = SessionStore::new();
        store.sign_in(response(json!("User"), None)).unwrap();
        assert!(store.current_user().is_some());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn sign_out_clears_everything() {
        let store = SessionStore::new();
        store.sign_in(response(json!("Manager"), Some("t1"))).unwrap();
        store.sign_out().unwrap();
        assert!(store.current_user().is_none());
        assert!(store.token().is_none());
        assert!(store.snapshot_json().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn replace_identity_keeps_token_unless_refreshed() {
        let store = SessionStore::new();
        store.sign_in(response(json!("User"), Some("t1"))).unwrap();

        let mut promoted = response(json!("Manager"), None).data.unwrap();
        let identity = store.replace_identity(promoted.clone()).unwrap();
        assert_eq!(identity.resolved_role(), Role::Manager);
        assert_eq!(store.token().as_deref(), Some("t1"));

        promoted.token = Some("t2".to_string());
        store.replace_identity(promoted).unwrap();
        assert_eq!(store.token().as_deref(), Some("t2"));
    }

    #[test]
    fn snapshot_round_trips_through_restore() {
        let store = SessionStore::new();
        store.sign_in(response(json!("Guest"), Some("t1"))).unwrap();
        let snapshot = store.snapshot_json().unwrap();

        let restored = SessionStore::restore(Some(&snapshot));
        let identity = restored.current_user().unwrap();
        assert_eq!(identity.id().to_string(), ALICE);
        assert_eq!(identity.resolved_role(), Role::Guest);
        assert!(restored.is_authenticated());
    }

    #[test]
    fn malformed_snapshot_restores_signed_out() {
        assert!(SessionStore::restore(Some("garbage")).current_user().is_none());
        assert!(SessionStore::restore(None).current_user().is_none());

        let bad_id = json!({"id": "", "email": "x@example.com", "role": "Admin"}).to_string();
        assert!(SessionStore::restore(Some(&bad_id)).current_user().is_none());
    }
}
