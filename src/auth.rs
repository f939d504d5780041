//! Observable authentication state and the profile gate.

use tokio::sync::watch;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{AuthSession, Credentials, UserProfile};
use crate::repositories::{AuthRepository, UserRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<AuthSession>,
    pub profile: Option<UserProfile>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            profile: None,
            loading: true,
        }
    }
}

/// Where the signed-in flow should send the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Loading,
    SignIn,
    CompleteProfile,
    Ready,
}

impl AuthState {
    pub fn gate(&self) -> Gate {
        if self.loading {
            return Gate::Loading;
        }
        if self.session.is_none() {
            return Gate::SignIn;
        }
        match &self.profile {
            Some(profile) if profile.is_complete() => Gate::Ready,
            _ => Gate::CompleteProfile,
        }
    }
}

/// Holds the current session and profile and broadcasts every change.
pub struct AuthStore {
    auth: AuthRepository,
    users: UserRepository,
    state: watch::Sender<AuthState>,
}

impl AuthStore {
    pub fn new(pool: DbPool, session_ttl_days: i64) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            auth: AuthRepository::with_ttl_days(pool.clone(), session_ttl_days),
            users: UserRepository::new(pool),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn gate(&self) -> Gate {
        self.state.borrow().gate()
    }

    fn user_id(&self) -> Option<String> {
        self.state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.user.id.clone())
    }

    async fn publish_session(&self, session: Option<AuthSession>) -> Result<()> {
        let profile = match &session {
            Some(session) => self.users.find_by_id(&session.user.id).await?,
            None => None,
        };
        self.state.send_replace(AuthState {
            session,
            profile,
            loading: false,
        });
        Ok(())
    }

    /// Restore a stored session token, if any, and leave the loading state.
    pub async fn initialize(&self, token: Option<&str>) -> Result<()> {
        let session = match token {
            Some(token) => self.auth.get_session(token).await?,
            None => None,
        };
        if token.is_some() && session.is_none() {
            tracing::debug!("Stored session is no longer valid");
        }
        self.publish_session(session).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let credentials = Credentials::new(email, password);
        let session = self.auth.sign_in_with_password(&credentials).await?;
        self.publish_session(Some(session.clone())).await?;
        Ok(session)
    }

    /// Create the account and sign straight in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        let credentials = Credentials::new(email, password);
        self.auth.sign_up(&credentials).await?;
        let session = self.auth.sign_in_with_password(&credentials).await?;
        self.publish_session(Some(session.clone())).await?;
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<()> {
        let token = self.state.borrow().session.as_ref().map(|s| s.token.clone());
        if let Some(token) = token {
            self.auth.sign_out(&token).await?;
        }
        self.publish_session(None).await
    }

    /// Re-read the profile row for the signed-in user.
    pub async fn refresh_profile(&self) -> Result<()> {
        let Some(user_id) = self.user_id() else {
            return Ok(());
        };
        let profile = self.users.find_by_id(&user_id).await?;
        self.state.send_modify(|state| state.profile = profile);
        Ok(())
    }

    /// Save first and last name for the signed-in user.
    pub async fn complete_profile(&self, first_name: &str, last_name: &str) -> Result<UserProfile> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::Validation(
                "Please enter your first and last name".into(),
            ));
        }

        let user = self
            .state
            .borrow()
            .session
            .as_ref()
            .map(|s| s.user.clone())
            .ok_or(AppError::Unauthorized)?;
        let profile = UserProfile {
            id: user.id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: user.email,
        };
        self.users.upsert(&profile).await?;
        tracing::info!(user_id = %profile.id, "Completed profile");

        self.refresh_profile().await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_test_db;

    #[tokio::test]
    async fn test_gate_transitions() {
        let store = AuthStore::new(setup_test_db(), 7);
        assert_eq!(store.gate(), Gate::Loading);

        store.initialize(None).await.unwrap();
        assert_eq!(store.gate(), Gate::SignIn);

        store.sign_up("jane@example.com", "hunter22").await.unwrap();
        assert_eq!(store.gate(), Gate::CompleteProfile);

        store.complete_profile(" Jane ", "Doe").await.unwrap();
        assert_eq!(store.gate(), Gate::Ready);
        assert_eq!(store.state().profile.unwrap().first_name, "Jane");

        store.sign_out().await.unwrap();
        assert_eq!(store.gate(), Gate::SignIn);
    }

    #[tokio::test]
    async fn test_subscribers_see_sign_in() {
        let pool = setup_test_db();
        let store = AuthStore::new(pool, 7);
        store.initialize(None).await.unwrap();
        let mut rx = store.subscribe();

        store.sign_up("jane@example.com", "hunter22").await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.session.unwrap().user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_initialize_restores_session() {
        let pool = setup_test_db();
        let first = AuthStore::new(pool.clone(), 7);
        let session = first.sign_up("jane@example.com", "hunter22").await.unwrap();

        let second = AuthStore::new(pool, 7);
        second.initialize(Some(&session.token)).await.unwrap();

        assert_eq!(second.state().session.unwrap().user.id, session.user.id);
    }

    #[tokio::test]
    async fn test_complete_profile_requires_names() {
        let store = AuthStore::new(setup_test_db(), 7);
        store.sign_up("jane@example.com", "hunter22").await.unwrap();

        let result = store.complete_profile("Jane", "   ").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.gate(), Gate::CompleteProfile);
    }

    #[tokio::test]
    async fn test_complete_profile_requires_session() {
        let store = AuthStore::new(setup_test_db(), 7);
        store.initialize(None).await.unwrap();

        let result = store.complete_profile("Jane", "Doe").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
