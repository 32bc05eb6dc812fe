use async_trait::async_trait;
use tokio::sync::watch;

use super::{require_credentials, IdentityService, SessionCell};
use crate::errors::AppError;
use crate::models::{Principal, SessionState};

/// Signs in against a single configured email/password pair.
pub struct LocalIdentity {
    email: String,
    password: String,
    session: SessionCell,
}

impl LocalIdentity {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            session: SessionCell::new(),
        }
    }
}

#[async_trait]
impl IdentityService for LocalIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        require_credentials(email, password)?;

        let email = email.trim();
        if !email.eq_ignore_ascii_case(&self.email) || password != self.password {
            tracing::warn!(email = %email, "rejected sign-in");
            return Err(AppError::InvalidCredentials);
        }

        let principal = Principal {
            uid: format!("local:{}", self.email.to_ascii_lowercase()),
            email: self.email.clone(),
        };
        self.session.sign_in(principal.clone());
        tracing::info!(uid = %principal.uid, "signed in");
        Ok(principal)
    }

    async fn restore(&self) -> SessionState {
        self.session.settle()
    }

    async fn sign_out(&self) {
        self.session.sign_out();
    }

    fn observe_session(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let identity = LocalIdentity::new("owner@example.com", "secret");
        let rx = identity.observe_session();
        assert!(rx.borrow().loading);

        let restored = identity.restore().await;
        assert_eq!(restored, SessionState::signed_out());

        let principal = identity.sign_in(" Owner@Example.com ", "secret").await.unwrap();
        assert_eq!(principal.email, "owner@example.com");
        assert_eq!(rx.borrow().principal.as_ref(), Some(&principal));

        identity.sign_out().await;
        assert_eq!(*rx.borrow(), SessionState::signed_out());
    }

    #[tokio::test]
    async fn test_restore_keeps_signed_in_session() {
        let identity = LocalIdentity::new("owner@example.com", "secret");
        identity.sign_in("owner@example.com", "secret").await.unwrap();
        assert!(identity.restore().await.principal.is_some());
    }

    #[tokio::test]
    async fn test_rejections() {
        let identity = LocalIdentity::new("owner@example.com", "secret");

        let err = identity.sign_in("owner@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid credentials or user not found");

        let err = identity.sign_in("", "").await.unwrap_err();
        assert!(matches!(err, AppError::MissingCredentials));
        assert_eq!(err.to_string(), "Email and Password are required");

        let err = identity.sign_in("owner@example.com", "").await.unwrap_err();
        assert!(matches!(err, AppError::MissingCredentials));

        assert!(identity.observe_session().borrow().principal.is_none());
    }
}
