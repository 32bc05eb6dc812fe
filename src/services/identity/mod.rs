pub mod firebase;
pub mod local;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::AppError;
use crate::models::{Principal, SessionState};

pub use firebase::FirebaseIdentity;
pub use local::LocalIdentity;

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Verifies credentials and makes the principal the current session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AppError>;

    /// Ends the loading phase, settling on whatever session survived (if any).
    async fn restore(&self) -> SessionState;

    async fn sign_out(&self);

    /// The current session. Each call yields an independent receiver that
    /// starts from the latest value.
    fn observe_session(&self) -> watch::Receiver<SessionState>;
}

/// The observable "current session" shared by identity implementations.
pub struct SessionCell {
    tx: watch::Sender<SessionState>,
}

impl SessionCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::loading());
        Self { tx }
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn settle(&self) -> SessionState {
        self.tx.send_if_modified(|state| {
            if state.loading {
                *state = SessionState::signed_out();
                true
            } else {
                false
            }
        });
        self.current()
    }

    pub fn sign_in(&self, principal: Principal) {
        self.tx.send_replace(SessionState::signed_in(principal));
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(SessionState::signed_out());
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Missing-field check shared by every sign-in path.
pub(crate) fn require_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(AppError::MissingCredentials);
    }
    Ok(())
}
