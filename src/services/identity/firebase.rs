use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::watch;

use super::{require_credentials, IdentityService, SessionCell};
use crate::errors::AppError;
use crate::models::{Principal, SessionState};

const SIGN_IN_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";

/// Email/password sign-in through the Firebase Auth REST API.
pub struct FirebaseIdentity {
    api_key: String,
    client: reqwest::Client,
    session: SessionCell,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            session: SessionCell::new(),
        }
    }
}

#[async_trait]
impl IdentityService for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        require_credentials(email, password)?;

        let response = self
            .client
            .post(SIGN_IN_URL)
            .query(&[("key", &self.api_key)])
            .json(&serde_json::json!({
                "email": email.trim(),
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| AppError::IdentityUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST => {
                tracing::warn!(email = %email.trim(), "firebase rejected sign-in");
                return Err(AppError::InvalidCredentials);
            }
            status => {
                return Err(AppError::IdentityUnavailable(format!(
                    "firebase auth returned {status}"
                )));
            }
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AppError::IdentityUnavailable(e.to_string()))?;

        let principal = Principal {
            uid: body.local_id,
            email: body.email,
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
