use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Principal, SessionState};

/// Bearer tokens handed out by the HTTP login endpoint.
#[derive(Default)]
pub struct SessionRegistry {
    tokens: Mutex<HashMap<String, Principal>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, principal: Principal) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.clone(), principal);
        token
    }

    /// The session a token stands for. Unknown tokens are signed out; there
    /// is no loading phase on the server.
    pub fn resolve(&self, token: &str) -> SessionState {
        let tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        match tokens.get(token) {
            Some(principal) => SessionState::signed_in(principal.clone()),
            None => SessionState::signed_out(),
        }
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token)
            .is_some()
    }
}
