use serde::{Deserialize, Serialize};

/// The authenticated identity returned by a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub principal: Option<Principal>,
    pub loading: bool,
}

impl SessionState {
    pub fn loading() -> Self {
        Self { principal: None, loading: true }
    }

    pub fn signed_out() -> Self {
        Self { principal: None, loading: false }
    }

    pub fn signed_in(principal: Principal) -> Self {
        Self { principal: Some(principal), loading: false }
    }
}
