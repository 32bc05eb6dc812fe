//! Decides whether protected content renders for a session.

use tokio::sync::watch;

use crate::models::{Principal, SessionState};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Loading,
    Redirect(&'static str),
    Render(Principal),
}

impl GateDecision {
    pub fn label(&self) -> &'static str {
        match self {
            GateDecision::Loading => "loading",
            GateDecision::Redirect(_) => "unauthenticated",
            GateDecision::Render(_) => "authenticated",
        }
    }
}

pub fn evaluate(state: &SessionState) -> GateDecision {
    if state.loading {
        return GateDecision::Loading;
    }
    match &state.principal {
        Some(principal) => GateDecision::Render(principal.clone()),
        None => GateDecision::Redirect(LOGIN_PATH),
    }
}

/// Follows an identity service's session channel. The gate never changes the
/// session itself.
pub struct SessionGate {
    session: watch::Receiver<SessionState>,
}

impl SessionGate {
    pub fn new(session: watch::Receiver<SessionState>) -> Self {
        Self { session }
    }

    pub fn decision(&self) -> GateDecision {
        evaluate(&self.session.borrow())
    }

    /// Waits for the next session change. `None` once the identity service is gone.
    pub async fn changed(&mut self) -> Option<GateDecision> {
        self.session.changed().await.ok()?;
        Some(evaluate(&self.session.borrow_and_update()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            uid: "u1".to_string(),
            email: "owner@example.com".to_string(),
        }
    }

    #[test]
    fn test_evaluate_states() {
        assert_eq!(evaluate(&SessionState::loading()), GateDecision::Loading);
        assert_eq!(
            evaluate(&SessionState::signed_out()),
            GateDecision::Redirect(LOGIN_PATH)
        );
        assert_eq!(
            evaluate(&SessionState::signed_in(principal())),
            GateDecision::Render(principal())
        );
    }

    #[test]
    fn test_loading_wins_over_principal() {
        let state = SessionState {
            principal: Some(principal()),
            loading: true,
        };
        assert_eq!(evaluate(&state), GateDecision::Loading);
    }

    #[tokio::test]
    async fn test_gate_follows_session_channel() {
        let (tx, rx) = watch::channel(SessionState::loading());
        let mut gate = SessionGate::new(rx);
        assert_eq!(gate.decision(), GateDecision::Loading);

        tx.send_replace(SessionState::signed_in(principal()));
        assert_eq!(gate.changed().await, Some(GateDecision::Render(principal())));

        drop(tx);
        assert_eq!(gate.changed().await, None);
    }
}
