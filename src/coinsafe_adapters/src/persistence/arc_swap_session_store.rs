use std::sync::Arc;

use arc_swap::ArcSwapOption;

use coinsafe_core::{IssuedSession, SessionEstablisher};

/// Process-wide slot holding the currently established session. Establishing
/// is an atomic pointer swap, so repeated establishes (which the controller's
/// success latch already prevents per session) are harmless.
#[derive(Clone, Default)]
pub struct ArcSwapSessionStore {
    current: Arc<ArcSwapOption<IssuedSession>>,
}

impl ArcSwapSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<IssuedSession>> {
        self.current.load_full()
    }

    pub fn clear(&self) {
        self.current.store(None);
    }
}

impl SessionEstablisher for ArcSwapSessionStore {
    fn establish(&self, session: &IssuedSession) {
        self.current.store(Some(Arc::new(session.clone())));
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use secrecy::Secret;

    use coinsafe_core::{Email, UserIdentity};

    use super::*;

    fn session(token: &str) -> IssuedSession {
        IssuedSession {
            access_token: Secret::from(token.to_owned()),
            refresh_token: None,
            user: UserIdentity::email_only(Email::try_from("user@example.com").unwrap()),
            remember_me: true,
            established_at: Utc::now(),
        }
    }

    #[test]
    fn establish_replaces_the_current_session() {
        let store = ArcSwapSessionStore::new();
        assert!(store.current().is_none());

        store.establish(&session("jwt1"));
        assert_eq!(store.current().unwrap().access_token(), "jwt1");

        store.establish(&session("jwt2"));
        assert_eq!(store.current().unwrap().access_token(), "jwt2");
    }

    #[test]
    fn clear_empties_the_slot() {
        let store = ArcSwapSessionStore::new();
        store.establish(&session("jwt1"));
        store.clear();
        assert!(store.current().is_none());
    }
}
