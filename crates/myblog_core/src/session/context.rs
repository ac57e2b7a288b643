//! Explicit session context.
//!
//! The shell loads the context once from the store and afterwards changes it
//! only through `SessionEvent`s; views receive a `Session` clone when they are
//! mounted and never read storage themselves.

use crate::model::session::Session;
use crate::session::store::SessionStore;
use log::info;

/// Session transitions the shell reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}

/// Current session plus a revision counter bumped on every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session: Session,
    revision: u64,
}

impl SessionContext {
    /// Reads the store once.
    pub fn load(store: &impl SessionStore) -> Self {
        Self {
            session: store.read(),
            revision: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_present(&self) -> bool {
        self.session.is_present()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, event: &SessionEvent) {
        self.session = match event {
            SessionEvent::SignedIn(session) => session.clone(),
            SessionEvent::SignedOut => Session::anonymous(),
        };
        self.revision += 1;
        info!(
            "event=session_changed module=session status=ok present={} revision={}",
            self.session.is_present(),
            self.revision
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionContext, SessionEvent};
    use crate::model::session::Session;
    use crate::session::store::{MemorySessionStore, SessionStore};

    #[test]
    fn context_changes_only_through_events() {
        let store = MemorySessionStore::new();
        let mut context = SessionContext::load(&store);
        assert!(!context.is_present());

        store.write("t1", "u1").unwrap();
        assert!(!context.is_present());

        context.apply(&SessionEvent::SignedIn(Session::signed_in("t1", "u1")));
        assert!(context.is_present());
        assert_eq!(context.session().user_id(), Some("u1"));

        context.apply(&SessionEvent::SignedOut);
        assert!(!context.is_present());
        assert_eq!(context.revision(), 2);
    }
}
