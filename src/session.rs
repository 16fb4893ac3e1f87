//! Active session pointer.
//!
//! The logged-in user is persisted as a whole record under its own key; it
//! is not transactional with the user list, so a profile edit must persist
//! the pointer again itself.

use std::sync::Arc;

use crate::store::{self, KeyValueStore, keys};
use crate::user::User;

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    /// Create a new [`SessionManager`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Currently logged-in user, if any.
    pub fn current(&self) -> Option<User> {
        store::read_item(self.store.as_ref(), keys::ACTIVE_USER)
    }

    /// Persist `user` as the active session.
    pub fn persist(&self, user: &User) {
        store::write_item(self.store.as_ref(), keys::ACTIVE_USER, user);
    }

    /// Drop the active session.
    pub fn clear(&self) {
        self.store.remove(keys::ACTIVE_USER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::user::tests::sample;

    #[test]
    fn test_session_lifecycle() {
        let session = SessionManager::new(Arc::new(MemoryStore::new()));
        assert!(session.current().is_none());

        let user = sample();
        session.persist(&user);
        assert_eq!(session.current(), Some(user));

        session.clear();
        assert!(session.current().is_none());
    }
}
