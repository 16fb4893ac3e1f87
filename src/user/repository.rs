//! Handle user records stored under the users key.

use std::sync::Arc;

use crate::run;
use crate::store::{self, KeyValueStore, keys};
use crate::user::User;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn KeyValueStore>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Every stored user, in insertion order.
    pub fn all(&self) -> Vec<User> {
        store::read_array(self.store.as_ref(), keys::USERS)
    }

    /// Find current user using `id` field.
    pub fn find_by_id(&self, user_id: &str) -> Option<User> {
        self.all().into_iter().find(|user| user.id == user_id)
    }

    /// Find current user using `correo` field, case-insensitively.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let normalized = email.trim().to_lowercase();
        self.all()
            .into_iter()
            .find(|user| user.correo.to_lowercase() == normalized)
    }

    /// Find current user by normalized RUN.
    pub fn find_by_run(&self, raw: &str) -> Option<User> {
        let normalized = run::sanitize(raw);
        self.all().into_iter().find(|user| user.run == normalized)
    }

    /// Insert or replace by `id`. An existing record keeps its original
    /// creation timestamp.
    pub fn save(&self, mut record: User) -> User {
        let mut users = self.all();

        match users.iter().position(|user| user.id == record.id) {
            Some(index) => {
                record.created_at = users[index].created_at;
                users[index] = record.clone();
            },
            None => users.push(record.clone()),
        }

        store::write_array(self.store.as_ref(), keys::USERS, &users);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::user::tests::sample;

    fn repository() -> UserRepository {
        UserRepository::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_save_then_find() {
        let repo = repository();
        let user = repo.save(sample());

        assert_eq!(repo.all().len(), 1);
        assert_eq!(repo.find_by_id("usr-test"), Some(user.clone()));
        assert_eq!(
            repo.find_by_email("  ELISA.CARRASCO@gmail.com "),
            Some(user.clone())
        );
        assert_eq!(repo.find_by_run("19.011.022-k"), Some(user));
        assert!(repo.find_by_id("usr-otro").is_none());
    }

    #[test]
    fn test_upsert_preserves_created_at() {
        let repo = repository();
        let original = repo.save(sample());

        let mut edited = original.clone();
        edited.direccion = "Nueva dirección 22".to_owned();
        edited.created_at = chrono::Utc::now();
        let saved = repo.save(edited);

        assert_eq!(saved.created_at, original.created_at);
        assert_eq!(repo.all().len(), 1);
        assert_eq!(
            repo.find_by_id("usr-test").map(|u| u.direccion),
            Some("Nueva dirección 22".to_owned())
        );
    }
}
