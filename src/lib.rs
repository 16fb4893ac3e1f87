//! Mil Sabores is the storefront core for a bakery e-commerce site:
//! catalog browsing, a client-persisted cart, and account management over an
//! injected key-value store.

#![forbid(unsafe_code)]
#![deny(unused_mut)]

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod error;
pub mod forms;
pub mod password;
pub mod policy;
pub mod prefs;
pub mod regions;
pub mod run;
pub mod seed;
pub mod session;
pub mod store;
pub mod user;

pub mod config;

use std::sync::Arc;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::config::Configuration;
use crate::contact::ContactLog;
use crate::error::Result;
use crate::forms::LoginForm;
use crate::prefs::Preferences;
use crate::regions::RegionDirectory;
use crate::session::SessionManager;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::user::{User, UserService};

/// Shared state: configuration, the storage backend, and the read-only
/// catalog.
#[derive(Clone)]
pub struct Storefront {
    pub config: Arc<Configuration>,
    pub store: Arc<dyn KeyValueStore>,
    pub catalog: Catalog,
}

impl Storefront {
    /// Initialize against the storage named by the configuration: a file
    /// store when one is configured, otherwise an in-process store. Seeds
    /// empty storage on the way.
    pub fn open(config: Arc<Configuration>) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.storage {
            Some(storage) => Arc::new(FileStore::open(&storage.path)?),
            None => Arc::new(MemoryStore::new()),
        };

        Self::with_store(config, store)
    }

    /// Initialize over an injected store.
    pub fn with_store(
        config: Arc<Configuration>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        seed::init_local_data(store.as_ref(), false)?;

        Ok(Self {
            config,
            store,
            catalog: Catalog::bundled()?,
        })
    }

    /// Re-run the seed bootstrap regardless of the process-lifetime guard.
    pub fn reseed(&self) -> Result<()> {
        seed::init_local_data(self.store.as_ref(), true)
    }

    pub fn users(&self) -> UserService {
        UserService::new(Arc::clone(&self.store), self.config.minimum_age)
    }

    pub fn regions(&self) -> RegionDirectory {
        RegionDirectory::new(Arc::clone(&self.store))
    }

    pub fn cart(&self) -> Cart {
        Cart::new(Arc::clone(&self.store))
    }

    pub fn session(&self) -> SessionManager {
        SessionManager::new(Arc::clone(&self.store))
    }

    pub fn contact(&self) -> ContactLog {
        ContactLog::new(Arc::clone(&self.store))
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::new(Arc::clone(&self.store))
    }

    /// Authenticate and persist the session pointer.
    pub fn login(&self, form: &LoginForm) -> Result<User> {
        let user = self.users().authenticate(form)?;
        self.session().persist(&user);
        Ok(user)
    }

    pub fn logout(&self) {
        self.session().clear();
    }

    /// Save a profile edit and refresh the session pointer when it belongs
    /// to the logged-in user. The two writes are separate; there is no
    /// transaction spanning them.
    pub fn save_profile(&self, form: &forms::UserForm) -> Result<User> {
        let updated = self.users().update_profile(form)?;

        let session = self.session();
        if session
            .current()
            .is_some_and(|active| active.id == updated.id)
        {
            session.persist(&updated);
        }

        Ok(updated)
    }
}
