//! UI preferences.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{self, KeyValueStore, keys};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    /// Create a new [`Preferences`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored theme, defaulting to light.
    pub fn theme(&self) -> Theme {
        store::read_item(self.store.as_ref(), keys::THEME).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        store::write_item(self.store.as_ref(), keys::THEME, &theme);
    }
}
