//! Key-value persistence layer.
//!
//! Every stored value is a JSON document under a string key. Reads that hit
//! a missing or unreadable value fall back to the empty/default case and are
//! only logged; they never surface to callers.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Keys shared by every storefront instance.
pub mod keys {
    /// Registered user records.
    pub const USERS: &str = "dataUsuarios";
    /// Region reference list.
    pub const REGIONS: &str = "dataRegiones";
    /// Flattened comuna reference list.
    pub const COMUNAS: &str = "dataComunas";
    /// Currently logged-in user record.
    pub const ACTIVE_USER: &str = "usuarioActivo";
    /// Log of submitted contact messages.
    pub const CONTACT_MESSAGES: &str = "contactMessages";
    /// Cart entries.
    pub const CART: &str = "carrito";
    /// Draft custom messages, keyed by product code.
    pub const CART_MESSAGES: &str = "mensajesCarrito";
    /// UI theme preference.
    pub const THEME: &str = "temaPreferido";
}

/// Shared key-value contract. Values are JSON strings; writes replace the
/// whole value (last writer wins, no merge).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

fn safe_parse<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored value is not readable, falling back");
            None
        },
    }
}

fn serialize<T: Serialize>(key: &str, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(raw) => Some(raw),
        Err(err) => {
            tracing::error!(key, error = %err, "value cannot be serialized, skipping write");
            None
        },
    }
}

/// Read an array under `key`, falling back to empty.
pub fn read_array<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    safe_parse(key, store.get(key)).unwrap_or_default()
}

/// Replace the array under `key`.
pub fn write_array<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    if let Some(raw) = serialize(key, &items) {
        store.set(key, raw);
    }
}

/// Append one item to the array under `key`.
pub fn append<T: Serialize + DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    item: T,
) {
    let mut items = read_array::<T>(store, key);
    items.push(item);
    write_array(store, key, &items);
}

/// Read a single object under `key`.
pub fn read_item<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    safe_parse(key, store.get(key))
}

/// Replace the single object under `key`.
pub fn write_item<T: Serialize>(store: &dyn KeyValueStore, key: &str, item: &T) {
    if let Some(raw) = serialize(key, item) {
        store.set(key, raw);
    }
}
