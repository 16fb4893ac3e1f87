//! JSON-file-backed store.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use super::KeyValueStore;

/// Durable key-value map persisted as one JSON object. The whole map is
/// rewritten on every mutation, mirroring the wholesale write semantics of
/// the storage it models. Writes are attempted once; a failed flush is
/// logged and not retried.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open `path`, loading existing entries. A missing file starts empty;
    /// an unreadable one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "storage file is not readable, starting empty");
                    HashMap::new()
                },
            },
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(error = %err, "storage map cannot be serialized");
                return;
            },
        };

        if let Err(err) = std::fs::write(&self.path, raw) {
            tracing::error!(path = %self.path.display(), error = %err, "storage flush failed");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
        entries.insert(key.to_owned(), value);
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
        if entries.remove(key).is_some() {
            self.flush(&entries);
        }
    }
}
