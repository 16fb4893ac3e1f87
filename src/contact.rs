//! Contact message log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::forms::ContactForm;
use crate::store::{self, KeyValueStore, keys};

/// Submitted message as appended to the log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub nombre: String,
    pub correo: String,
    pub comentario: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only sink for contact submissions.
#[derive(Clone)]
pub struct ContactLog {
    store: Arc<dyn KeyValueStore>,
}

impl ContactLog {
    /// Create a new [`ContactLog`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Validate and append one message.
    pub fn submit(&self, form: &ContactForm) -> Result<ContactMessage> {
        form.validate()?;

        let message = ContactMessage {
            nombre: form.nombre.trim().to_owned(),
            correo: form.correo.trim().to_lowercase(),
            comentario: form.comentario.trim().to_owned(),
            created_at: Utc::now(),
        };

        store::append(
            self.store.as_ref(),
            keys::CONTACT_MESSAGES,
            message.clone(),
        );
        tracing::info!(correo = %message.correo, "contact message logged");

        Ok(message)
    }

    pub fn all(&self) -> Vec<ContactMessage> {
        store::read_array(self.store.as_ref(), keys::CONTACT_MESSAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_submit_appends_in_order() {
        let log = ContactLog::new(Arc::new(MemoryStore::new()));

        for comentario in ["primero", "segundo"] {
            log.submit(&ContactForm {
                nombre: "Juan Pérez".to_owned(),
                correo: "Juan.Perez@GMAIL.com".to_owned(),
                comentario: comentario.to_owned(),
            })
            .unwrap();
        }

        let messages = log.all();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].comentario, "primero");
        assert_eq!(messages[1].comentario, "segundo");
        assert_eq!(messages[0].correo, "juan.perez@gmail.com");
    }

    #[test]
    fn test_invalid_form_is_not_logged() {
        let log = ContactLog::new(Arc::new(MemoryStore::new()));
        let err = log
            .submit(&ContactForm {
                nombre: String::new(),
                correo: "juan@gmail.com".to_owned(),
                comentario: "hola".to_owned(),
            })
            .unwrap_err();

        assert!(err.field_errors().is_some());
        assert!(log.all().is_empty());
    }
}
