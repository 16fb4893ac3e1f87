//! Error handler for the storefront core.

use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Enum representing storefront errors.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Field-keyed validation failures, surfaced inline per form field.
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    /// Deliberately generic: never discloses whether the email or the
    /// password was wrong.
    #[error("Correo o contraseña incorrectos")]
    InvalidCredentials,

    /// RUN and role of a protected account are immutable.
    #[error("protected account cannot change its RUN or role")]
    ProtectedAccount,

    #[error("no user record for id `{0}`")]
    UnknownUser(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("bundled dataset is not readable: {0}")]
    Data(#[from] serde_json::Error),
}

impl StorefrontError {
    /// Field errors of a [`StorefrontError::Validation`], if any.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            StorefrontError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
