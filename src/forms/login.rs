//! Login form.

use validator::ValidationErrors;

use super::{add_error, check_email, finish, messages};

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Field checks only; credentials are verified separately so that both
    /// unknown email and wrong password fail the same way.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_email(&mut errors, "email", &self.email);

        let password = self.password.trim();
        if password.is_empty() {
            add_error(
                &mut errors,
                "password",
                "required",
                messages::required("La contraseña"),
            );
        } else if !(4..=10).contains(&password.chars().count()) {
            add_error(
                &mut errors,
                "password",
                "length",
                messages::PASSWORD_LENGTH,
            );
        }

        finish(errors)
    }
}
