//! Form validation layer.
//!
//! Every validator is a pure function from form values (plus the persisted
//! context it must check against) to a field-keyed error map. There is no
//! whole-form failure: callers decide how to surface the map.

mod contact;
mod filters;
mod login;
mod user;

pub use contact::ContactForm;
pub use filters::{PriceFilterForm, sanitize_price_input};
pub use login::LoginForm;
pub use user::{
    FormMode, ResetPasswordForm, UserForm, UserValidationContext,
    validate_age,
};

use std::sync::LazyLock;

use regex_lite::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::policy::ALLOWED_EMAIL_DOMAINS;

pub(crate) static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Longest accepted email, shared by every form with an email field.
pub(crate) const MAX_EMAIL_LENGTH: usize = 100;

pub(crate) mod messages {
    use super::ALLOWED_EMAIL_DOMAINS;

    pub const EMAIL_FORMAT: &str = "El correo no tiene un formato válido";
    pub const DUPLICATE_EMAIL: &str = "El correo ya está registrado";
    pub const DUPLICATE_RUN: &str = "El RUN ya está registrado";
    pub const RUN_FORMAT: &str = "El RUN ingresado no es válido";
    pub const PASSWORD_LENGTH: &str =
        "La contraseña debe tener entre 4 y 10 caracteres";
    pub const PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden";
    pub const NEGATIVE_PRICE: &str = "El precio no puede ser negativo";
    pub const PRICE_ORDER: &str =
        "El precio mínimo no puede superar al máximo";
    pub const USER_NOT_FOUND: &str =
        "No existe una cuenta asociada al correo ingresado";
    pub const TERMS: &str = "Debes aceptar los términos y condiciones";
    pub const LETTERS_ONLY: &str = "Solo puede contener letras y espacios";
    pub const COMUNA_MEMBERSHIP: &str =
        "La comuna no pertenece a la región seleccionada";
    pub const INVALID_REGION: &str = "La región seleccionada no es válida";

    pub fn required(label: &str) -> String {
        format!("{label} es obligatorio")
    }

    pub fn max_length(label: &str, max: usize) -> String {
        format!("{label} no puede superar los {max} caracteres")
    }

    pub fn selection_required(label: &str) -> String {
        format!("Debes seleccionar una {label}")
    }

    pub fn age_restriction(min: u32) -> String {
        format!("Debes tener al menos {min} años")
    }

    /// Domain gate error naming the whole allow-list.
    pub fn email_domain() -> String {
        format!(
            "Solo se aceptan correos de los dominios: {}",
            ALLOWED_EMAIL_DOMAINS.join(", ")
        )
    }
}

pub(crate) fn add_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    code: &'static str,
    message: impl Into<String>,
) {
    errors.add(
        field,
        ValidationError::new(code).with_message(message.into().into()),
    );
}

pub(crate) fn finish(
    errors: ValidationErrors,
) -> Result<(), ValidationErrors> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Shared email chain: required, capped, well-formed, allow-listed domain.
/// Returns the trimmed value when every check passed.
pub(crate) fn check_email(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<String> {
    let email = value.trim();

    if email.is_empty() {
        add_error(errors, field, "required", messages::required("El correo"));
        return None;
    }
    if email.len() > MAX_EMAIL_LENGTH {
        add_error(
            errors,
            field,
            "max_length",
            messages::max_length("El correo", MAX_EMAIL_LENGTH),
        );
        return None;
    }
    if !EMAIL.is_match(email) {
        add_error(errors, field, "email_format", messages::EMAIL_FORMAT);
        return None;
    }
    if !crate::policy::domain_allowed(email) {
        add_error(errors, field, "email_domain", messages::email_domain());
        return None;
    }

    Some(email.to_owned())
}
