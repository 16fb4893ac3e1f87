//! Contact form.

use validator::ValidationErrors;

use super::{add_error, check_email, finish, messages};

#[derive(Clone, Debug, Default)]
pub struct ContactForm {
    pub nombre: String,
    pub correo: String,
    pub comentario: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let nombre = self.nombre.trim();
        if nombre.is_empty() {
            add_error(
                &mut errors,
                "nombre",
                "required",
                messages::required("El nombre"),
            );
        } else if nombre.chars().count() > 100 {
            add_error(
                &mut errors,
                "nombre",
                "max_length",
                messages::max_length("El nombre", 100),
            );
        }

        check_email(&mut errors, "correo", &self.correo);

        let comentario = self.comentario.trim();
        if comentario.is_empty() {
            add_error(
                &mut errors,
                "comentario",
                "required",
                messages::required("El comentario"),
            );
        } else if comentario.chars().count() > 500 {
            add_error(
                &mut errors,
                "comentario",
                "max_length",
                messages::max_length("El comentario", 500),
            );
        }

        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_contact_form() {
        let form = ContactForm {
            nombre: "Juan Pérez Soto".to_owned(),
            correo: "juan.perez@gmail.com".to_owned(),
            comentario: "¿Hacen despachos a Chiguayante?".to_owned(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_comment_cap() {
        let form = ContactForm {
            nombre: "Juan Pérez Soto".to_owned(),
            correo: "juan.perez@gmail.com".to_owned(),
            comentario: "x".repeat(501),
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field_errors()["comentario"][0].code, "max_length");
    }

    #[test]
    fn test_domain_gate_applies() {
        let form = ContactForm {
            nombre: "Juan Pérez Soto".to_owned(),
            correo: "juan@correo.org".to_owned(),
            comentario: "Hola".to_owned(),
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field_errors()["correo"][0].code, "email_domain");
    }
}
