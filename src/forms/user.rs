//! Registration / profile-update form and the password-reset form.

use chrono::{NaiveDate, Utc};
use validator::ValidationErrors;

use super::{add_error, check_email, finish, messages};
use crate::regions::Region;
use crate::run;
use crate::user::{User, years_between};

/// Whether the form creates an account or edits an existing one. Update mode
/// relaxes the password rules: blank means "leave unchanged".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// Persisted context the validator checks against.
pub struct UserValidationContext<'a> {
    pub users: &'a [User],
    pub regions: &'a [Region],
    pub minimum_age: u32,
}

#[derive(Clone, Debug, Default)]
pub struct UserForm {
    /// Present when editing; excludes the record from uniqueness checks.
    pub id: Option<String>,
    pub run: String,
    pub nombre: String,
    pub apellidos: String,
    pub correo: String,
    /// ISO date or empty for "not provided".
    pub fecha_nacimiento: String,
    pub region_id: String,
    pub comuna: String,
    pub direccion: String,
    pub password: String,
    pub confirm_password: String,
    /// Only checked in create mode.
    pub acepta_terminos: bool,
}

/// `true` when the optional date is absent, or present and at least
/// `min_age` whole years in the past. An unparseable date fails.
pub fn validate_age(value: &str, min_age: u32) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }

    let Ok(born) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") else {
        return false;
    };

    years_between(born, Utc::now().date_naive()) >= min_age as i32
}

impl UserForm {
    pub fn validate(
        &self,
        mode: FormMode,
        ctx: &UserValidationContext,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        self.check_run(&mut errors, ctx);
        check_name(&mut errors, "nombre", "El nombre", &self.nombre, 50);
        check_name(
            &mut errors,
            "apellidos",
            "Los apellidos",
            &self.apellidos,
            100,
        );
        self.check_correo(&mut errors, ctx);
        self.check_fecha_nacimiento(&mut errors, ctx);
        self.check_address(&mut errors, ctx);
        self.check_password(&mut errors, mode);

        if mode == FormMode::Create && !self.acepta_terminos {
            add_error(&mut errors, "terminos", "terms", messages::TERMS);
        }

        finish(errors)
    }

    fn check_run(&self, errors: &mut ValidationErrors, ctx: &UserValidationContext) {
        let value = self.run.trim();
        if value.is_empty() {
            add_error(errors, "run", "required", messages::required("El RUN"));
            return;
        }
        if !run::is_valid(value) {
            add_error(errors, "run", "run_format", messages::RUN_FORMAT);
            return;
        }

        // a valid RUN identifies exactly one account.
        let normalized = run::sanitize(value);
        let duplicated = ctx.users.iter().any(|user| {
            user.run == normalized && Some(&user.id) != self.id.as_ref()
        });
        if duplicated {
            add_error(errors, "run", "duplicate_run", messages::DUPLICATE_RUN);
        }
    }

    fn check_correo(&self, errors: &mut ValidationErrors, ctx: &UserValidationContext) {
        let Some(email) = check_email(errors, "correo", &self.correo) else {
            return;
        };

        let normalized = email.to_lowercase();
        let duplicated = ctx.users.iter().any(|user| {
            user.correo.to_lowercase() == normalized
                && Some(&user.id) != self.id.as_ref()
        });
        if duplicated {
            add_error(
                errors,
                "correo",
                "duplicate_email",
                messages::DUPLICATE_EMAIL,
            );
        }
    }

    fn check_fecha_nacimiento(
        &self,
        errors: &mut ValidationErrors,
        ctx: &UserValidationContext,
    ) {
        if !self.fecha_nacimiento.trim().is_empty()
            && !validate_age(&self.fecha_nacimiento, ctx.minimum_age)
        {
            add_error(
                errors,
                "fechaNacimiento",
                "age_restriction",
                messages::age_restriction(ctx.minimum_age),
            );
        }
    }

    fn check_address(&self, errors: &mut ValidationErrors, ctx: &UserValidationContext) {
        let region_id = self.region_id.trim();
        let region = ctx.regions.iter().find(|region| region.id == region_id);

        if region_id.is_empty() {
            add_error(
                errors,
                "regionId",
                "selection_required",
                messages::selection_required("región"),
            );
        } else if region.is_none() {
            add_error(
                errors,
                "regionId",
                "invalid_region",
                messages::INVALID_REGION,
            );
        }

        let comuna = self.comuna.trim();
        if comuna.is_empty() {
            add_error(
                errors,
                "comuna",
                "selection_required",
                messages::selection_required("comuna"),
            );
        } else if let Some(region) = region {
            let target = comuna.to_lowercase();
            let belongs = region
                .comunas
                .iter()
                .any(|name| name.to_lowercase() == target);
            if !belongs {
                add_error(
                    errors,
                    "comuna",
                    "comuna_membership",
                    messages::COMUNA_MEMBERSHIP,
                );
            }
        }

        let direccion = self.direccion.trim();
        if direccion.is_empty() {
            add_error(
                errors,
                "direccion",
                "required",
                messages::required("La dirección"),
            );
        } else if direccion.chars().count() > 300 {
            add_error(
                errors,
                "direccion",
                "max_length",
                messages::max_length("La dirección", 300),
            );
        }
    }

    fn check_password(&self, errors: &mut ValidationErrors, mode: FormMode) {
        let password = self.password.trim();
        let confirm = self.confirm_password.trim();
        let length_ok = (4..=10).contains(&password.chars().count());

        match mode {
            FormMode::Create => {
                if password.is_empty() {
                    add_error(
                        errors,
                        "password",
                        "required",
                        messages::required("La contraseña"),
                    );
                } else if !length_ok {
                    add_error(
                        errors,
                        "password",
                        "length",
                        messages::PASSWORD_LENGTH,
                    );
                }

                if confirm.is_empty() {
                    add_error(
                        errors,
                        "confirmPassword",
                        "required",
                        messages::required("La confirmación de contraseña"),
                    );
                } else if !password.is_empty() && password != confirm {
                    add_error(
                        errors,
                        "confirmPassword",
                        "mismatch",
                        messages::PASSWORD_MISMATCH,
                    );
                }
            },
            FormMode::Update => {
                if !password.is_empty() {
                    if !length_ok {
                        add_error(
                            errors,
                            "password",
                            "length",
                            messages::PASSWORD_LENGTH,
                        );
                    }
                    if !confirm.is_empty() && password != confirm {
                        add_error(
                            errors,
                            "confirmPassword",
                            "mismatch",
                            messages::PASSWORD_MISMATCH,
                        );
                    }
                }
            },
        }
    }
}

/// Reset-password form: the account must exist, the new password must be
/// confirmed.
#[derive(Clone, Debug, Default)]
pub struct ResetPasswordForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self, users: &[User]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(email) = check_email(&mut errors, "email", &self.email) {
            let normalized = email.to_lowercase();
            let known = users
                .iter()
                .any(|user| user.correo.to_lowercase() == normalized);
            if !known {
                add_error(
                    &mut errors,
                    "email",
                    "user_not_found",
                    messages::USER_NOT_FOUND,
                );
            }
        }

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

        let confirm = self.confirm_password.trim();
        if confirm.is_empty() {
            add_error(
                &mut errors,
                "confirmPassword",
                "required",
                messages::required("La confirmación de contraseña"),
            );
        } else if !password.is_empty() && password != confirm {
            add_error(
                &mut errors,
                "confirmPassword",
                "mismatch",
                messages::PASSWORD_MISMATCH,
            );
        }

        finish(errors)
    }
}

fn check_name(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) {
    let value = value.trim();
    if value.is_empty() {
        add_error(errors, field, "required", messages::required(label));
    } else if value.chars().count() > max {
        add_error(
            errors,
            field,
            "max_length",
            messages::max_length(label, max),
        );
    } else if !value.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        add_error(errors, field, "letters_only", messages::LETTERS_ONLY);
    }
}
