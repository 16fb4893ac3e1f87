//! User account orchestration.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{Result, StorefrontError};
use crate::forms::{FormMode, LoginForm, ResetPasswordForm, UserForm, UserValidationContext};
use crate::password;
use crate::policy;
use crate::regions::RegionDirectory;
use crate::run;
use crate::store::KeyValueStore;
use crate::user::{User, UserRepository};

/// User manager: registration, profile updates, authentication.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    regions: RegionDirectory,
    minimum_age: u32,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(store: Arc<dyn KeyValueStore>, minimum_age: u32) -> Self {
        Self {
            repo: UserRepository::new(Arc::clone(&store)),
            regions: RegionDirectory::new(store),
            minimum_age,
        }
    }

    pub fn repository(&self) -> &UserRepository {
        &self.repo
    }

    /// Register a new account. The role is derived from the email domain
    /// here, once, and stored with the record.
    pub fn register(&self, form: &UserForm) -> Result<User> {
        self.validate(form, FormMode::Create)?;

        let now = Utc::now();
        let correo = form.correo.trim().to_lowercase();
        let record = User {
            id: form
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            run: run::sanitize(&form.run),
            nombre: form.nombre.trim().to_owned(),
            apellidos: form.apellidos.trim().to_owned(),
            tipo_usuario: policy::assign_role(&correo),
            correo,
            fecha_nacimiento: parse_birth_date(&form.fecha_nacimiento),
            region_id: form.region_id.trim().to_owned(),
            region_nombre: self.region_name(&form.region_id),
            comuna: form.comuna.trim().to_owned(),
            direccion: form.direccion.trim().to_owned(),
            password: password::hash(&form.password),
            avatar_url: None,
            codigo_descuento: None,
            created_at: now,
            updated_at: now,
        };

        let saved = self.repo.save(record);
        tracing::info!(user_id = %saved.id, role = %saved.tipo_usuario, "user registered");
        Ok(saved)
    }

    /// Apply a profile edit to an existing record. The stored role is always
    /// carried forward; protected accounts also keep their RUN.
    pub fn update_profile(&self, form: &UserForm) -> Result<User> {
        let id = form
            .id
            .clone()
            .ok_or_else(|| StorefrontError::UnknownUser(String::new()))?;
        let current = self
            .repo
            .find_by_id(&id)
            .ok_or_else(|| StorefrontError::UnknownUser(id.clone()))?;

        self.validate(form, FormMode::Update)?;

        let requested_run = run::sanitize(&form.run);
        if current.tipo_usuario.is_protected() && requested_run != current.run {
            return Err(StorefrontError::ProtectedAccount);
        }

        let password = form.password.trim();
        let record = User {
            id: current.id.clone(),
            run: requested_run,
            nombre: form.nombre.trim().to_owned(),
            apellidos: form.apellidos.trim().to_owned(),
            correo: form.correo.trim().to_lowercase(),
            fecha_nacimiento: parse_birth_date(&form.fecha_nacimiento)
                .or(current.fecha_nacimiento),
            tipo_usuario: current.tipo_usuario,
            region_id: form.region_id.trim().to_owned(),
            region_nombre: self.region_name(&form.region_id),
            comuna: form.comuna.trim().to_owned(),
            direccion: form.direccion.trim().to_owned(),
            password: if password.is_empty() {
                current.password.clone()
            } else {
                password::hash(password)
            },
            avatar_url: current.avatar_url.clone(),
            codigo_descuento: current.codigo_descuento.clone(),
            created_at: current.created_at,
            updated_at: Utc::now(),
        };

        let saved = self.repo.save(record);
        tracing::info!(user_id = %saved.id, "profile updated");
        Ok(saved)
    }

    /// Verify credentials. Unknown email and wrong password both map to the
    /// same generic error.
    pub fn authenticate(&self, form: &LoginForm) -> Result<User> {
        form.validate()?;

        let user = self
            .repo
            .find_by_email(&form.email)
            .ok_or(StorefrontError::InvalidCredentials)?;

        if !password::matches(form.password.trim(), &user.password) {
            return Err(StorefrontError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "credentials accepted");
        Ok(user)
    }

    /// Replace the password of an existing account.
    pub fn reset_password(&self, form: &ResetPasswordForm) -> Result<User> {
        form.validate(&self.repo.all())?;

        let mut user = self
            .repo
            .find_by_email(&form.email)
            .ok_or(StorefrontError::InvalidCredentials)?;
        user.password = password::hash(&form.password);
        user.updated_at = Utc::now();

        let saved = self.repo.save(user);
        tracing::info!(user_id = %saved.id, "password reset");
        Ok(saved)
    }

    fn validate(&self, form: &UserForm, mode: FormMode) -> Result<()> {
        let users = self.repo.all();
        let regions = self.regions.all();
        let ctx = UserValidationContext {
            users: &users,
            regions: &regions,
            minimum_age: self.minimum_age,
        };

        Ok(form.validate(mode, &ctx)?)
    }

    fn region_name(&self, region_id: &str) -> String {
        self.regions
            .find(region_id.trim())
            .map(|region| region.region)
            .unwrap_or_else(|| region_id.trim().to_owned())
    }
}

fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
