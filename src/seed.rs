//! First-run data bootstrap.
//!
//! Populates empty storage from the bundled seeds and repairs stored data
//! whose shape diverged from them. Runs at most once per process lifetime
//! unless forced.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde::Deserialize;

use crate::error::Result;
use crate::password;
use crate::policy::UserRole;
use crate::regions::{Comuna, Region};
use crate::store::{self, KeyValueStore, keys};
use crate::user::User;

const USERS_JSON: &str = include_str!("../data/usuarios.json");
const REGIONS_JSON: &str = include_str!("../data/region_comuna.json");

/// Avatar applied to seeded accounts that do not bring their own.
pub const DEFAULT_AVATAR: &str = "img/avatar_default.png";

static SEEDED: AtomicBool = AtomicBool::new(false);

/// Seed user as bundled: RUN body and check digit are still separate and the
/// password may be plain text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSeed {
    id: String,
    run: u64,
    dv: String,
    nombre: String,
    apellidos: String,
    correo: String,
    #[serde(default)]
    fecha_nacimiento: Option<chrono::NaiveDate>,
    tipo_usuario: UserRole,
    region_id: String,
    region_nombre: String,
    comuna: String,
    direccion: String,
    password: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    codigo_descuento: Option<String>,
}

impl UserSeed {
    fn into_record(self) -> User {
        let now = Utc::now();
        User {
            id: self.id,
            run: format!("{}{}", self.run, self.dv.to_uppercase()),
            nombre: self.nombre,
            apellidos: self.apellidos,
            correo: self.correo.to_lowercase(),
            fecha_nacimiento: self.fecha_nacimiento,
            tipo_usuario: self.tipo_usuario,
            region_id: self.region_id,
            region_nombre: self.region_nombre,
            comuna: self.comuna,
            direccion: self.direccion,
            password: password::ensure_hashed(&self.password),
            avatar_url: self
                .avatar_url
                .or_else(|| Some(DEFAULT_AVATAR.to_owned())),
            codigo_descuento: self.codigo_descuento,
            created_at: now,
            updated_at: now,
        }
    }
}

fn normalized_seed_regions() -> Result<Vec<Region>> {
    let raw: Vec<Region> = serde_json::from_str(REGIONS_JSON)?;

    Ok(raw
        .into_iter()
        .map(|region| Region {
            id: region.id,
            region: region.region.trim().to_owned(),
            comunas: region
                .comunas
                .iter()
                .map(|comuna| comuna.trim().to_owned())
                .filter(|comuna| !comuna.is_empty())
                .collect(),
        })
        .filter(|region| !region.region.is_empty())
        .collect())
}

fn build_comunas(regions: &[Region]) -> Vec<Comuna> {
    regions
        .iter()
        .flat_map(|region| {
            region.comunas.iter().map(|nombre| Comuna {
                id: format!("{}-{}", region.id, nombre),
                region_id: region.id.clone(),
                region_nombre: region.region.clone(),
                nombre: nombre.clone(),
            })
        })
        .collect()
}

fn seed_users(store: &dyn KeyValueStore) -> Result<()> {
    let users: Vec<User> = store::read_array(store, keys::USERS);

    if users.is_empty() {
        let seeds: Vec<UserSeed> = serde_json::from_str(USERS_JSON)?;
        let records: Vec<User> =
            seeds.into_iter().map(UserSeed::into_record).collect();

        tracing::info!(count = records.len(), "seeding default users");
        store::write_array(store, keys::USERS, &records);
        return Ok(());
    }

    // normalize any plain-text password left behind by older data.
    let sanitized: Vec<User> = users
        .iter()
        .cloned()
        .map(|mut user| {
            user.password = password::ensure_hashed(&user.password);
            user
        })
        .collect();

    if sanitized != users {
        tracing::info!("re-digesting stored user passwords");
        store::write_array(store, keys::USERS, &sanitized);
    }

    Ok(())
}

fn seed_regions(store: &dyn KeyValueStore, force: bool) -> Result<()> {
    let seed = normalized_seed_regions()?;
    let stored: Vec<Region> = store::read_array(store, keys::REGIONS);

    let should_reset = force
        || stored.len() != seed.len()
        || stored.iter().any(|region| {
            let counterpart =
                seed.iter().find(|entry| entry.id == region.id);
            match counterpart {
                Some(entry) => {
                    entry.comunas.len() != region.comunas.len()
                        || region.comunas.is_empty()
                },
                None => true,
            }
        });

    if should_reset {
        tracing::info!(count = seed.len(), "resetting region reference data");
        store::write_array(store, keys::REGIONS, &seed);
    }

    let effective = if should_reset { &seed } else { &stored };
    let stored_comunas: Vec<Comuna> = store::read_array(store, keys::COMUNAS);
    if force || should_reset || stored_comunas.is_empty() {
        store::write_array(store, keys::COMUNAS, &build_comunas(effective));
    }

    Ok(())
}

/// Populate storage from the bundled seeds.
///
/// Subsequent calls in the same process are no-ops unless `force` is set.
pub fn init_local_data(store: &dyn KeyValueStore, force: bool) -> Result<()> {
    if SEEDED.swap(true, Ordering::SeqCst) && !force {
        return Ok(());
    }

    seed_users(store)?;
    seed_regions(store, force)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_seed_populates_empty_store() {
        let store = MemoryStore::new();
        init_local_data(&store, true).unwrap();

        let users: Vec<User> = store::read_array(&store, keys::USERS);
        assert!(!users.is_empty());
        // RUN bodies are merged with their check digit and uppercased.
        assert!(users.iter().any(|u| u.run == "19011022K"));
        // passwords are digests, never plain text.
        assert!(users.iter().all(|u| u.password.len() == 64));
        assert!(users.iter().all(|u| u.avatar_url.is_some()));

        let regions: Vec<Region> = store::read_array(&store, keys::REGIONS);
        assert_eq!(regions.len(), 16);
        let comunas: Vec<Comuna> = store::read_array(&store, keys::COMUNAS);
        assert_eq!(
            comunas.len(),
            regions.iter().map(|r| r.comunas.len()).sum::<usize>()
        );
    }

    #[test]
    fn test_existing_users_are_kept_but_redigested() {
        let store = MemoryStore::new();
        init_local_data(&store, true).unwrap();

        let mut users: Vec<User> = store::read_array(&store, keys::USERS);
        users.truncate(1);
        users[0].password = "texto-plano".to_owned();
        store::write_array(&store, keys::USERS, &users);

        init_local_data(&store, true).unwrap();
        let users: Vec<User> = store::read_array(&store, keys::USERS);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].password, password::hash("texto-plano"));
    }

    #[test]
    fn test_diverged_regions_are_reset_wholesale() {
        let store = MemoryStore::new();
        init_local_data(&store, true).unwrap();

        let mut regions: Vec<Region> = store::read_array(&store, keys::REGIONS);
        regions[0].comunas.pop();
        store::write_array(&store, keys::REGIONS, &regions);

        init_local_data(&store, true).unwrap();
        let repaired: Vec<Region> = store::read_array(&store, keys::REGIONS);
        assert_eq!(repaired, normalized_seed_regions().unwrap());
    }
}
