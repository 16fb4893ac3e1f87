//! Region and comuna reference data access.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{self, KeyValueStore, keys};

/// Region with its fixed comuna list, as persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub region: String,
    pub comunas: Vec<String>,
}

/// Flattened comuna entry, kept under its own key for direct lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comuna {
    pub id: String,
    pub region_id: String,
    pub region_nombre: String,
    pub nombre: String,
}

/// Read access over the persisted reference lists.
#[derive(Clone)]
pub struct RegionDirectory {
    store: Arc<dyn KeyValueStore>,
}

impl RegionDirectory {
    /// Create a new [`RegionDirectory`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Vec<Region> {
        store::read_array(self.store.as_ref(), keys::REGIONS)
    }

    pub fn comunas(&self) -> Vec<Comuna> {
        store::read_array(self.store.as_ref(), keys::COMUNAS)
    }

    pub fn find(&self, id: &str) -> Option<Region> {
        self.all().into_iter().find(|region| region.id == id)
    }

    /// Whether `comuna` belongs to the region's fixed list.
    pub fn comuna_belongs(&self, region_id: &str, comuna: &str) -> bool {
        let comuna = comuna.trim().to_lowercase();
        self.find(region_id).is_some_and(|region| {
            region
                .comunas
                .iter()
                .any(|name| name.to_lowercase() == comuna)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::store::MemoryStore;

    fn directory() -> RegionDirectory {
        let store = Arc::new(MemoryStore::new());
        seed::init_local_data(store.as_ref(), true).unwrap();
        RegionDirectory::new(store)
    }

    #[test]
    fn test_find_and_membership() {
        let directory = directory();

        let biobio = directory.find("11").expect("seeded region");
        assert_eq!(biobio.region, "Región del Biobío");
        assert!(directory.comuna_belongs("11", "concepción"));
        assert!(!directory.comuna_belongs("11", "Santiago"));
        assert!(!directory.comuna_belongs("99", "Concepción"));
    }

    #[test]
    fn test_comunas_are_flattened_per_region() {
        let directory = directory();
        let comunas = directory.comunas();

        let total: usize =
            directory.all().iter().map(|r| r.comunas.len()).sum();
        assert_eq!(comunas.len(), total);
        assert!(
            comunas
                .iter()
                .all(|comuna| directory.find(&comuna.region_id).is_some())
        );
    }
}
