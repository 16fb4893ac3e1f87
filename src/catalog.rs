//! Bundled product catalog.
//!
//! Read-only at runtime: products and categories come from the JSON dataset
//! compiled into the crate and are never mutated.

use serde::{Deserialize, Serialize};

use crate::error::Result;

const CATALOG_JSON: &str = include_str!("../data/catalogo.json");

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Catalog {
    pub categorias: Vec<Category>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Category {
    pub id: u32,
    pub nombre: String,
    pub productos: Vec<Product>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Product {
    pub codigo: String,
    pub nombre: String,
    pub descripcion: String,
    /// Unit price in CLP.
    pub precio: u32,
    /// Ceiling that every cart mutation must respect.
    pub stock: u32,
    pub imagen: Option<String>,
}

/// Sort orders offered by the menu page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

/// Menu filter values. `None` fields leave that dimension unfiltered.
#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    pub categoria: Option<u32>,
    pub codigo: Option<String>,
    pub precio_min: Option<u32>,
    pub precio_max: Option<u32>,
    pub orden: SortOrder,
}

impl Catalog {
    /// Parse the bundled dataset.
    pub fn bundled() -> Result<Self> {
        Ok(serde_json::from_str(CATALOG_JSON)?)
    }

    /// Every product across categories.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.categorias
            .iter()
            .flat_map(|categoria| categoria.productos.iter())
    }

    /// Case-insensitive lookup by product code.
    pub fn find(&self, codigo: &str) -> Option<&Product> {
        self.products()
            .find(|product| product.codigo.eq_ignore_ascii_case(codigo.trim()))
    }

    /// Category owning a product code, if any.
    pub fn category_of(&self, codigo: &str) -> Option<&Category> {
        self.categorias.iter().find(|categoria| {
            categoria
                .productos
                .iter()
                .any(|product| product.codigo.eq_ignore_ascii_case(codigo.trim()))
        })
    }

    /// Filter and sort products for the menu listing.
    pub fn search(&self, filter: &ProductFilter) -> Vec<&Product> {
        let mut items: Vec<(&Category, &Product)> = self
            .categorias
            .iter()
            .flat_map(|categoria| {
                categoria.productos.iter().map(move |p| (categoria, p))
            })
            .collect();

        if let Some(categoria) = filter.categoria {
            items.retain(|(c, _)| c.id == categoria);
        }
        if let Some(codigo) = &filter.codigo {
            items.retain(|(_, p)| p.codigo.eq_ignore_ascii_case(codigo));
        }
        if let Some(min) = filter.precio_min {
            items.retain(|(_, p)| p.precio >= min);
        }
        if let Some(max) = filter.precio_max {
            items.retain(|(_, p)| p.precio <= max);
        }

        let mut products: Vec<&Product> = items.into_iter().map(|(_, p)| p).collect();
        match filter.orden {
            SortOrder::NameAsc => {
                products.sort_by_key(|p| p.nombre.to_lowercase());
            },
            SortOrder::NameDesc => {
                products.sort_by_key(|p| std::cmp::Reverse(p.nombre.to_lowercase()));
            },
            SortOrder::PriceAsc => products.sort_by_key(|p| p.precio),
            SortOrder::PriceDesc => {
                products.sort_by_key(|p| std::cmp::Reverse(p.precio));
            },
        }

        products
    }
}
