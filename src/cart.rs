//! Shopping cart reconciliation.
//!
//! The cart is a flat entry list read and rewritten wholesale on every
//! change. Entries sharing a product code may coexist when their custom
//! messages differ; the stock ceiling always applies to the per-code sum.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::store::{self, KeyValueStore, keys};

/// Longest accepted custom message.
pub const MAX_MESSAGE_LENGTH: usize = 25;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub codigo: String,
    pub cantidad: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    // denormalized for display.
    pub nombre: String,
    pub precio: u32,
}

impl CartItem {
    fn matches(&self, codigo: &str, mensaje: Option<&str>) -> bool {
        self.codigo.eq_ignore_ascii_case(codigo)
            && self.mensaje.as_deref() == mensaje
    }
}

/// Outcome of an add: how much of the request survived the stock clamp.
/// `added == 0` means the code was already at its ceiling and nothing was
/// written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Addition {
    pub requested: u32,
    pub added: u32,
}

impl Addition {
    pub fn is_out_of_stock(&self) -> bool {
        self.added == 0
    }

    pub fn clamped(&self) -> bool {
        self.added < self.requested
    }
}

#[derive(Clone)]
pub struct Cart {
    store: Arc<dyn KeyValueStore>,
}

impl Cart {
    /// Create a new [`Cart`] over the shared store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn items(&self) -> Vec<CartItem> {
        store::read_array(self.store.as_ref(), keys::CART)
    }

    /// Sum of quantities across every entry with this product code.
    pub fn total_for_code(&self, codigo: &str) -> u32 {
        self.items()
            .iter()
            .filter(|item| item.codigo.eq_ignore_ascii_case(codigo))
            .map(|item| item.cantidad)
            .sum()
    }

    /// Order total in CLP.
    pub fn total_amount(&self) -> u64 {
        self.items()
            .iter()
            .map(|item| u64::from(item.cantidad) * u64::from(item.precio))
            .sum()
    }

    /// Merge `cantidad` units into the cart without ever letting the
    /// per-code sum exceed `product.stock`. A best-effort clamp, not a
    /// reservation.
    pub fn add(
        &self,
        product: &Product,
        cantidad: u32,
        mensaje: Option<&str>,
    ) -> Addition {
        let requested = cantidad;
        let mensaje = normalize_message(mensaje);
        let mut items = self.items();

        let total: u32 = items
            .iter()
            .filter(|item| item.codigo.eq_ignore_ascii_case(&product.codigo))
            .map(|item| item.cantidad)
            .sum();

        let position = items.iter().position(|item| {
            item.matches(&product.codigo, mensaje.as_deref())
        });

        let added = match position {
            Some(index) => {
                // ceiling excluding this entry's own quantity.
                let others = total - items[index].cantidad;
                let ceiling = product.stock.saturating_sub(others);
                let next =
                    items[index].cantidad.saturating_add(requested).min(ceiling);
                let added = next.saturating_sub(items[index].cantidad);
                if added > 0 {
                    items[index].cantidad = next;
                }
                added
            },
            None => {
                let remaining = product.stock.saturating_sub(total);
                let added = requested.min(remaining);
                if added > 0 {
                    items.push(CartItem {
                        codigo: product.codigo.clone(),
                        cantidad: added,
                        mensaje,
                        nombre: product.nombre.clone(),
                        precio: product.precio,
                    });
                }
                added
            },
        };

        if added > 0 {
            store::write_array(self.store.as_ref(), keys::CART, &items);
        } else {
            tracing::debug!(codigo = %product.codigo, stock = product.stock, "add rejected, code at stock ceiling");
        }

        Addition { requested, added }
    }

    /// Set the quantity of one entry, clamped so the per-code sum stays
    /// under the ceiling. Zero removes the entry.
    pub fn set_quantity(
        &self,
        product: &Product,
        mensaje: Option<&str>,
        cantidad: u32,
    ) {
        let mensaje = normalize_message(mensaje);
        let mut items = self.items();
        let Some(index) = items.iter().position(|item| {
            item.matches(&product.codigo, mensaje.as_deref())
        }) else {
            return;
        };

        if cantidad == 0 {
            items.remove(index);
        } else {
            let others: u32 = items
                .iter()
                .enumerate()
                .filter(|(i, item)| {
                    *i != index
                        && item.codigo.eq_ignore_ascii_case(&product.codigo)
                })
                .map(|(_, item)| item.cantidad)
                .sum();
            items[index].cantidad =
                cantidad.min(product.stock.saturating_sub(others));
        }

        store::write_array(self.store.as_ref(), keys::CART, &items);
    }

    /// Drop one entry.
    pub fn remove(&self, codigo: &str, mensaje: Option<&str>) {
        let mensaje = normalize_message(mensaje);
        let mut items = self.items();
        items.retain(|item| !item.matches(codigo, mensaje.as_deref()));
        store::write_array(self.store.as_ref(), keys::CART, &items);
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.store.remove(keys::CART);
    }

    /// Apply (or, with an empty message, clear) the custom message on every
    /// entry sharing `codigo`.
    pub fn apply_message(&self, codigo: &str, mensaje: &str) {
        let mut items = self.items();
        if items.is_empty() {
            return;
        }

        let mensaje = normalize_message(Some(mensaje));
        for item in items
            .iter_mut()
            .filter(|item| item.codigo.eq_ignore_ascii_case(codigo))
        {
            item.mensaje = mensaje.clone();
        }

        store::write_array(self.store.as_ref(), keys::CART, &items);
    }

    /// Draft message saved for a product, if any.
    pub fn draft_message(&self, codigo: &str) -> Option<String> {
        let drafts: std::collections::HashMap<String, String> =
            store::read_item(self.store.as_ref(), keys::CART_MESSAGES)
                .unwrap_or_default();
        drafts.get(codigo).cloned()
    }

    /// Persist a draft message for a product; empty removes the draft.
    pub fn save_draft_message(&self, codigo: &str, mensaje: &str) {
        let mut drafts: std::collections::HashMap<String, String> =
            store::read_item(self.store.as_ref(), keys::CART_MESSAGES)
                .unwrap_or_default();

        match normalize_message(Some(mensaje)) {
            Some(mensaje) => {
                drafts.insert(codigo.to_owned(), mensaje);
            },
            None => {
                drafts.remove(codigo);
            },
        }

        store::write_item(self.store.as_ref(), keys::CART_MESSAGES, &drafts);
    }
}

/// Trim, cap at [`MAX_MESSAGE_LENGTH`] characters, map blank to `None`.
fn normalize_message(mensaje: Option<&str>) -> Option<String> {
    let mensaje = mensaje?.trim();
    if mensaje.is_empty() {
        return None;
    }

    Some(mensaje.chars().take(MAX_MESSAGE_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn cart() -> Cart {
        Cart::new(Arc::new(MemoryStore::new()))
    }

    fn product(stock: u32) -> Product {
        Product {
            codigo: "TC001".to_owned(),
            nombre: "Torta Cuadrada de Chocolate".to_owned(),
            descripcion: String::new(),
            precio: 45000,
            stock,
            imagen: None,
        }
    }

    #[test]
    fn test_add_over_stock_clamps_to_ceiling() {
        let cart = cart();
        let addition = cart.add(&product(3), 5, None);

        assert_eq!(addition, Addition { requested: 5, added: 3 });
        assert!(addition.clamped());

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].cantidad, 3);
    }

    #[test]
    fn test_repeated_adds_never_exceed_stock() {
        let cart = cart();
        let product = product(4);

        for _ in 0..10 {
            cart.add(&product, 1, None);
        }

        assert_eq!(cart.total_for_code("tc001"), 4);
        let rejected = cart.add(&product, 1, None);
        assert!(rejected.is_out_of_stock());
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_message_variants_share_the_ceiling() {
        let cart = cart();
        let product = product(5);

        cart.add(&product, 2, None);
        cart.add(&product, 2, Some("Feliz cumpleaños, Marta!"));
        // 4 of 5 used; only one more unit fits, in either variant.
        let addition = cart.add(&product, 3, Some("Feliz cumpleaños, Marta!"));

        assert_eq!(addition.added, 1);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total_for_code("TC001"), 5);
    }

    #[test]
    fn test_full_cart_writes_nothing_new() {
        let cart = cart();
        let product = product(2);
        cart.add(&product, 2, None);

        let before = cart.items();
        let addition = cart.add(&product, 1, Some("otro mensaje"));
        assert!(addition.is_out_of_stock());
        assert_eq!(cart.items(), before);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let cart = cart();
        let product = product(10);
        cart.add(&product, 4, None);

        cart.set_quantity(&product, None, 7);
        assert_eq!(cart.total_for_code("TC001"), 7);

        // clamped against the ceiling.
        cart.set_quantity(&product, None, 25);
        assert_eq!(cart.total_for_code("TC001"), 10);

        cart.set_quantity(&product, None, 0);
        assert!(cart.items().is_empty());

        cart.add(&product, 1, None);
        cart.remove("TC001", None);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_total_amount() {
        let cart = cart();
        cart.add(&product(10), 2, None);
        assert_eq!(cart.total_amount(), 90000);
    }

    #[test]
    fn test_apply_message_touches_every_entry_of_code() {
        let cart = cart();
        let product = product(10);
        cart.add(&product, 1, None);
        cart.add(&product, 1, Some("borrador"));

        cart.apply_message("tc001", "Para Pedro");
        assert!(
            cart.items()
                .iter()
                .all(|item| item.mensaje.as_deref() == Some("Para Pedro"))
        );

        cart.apply_message("tc001", "  ");
        assert!(cart.items().iter().all(|item| item.mensaje.is_none()));
    }

    #[test]
    fn test_draft_messages_round_trip() {
        let cart = cart();
        assert_eq!(cart.draft_message("TC001"), None);

        cart.save_draft_message("TC001", "Feliz cumpleaños, Marta!");
        assert_eq!(
            cart.draft_message("TC001").as_deref(),
            Some("Feliz cumpleaños, Marta!")
        );

        // capped at 25 characters.
        cart.save_draft_message("TC001", "Un mensaje demasiado largo para la torta");
        assert_eq!(
            cart.draft_message("TC001").map(|m| m.chars().count()),
            Some(MAX_MESSAGE_LENGTH)
        );

        cart.save_draft_message("TC001", "");
        assert_eq!(cart.draft_message("TC001"), None);
    }
}
