//! Menu price-filter form.

use validator::ValidationErrors;

use super::{add_error, finish, messages};

#[derive(Clone, Debug, Default)]
pub struct PriceFilterForm {
    pub precio_min: String,
    pub precio_max: String,
}

/// Keep only digits, collapsing to empty when nothing numeric remains.
pub fn sanitize_price_input(value: &str) -> String {
    let digits: String =
        value.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(numeric) => numeric.to_string(),
        Err(_) => String::new(),
    }
}

fn parse_price(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

impl PriceFilterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let min = parse_price(&self.precio_min);
        let max = parse_price(&self.precio_max);

        if min.is_some_and(|value| value < 0) {
            add_error(
                &mut errors,
                "precioMin",
                "negative_price",
                messages::NEGATIVE_PRICE,
            );
        }
        if max.is_some_and(|value| value < 0) {
            add_error(
                &mut errors,
                "precioMax",
                "negative_price",
                messages::NEGATIVE_PRICE,
            );
        }

        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            add_error(
                &mut errors,
                "precioMax",
                "price_order",
                messages::PRICE_ORDER,
            );
        }

        finish(errors)
    }

    /// Parsed bounds for the catalog search; invalid values act as absent.
    pub fn bounds(&self) -> (Option<u32>, Option<u32>) {
        let clamp = |value: i64| u32::try_from(value).ok();
        (
            parse_price(&self.precio_min).and_then(clamp),
            parse_price(&self.precio_max).and_then(clamp),
        )
    }
}
