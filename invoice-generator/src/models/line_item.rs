//! Line item model for invoice-generator.

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

/// Billable entry on an invoice. Items are immutable once added to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_cost: Decimal,
    pub quantity: u32,
}

impl LineItem {
    /// `unit_cost * quantity`, unrounded. `None` when the product does not
    /// fit in a `Decimal`.
    pub fn checked_amount(&self) -> Option<Decimal> {
        self.unit_cost.checked_mul(Decimal::from(self.quantity))
    }

    /// Like [`LineItem::checked_amount`], saturating at `Decimal::MAX`.
    /// Items accepted by a draft always fit.
    pub fn amount(&self) -> Decimal {
        self.checked_amount().unwrap_or(Decimal::MAX)
    }
}

/// Scratch fields of the item entry form.
///
/// Deserialization is as lenient as the form: numbers may arrive as JSON
/// numbers or strings, and anything unparseable coerces the same way typed
/// input does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_amount_fits", skip_on_field_errors = true))]
pub struct ItemEntry {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_positive_cost"))]
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub unit_cost: Decimal,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<i64>,
}

impl Default for ItemEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            unit_cost: Decimal::ZERO,
            quantity: Some(1),
        }
    }
}

impl ItemEntry {
    pub fn new(name: impl Into<String>, unit_cost: Decimal, quantity: Option<i64>) -> Self {
        Self {
            name: name.into(),
            unit_cost,
            quantity,
        }
    }

    /// Quantity as it will be billed: absent, zero, negative or oversized
    /// values fall back to 1.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity
            .filter(|q| *q > 0)
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or(1)
    }

    /// Sets the cost from raw text. Anything that is not a number becomes 0.
    pub fn set_cost_input(&mut self, raw: &str) {
        self.unit_cost = parse_decimal_or_zero(raw);
    }

    /// Sets the quantity from raw text. Anything that is not a positive
    /// integer becomes 1.
    pub fn set_quantity_input(&mut self, raw: &str) {
        self.quantity = Some(parse_quantity_or_one(raw));
    }

    pub(crate) fn to_line_item(&self) -> LineItem {
        LineItem {
            name: self.name.clone(),
            unit_cost: self.unit_cost,
            quantity: self.effective_quantity(),
        }
    }
}

fn validate_positive_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if *cost <= Decimal::ZERO {
        let mut err = ValidationError::new("positive_cost");
        err.message = Some("Cost must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

fn validate_amount_fits(entry: &ItemEntry) -> Result<(), ValidationError> {
    if entry.to_line_item().checked_amount().is_none() {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Cost times quantity is too large".into());
        return Err(err);
    }
    Ok(())
}

/// Lenient numeric coercion used by the form inputs.
pub fn parse_decimal_or_zero(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

fn parse_quantity_or_one(raw: &str) -> i64 {
    raw.trim().parse::<i64>().ok().filter(|q| *q > 0).unwrap_or(1)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(Decimal),
    Text(String),
    Other(IgnoredAny),
}

/// Accepts a JSON number or a string; anything else coerces to 0.
pub(crate) fn lenient_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    Ok(match RawDecimal::deserialize(deserializer)? {
        RawDecimal::Number(cost) => cost,
        RawDecimal::Text(raw) => parse_decimal_or_zero(&raw),
        RawDecimal::Other(_) => Decimal::ZERO,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Whole(i64),
    Fractional(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match RawQuantity::deserialize(deserializer)? {
        RawQuantity::Whole(q) => Some(q),
        // saturating; non-positive values fall back to 1 when billed
        RawQuantity::Fractional(q) => Some(q.trunc() as i64),
        RawQuantity::Text(raw) => Some(parse_quantity_or_one(&raw)),
        RawQuantity::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amount_multiplies_cost_by_quantity() {
        let item = LineItem {
            name: "Lens".to_string(),
            unit_cost: Decimal::from_str("12.345").unwrap(),
            quantity: 3,
        };
        assert_eq!(item.amount(), Decimal::from_str("37.035").unwrap());
    }

    #[test]
    fn empty_name_fails_validation() {
        let entry = ItemEntry::new("", Decimal::from(10), Some(1));
        let errors = entry.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn non_positive_cost_fails_validation() {
        for cost in [Decimal::ZERO, Decimal::from(-5)] {
            let entry = ItemEntry::new("Tripod", cost, Some(1));
            let errors = entry.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("unit_cost"));
        }
    }

    #[test]
    fn valid_entry_passes() {
        let entry = ItemEntry::new("Tripod", Decimal::from_str("0.01").unwrap(), None);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn quantity_falls_back_to_one() {
        assert_eq!(ItemEntry::new("a", Decimal::ONE, None).effective_quantity(), 1);
        assert_eq!(ItemEntry::new("a", Decimal::ONE, Some(0)).effective_quantity(), 1);
        assert_eq!(ItemEntry::new("a", Decimal::ONE, Some(-4)).effective_quantity(), 1);
        assert_eq!(
            ItemEntry::new("a", Decimal::ONE, Some(i64::MAX)).effective_quantity(),
            1
        );
        assert_eq!(ItemEntry::new("a", Decimal::ONE, Some(7)).effective_quantity(), 7);
    }

    #[test]
    fn raw_inputs_are_coerced() {
        let mut entry = ItemEntry::default();

        entry.set_cost_input("49.90");
        assert_eq!(entry.unit_cost, Decimal::from_str("49.90").unwrap());
        entry.set_cost_input("forty");
        assert_eq!(entry.unit_cost, Decimal::ZERO);

        entry.set_quantity_input("3");
        assert_eq!(entry.quantity, Some(3));
        entry.set_quantity_input("-2");
        assert_eq!(entry.quantity, Some(1));
        entry.set_quantity_input("");
        assert_eq!(entry.quantity, Some(1));
    }

    #[test]
    fn oversized_amount_fails_validation() {
        let mut entry = ItemEntry::new("Lens", Decimal::ZERO, Some(2));
        entry.set_cost_input("79228162514264337593543950335");
        assert_eq!(entry.unit_cost, Decimal::MAX);

        let errors = entry.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));

        entry.set_quantity_input("1");
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn amount_saturates_instead_of_panicking() {
        let item = LineItem {
            name: "Huge".to_string(),
            unit_cost: Decimal::MAX,
            quantity: 3,
        };
        assert_eq!(item.checked_amount(), None);
        assert_eq!(item.amount(), Decimal::MAX);
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let entry: ItemEntry =
            serde_json::from_str(r#"{ "name": "Lens", "unit_cost": "100", "quantity": "2" }"#).unwrap();
        assert_eq!(entry.unit_cost, Decimal::from(100));
        assert_eq!(entry.quantity, Some(2));

        let entry: ItemEntry =
            serde_json::from_str(r#"{ "name": "Lens", "unit_cost": 12.5, "quantity": 3 }"#).unwrap();
        assert_eq!(entry.unit_cost, Decimal::from_str("12.5").unwrap());
        assert_eq!(entry.effective_quantity(), 3);
    }

    #[test]
    fn unparseable_json_values_coerce_like_typed_input() {
        let entry: ItemEntry =
            serde_json::from_str(r#"{ "name": "Flash", "unit_cost": "abc", "quantity": "many" }"#)
                .unwrap();
        assert_eq!(entry.unit_cost, Decimal::ZERO);
        assert_eq!(entry.quantity, Some(1));
        assert!(entry.validate().is_err());

        let entry: ItemEntry =
            serde_json::from_str(r#"{ "name": "Flash", "unit_cost": null, "quantity": 2.7 }"#).unwrap();
        assert_eq!(entry.unit_cost, Decimal::ZERO);
        assert_eq!(entry.quantity, Some(2));

        let entry: ItemEntry = serde_json::from_str(r#"{ "name": "Flash" }"#).unwrap();
        assert_eq!(entry.quantity, None);
        assert_eq!(entry.effective_quantity(), 1);
    }
}
