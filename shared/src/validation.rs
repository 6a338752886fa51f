//! Validation utilities and stock arithmetic for Smallbatch ERP
//!
//! The transaction processors (purchase intake, sales fulfillment,
//! manufacturing) share these checks so the pre-pass logic is identical
//! everywhere it appears.

use rust_decimal::Decimal;

// ============================================================================
// Stock Arithmetic
// ============================================================================

/// Check whether the available stock covers a requested quantity
pub fn has_sufficient_stock(available: Decimal, requested: Decimal) -> bool {
    available >= requested
}

/// Raw material needed to produce `produced` units of a finished product,
/// given the recipe's per-unit requirement
pub fn required_material_quantity(per_unit: Decimal, produced: Decimal) -> Decimal {
    per_unit * produced
}

/// Monetary total of a single order line
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

/// Sum of line totals for `(quantity, unit_price)` pairs
pub fn items_subtotal(lines: &[(Decimal, Decimal)]) -> Decimal {
    lines
        .iter()
        .fold(Decimal::ZERO, |acc, (qty, price)| acc + qty * price)
}

// ============================================================================
// Input Validations
// ============================================================================

/// Validate a transaction quantity (must be strictly positive)
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a unit price (must be non-negative)
pub fn validate_unit_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

/// Validate a stock level entered directly by an admin
pub fn validate_stock_level(stock: Decimal) -> Result<(), &'static str> {
    if stock < Decimal::ZERO {
        return Err("Stock cannot be negative");
    }
    Ok(())
}

/// Validate a recipe line requirement (must be strictly positive)
pub fn validate_recipe_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Recipe quantity must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sufficient_stock() {
        assert!(has_sufficient_stock(dec("10"), dec("3")));
        assert!(has_sufficient_stock(dec("10"), dec("10")));
        assert!(!has_sufficient_stock(dec("2"), dec("5")));
    }

    #[test]
    fn test_required_material_quantity() {
        // 2 bolts per widget, 4 widgets -> 8 bolts
        assert_eq!(required_material_quantity(dec("2"), dec("4")), dec("8"));
        assert_eq!(
            required_material_quantity(dec("0.5"), dec("3")),
            dec("1.5")
        );
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(dec("50"), dec("1")), dec("50"));
        assert_eq!(line_total(dec("3"), dec("5")), dec("15"));
    }

    #[test]
    fn test_items_subtotal() {
        let lines = vec![(dec("2"), dec("10")), (dec("1"), dec("5.5"))];
        assert_eq!(items_subtotal(&lines), dec("25.5"));
        assert_eq!(items_subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(dec("1")).is_ok());
        assert!(validate_quantity(dec("0.001")).is_ok());
        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_quantity(dec("-3")).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Decimal::ZERO).is_ok());
        assert!(validate_unit_price(dec("19.99")).is_ok());
        assert!(validate_unit_price(dec("-0.01")).is_err());
    }

    #[test]
    fn test_validate_stock_level() {
        assert!(validate_stock_level(Decimal::ZERO).is_ok());
        assert!(validate_stock_level(dec("100")).is_ok());
        assert!(validate_stock_level(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_recipe_quantity() {
        assert!(validate_recipe_quantity(dec("2")).is_ok());
        assert!(validate_recipe_quantity(Decimal::ZERO).is_err());
    }
}
