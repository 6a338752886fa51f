//! Sales fulfillment tests
//!
//! Tests for recording customer sales including:
//! - Stock decrement on fulfillment
//! - Insufficient stock rejection (whole order, no partial fulfillment)
//! - Order totals with taxes

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::validation::{has_sufficient_stock, items_subtotal, validate_quantity};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Selling 3 units from a stock of 10 leaves 7
    #[test]
    fn test_stock_decrements_on_sale() {
        let stock = dec("10");
        let sold = dec("3");

        assert!(has_sufficient_stock(stock, sold));
        assert_eq!(stock - sold, dec("7"));
    }

    /// Selling 5 units from a stock of 2 must be refused
    #[test]
    fn test_oversell_detected() {
        let stock = dec("2");
        let requested = dec("5");

        assert!(!has_sufficient_stock(stock, requested));
    }

    /// Selling exactly the remaining stock is allowed and empties it
    #[test]
    fn test_sell_entire_stock() {
        let stock = dec("4");

        assert!(has_sufficient_stock(stock, stock));
        assert_eq!(stock - stock, Decimal::ZERO);
    }

    /// An order with no items must be rejected
    #[test]
    fn test_empty_order_rejected() {
        let items: Vec<(Decimal, Decimal)> = vec![];
        assert!(items.is_empty());
    }

    /// Zero-quantity lines are invalid
    #[test]
    fn test_zero_quantity_line_invalid() {
        assert!(validate_quantity(Decimal::ZERO).is_err());
    }

    /// Order total includes taxes on top of the item subtotal
    #[test]
    fn test_order_total_with_taxes() {
        let lines = vec![(dec("3"), dec("10.00")), (dec("1"), dec("5.00"))];
        let subtotal = items_subtotal(&lines);
        let taxes = dec("2.45");

        assert_eq!(subtotal, dec("35.00"));
        assert_eq!(subtotal + taxes, dec("37.45"));
    }

    /// Taxes default to zero when the client omits them
    #[test]
    fn test_taxes_default_zero() {
        let subtotal = dec("35.00");
        let taxes = Decimal::ZERO;
        assert_eq!(subtotal + taxes, subtotal);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid quantities (positive decimals)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A fulfilled sale removes exactly the sold quantity
        #[test]
        fn prop_sale_decrements_exactly(
            stock in quantity_strategy(),
            extra in quantity_strategy()
        ) {
            // Construct a stock level that always covers the request
            let available = stock + extra;
            let sold = stock;

            prop_assert!(has_sufficient_stock(available, sold));
            prop_assert_eq!(available - sold, extra);
        }

        /// Stock never goes negative through the sufficiency check
        #[test]
        fn prop_no_negative_stock_after_allowed_sale(
            stock in quantity_strategy(),
            requested in quantity_strategy()
        ) {
            if has_sufficient_stock(stock, requested) {
                prop_assert!(stock - requested >= Decimal::ZERO);
            }
        }

        /// Oversell is refused exactly when requested exceeds stock
        #[test]
        fn prop_oversell_refused(
            stock in quantity_strategy(),
            requested in quantity_strategy()
        ) {
            let allowed = has_sufficient_stock(stock, requested);
            prop_assert_eq!(allowed, requested <= stock);
        }

        /// Sufficiency is monotone: whatever fits, anything smaller fits too
        #[test]
        fn prop_sufficiency_monotone(
            stock in quantity_strategy(),
            requested in quantity_strategy(),
            smaller_by in quantity_strategy()
        ) {
            if has_sufficient_stock(stock, requested) && smaller_by <= requested {
                prop_assert!(has_sufficient_stock(stock, requested - smaller_by));
            }
        }
    }
}

// ============================================================================
// Integration Test Helpers (for use with actual database)
// ============================================================================

#[cfg(test)]
mod integration_helpers {
    use super::*;

    /// Simulate fulfilling a sale against a set of product stock levels.
    /// Mirrors the processor's pre-pass: every line is checked before any
    /// stock moves, so a failing line leaves the whole order untouched.
    pub fn simulate_sale(
        stocks: &mut Vec<(&'static str, Decimal)>,
        items: &[(&'static str, Decimal)],
    ) -> Result<(), &'static str> {
        if items.is_empty() {
            return Err("Sale must contain at least one item");
        }

        // Pre-pass: existence and sufficiency for every line
        for (name, qty) in items {
            let stock = stocks
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, s)| *s)
                .ok_or("Finished product not found")?;
            if !has_sufficient_stock(stock, *qty) {
                return Err("Insufficient stock");
            }
        }

        for (name, qty) in items {
            let entry = stocks.iter_mut().find(|(n, _)| n == name).unwrap();
            entry.1 -= *qty;
        }
        Ok(())
    }

    #[test]
    fn test_simulate_sale_fulfilled() {
        let mut stocks = vec![("widget", dec("10"))];
        simulate_sale(&mut stocks, &[("widget", dec("3"))]).unwrap();
        assert_eq!(stocks[0].1, dec("7"));
    }

    #[test]
    fn test_simulate_sale_insufficient_stock() {
        let mut stocks = vec![("widget", dec("2"))];
        let result = simulate_sale(&mut stocks, &[("widget", dec("5"))]);

        assert!(result.is_err());
        assert_eq!(stocks[0].1, dec("2"));
    }

    #[test]
    fn test_simulate_sale_atomic_rejection() {
        // Second line fails, so the first line's stock must not move either
        let mut stocks = vec![("widget", dec("10")), ("gadget", dec("1"))];
        let result = simulate_sale(
            &mut stocks,
            &[("widget", dec("3")), ("gadget", dec("4"))],
        );

        assert!(result.is_err());
        assert_eq!(stocks[0].1, dec("10"));
        assert_eq!(stocks[1].1, dec("1"));
    }

    #[test]
    fn test_simulate_sale_unknown_product() {
        let mut stocks = vec![("widget", dec("10"))];
        let result = simulate_sale(&mut stocks, &[("doohickey", dec("1"))]);
        assert!(result.is_err());
    }

    #[test]
    fn test_simulate_sale_multiple_lines() {
        let mut stocks = vec![("widget", dec("10")), ("gadget", dec("6"))];
        simulate_sale(
            &mut stocks,
            &[("widget", dec("4")), ("gadget", dec("6"))],
        )
        .unwrap();

        assert_eq!(stocks[0].1, dec("6"));
        assert_eq!(stocks[1].1, Decimal::ZERO);
    }
}
