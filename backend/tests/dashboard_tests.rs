//! Dashboard snapshot tests
//!
//! Tests for the dashboard aggregates including:
//! - Low stock watchlist thresholds
//! - Ledger stock and amount totals
//! - Today's trading window

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

// Thresholds used by the dashboard watchlists
const RAW_MATERIAL_LOW_STOCK: &str = "10";
const FINISHED_PRODUCT_LOW_STOCK: &str = "5";

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
    use chrono::{Local, NaiveTime, TimeZone};

    /// Raw materials appear on the watchlist strictly below 10
    #[test]
    fn test_raw_material_threshold() {
        let threshold = dec(RAW_MATERIAL_LOW_STOCK);

        assert!(dec("9.99") < threshold);
        assert!(dec("0") < threshold);
        assert!(!(dec("10") < threshold)); // boundary excluded
        assert!(!(dec("25") < threshold));
    }

    /// Finished products appear on the watchlist strictly below 5
    #[test]
    fn test_finished_product_threshold() {
        let threshold = dec(FINISHED_PRODUCT_LOW_STOCK);

        assert!(dec("4") < threshold);
        assert!(!(dec("5") < threshold)); // boundary excluded
        assert!(!(dec("12") < threshold));
    }

    /// Total stock is the sum across all materials
    #[test]
    fn test_total_stock_sum() {
        let stocks = vec![dec("100"), dec("2.5"), dec("0"), dec("47.5")];
        let total: Decimal = stocks.iter().sum();
        assert_eq!(total, dec("150"));
    }

    /// Purchase and sales totals sum the ledger amounts
    #[test]
    fn test_amount_totals() {
        let purchases = vec![dec("50.00"), dec("100.30")];
        let sales = vec![dec("37.45"), dec("12.55")];

        let purchase_total: Decimal = purchases.iter().sum();
        let sales_total: Decimal = sales.iter().sum();

        assert_eq!(purchase_total, dec("150.30"));
        assert_eq!(sales_total, dec("50.00"));
    }

    /// Today's window starts at local midnight
    #[test]
    fn test_today_window_start() {
        let today = Local::now().date_naive();
        let midnight = today.and_time(NaiveTime::MIN);

        let start = Local
            .from_local_datetime(&midnight)
            .earliest()
            .expect("local midnight resolves");

        assert_eq!(start.date_naive(), today);
        assert_eq!(start.time(), NaiveTime::MIN);
    }

    /// A sale from yesterday falls outside today's window
    #[test]
    fn test_yesterday_excluded_from_window() {
        let today = Local::now().date_naive();
        let midnight = today.and_time(NaiveTime::MIN);
        let start = Local
            .from_local_datetime(&midnight)
            .earliest()
            .expect("local midnight resolves");

        let yesterday_sale = start - chrono::Duration::hours(1);
        let today_sale = start + chrono::Duration::hours(1);

        assert!(yesterday_sale < start);
        assert!(today_sale >= start);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating stock levels including zero
    fn stock_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100000i64).prop_map(|n| Decimal::new(n, 2)) // 0.00 to 1000.00
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The watchlist contains exactly the items below threshold
        #[test]
        fn prop_watchlist_membership(
            stocks in prop::collection::vec(stock_strategy(), 0..30)
        ) {
            let threshold = dec(RAW_MATERIAL_LOW_STOCK);
            let watchlist: Vec<Decimal> = stocks
                .iter()
                .copied()
                .filter(|s| *s < threshold)
                .collect();

            for s in &watchlist {
                prop_assert!(*s < threshold);
            }
            let excluded = stocks.len() - watchlist.len();
            let above = stocks.iter().filter(|s| **s >= threshold).count();
            prop_assert_eq!(excluded, above);
        }

        /// Total stock equals the sum of watchlist and healthy items
        #[test]
        fn prop_total_partitioned_by_threshold(
            stocks in prop::collection::vec(stock_strategy(), 0..30)
        ) {
            let threshold = dec(FINISHED_PRODUCT_LOW_STOCK);
            let total: Decimal = stocks.iter().sum();
            let low: Decimal = stocks.iter().filter(|s| **s < threshold).sum();
            let healthy: Decimal = stocks.iter().filter(|s| **s >= threshold).sum();

            prop_assert_eq!(low + healthy, total);
        }

        /// Totals are monotone: adding a record never decreases the total
        #[test]
        fn prop_totals_monotone(
            amounts in prop::collection::vec(stock_strategy(), 1..20),
            extra in stock_strategy()
        ) {
            let before: Decimal = amounts.iter().sum();
            let after = before + extra;

            prop_assert!(after >= before);
        }
    }
}
