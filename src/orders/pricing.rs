use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::orders::error::OrderError;
use crate::orders::models::{CartLine, OrderTotals};

/// Catalog data the pricing policy needs about one menu item
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub price: Decimal,
    pub available: bool,
}

/// A cart line with its server-side unit price resolved
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub special_instructions: Option<String>,
}

impl PricedLine {
    pub fn line_amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A fully priced cart: resolved lines plus computed totals
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub totals: OrderTotals,
}

/// Pure pricing policy. Computes line amounts, subtotal, tax and total
/// from catalog prices; clients never supply prices. The tax rate is
/// injected at construction so it can vary per deployment.
#[derive(Debug, Clone)]
pub struct PricingPolicy {
    tax_rate: Decimal,
}

impl PricingPolicy {
    pub fn new(tax_rate: Decimal) -> Self {
        Self { tax_rate }
    }

    /// Resolve each cart line against the catalog and compute totals.
    ///
    /// Fails with `EmptyCart` for an empty cart, `ValidationError` for a
    /// non-positive quantity, and `ItemUnavailable` when a line references
    /// a missing or unavailable item. Deterministic given the same catalog.
    pub fn price_cart(
        &self,
        cart_lines: &[CartLine],
        catalog: &HashMap<i32, CatalogEntry>,
    ) -> Result<PricedCart, OrderError> {
        if cart_lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(cart_lines.len());
        for line in cart_lines {
            if line.quantity <= 0 {
                return Err(OrderError::ValidationError(format!(
                    "Quantity must be positive, got {}",
                    line.quantity
                )));
            }

            let entry = catalog
                .get(&line.item_id)
                .filter(|entry| entry.available)
                .ok_or(OrderError::ItemUnavailable(line.item_id))?;

            lines.push(PricedLine {
                item_id: line.item_id,
                quantity: line.quantity,
                unit_price: entry.price,
                special_instructions: line.special_instructions.clone(),
            });
        }

        let subtotal: Decimal = lines.iter().map(PricedLine::line_amount).sum();
        let tax = self.compute_tax(subtotal);

        Ok(PricedCart {
            lines,
            totals: OrderTotals {
                subtotal,
                tax,
                total: subtotal + tax,
            },
        })
    }

    /// Tax at currency precision, round-half-up.
    pub fn compute_tax(&self, subtotal: Decimal) -> Decimal {
        (subtotal * self.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ten_percent() -> PricingPolicy {
        PricingPolicy::new(dec!(0.10))
    }

    fn catalog(entries: &[(i32, Decimal, bool)]) -> HashMap<i32, CatalogEntry> {
        entries
            .iter()
            .map(|&(id, price, available)| (id, CatalogEntry { price, available }))
            .collect()
    }

    fn line(item_id: i32, quantity: i32) -> CartLine {
        CartLine {
            item_id,
            quantity,
            special_instructions: None,
        }
    }

    #[test]
    fn test_happy_path_totals() {
        let policy = ten_percent();
        let catalog = catalog(&[(1, dec!(10.00), true), (2, dec!(5.50), true)]);

        let priced = policy
            .price_cart(&[line(1, 2), line(2, 1)], &catalog)
            .unwrap();

        assert_eq!(priced.totals.subtotal, dec!(25.50));
        assert_eq!(priced.totals.tax, dec!(2.55));
        assert_eq!(priced.totals.total, dec!(28.05));
    }

    #[test]
    fn test_unit_prices_are_taken_from_catalog() {
        let policy = ten_percent();
        let catalog = catalog(&[(7, dec!(3.25), true)]);

        let priced = policy.price_cart(&[line(7, 3)], &catalog).unwrap();

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.lines[0].unit_price, dec!(3.25));
        assert_eq!(priced.lines[0].line_amount(), dec!(9.75));
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let policy = ten_percent();
        let result = policy.price_cart(&[], &HashMap::new());
        assert!(matches!(result, Err(OrderError::EmptyCart)));
    }

    #[test]
    fn test_unavailable_item_is_rejected() {
        let policy = ten_percent();
        let catalog = catalog(&[(1, dec!(10.00), true), (2, dec!(4.00), false)]);

        let result = policy.price_cart(&[line(1, 1), line(2, 1)], &catalog);
        assert!(matches!(result, Err(OrderError::ItemUnavailable(2))));
    }

    #[test]
    fn test_missing_item_is_rejected() {
        let policy = ten_percent();
        let catalog = catalog(&[(1, dec!(10.00), true)]);

        let result = policy.price_cart(&[line(99, 1)], &catalog);
        assert!(matches!(result, Err(OrderError::ItemUnavailable(99))));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let policy = ten_percent();
        let catalog = catalog(&[(1, dec!(10.00), true)]);

        let result = policy.price_cart(&[line(1, 0)], &catalog);
        assert!(matches!(result, Err(OrderError::ValidationError(_))));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let policy = ten_percent();
        // 0.25 * 0.10 = 0.025, half-up -> 0.03
        assert_eq!(policy.compute_tax(dec!(0.25)), dec!(0.03));
        // 0.24 * 0.10 = 0.024 -> 0.02
        assert_eq!(policy.compute_tax(dec!(0.24)), dec!(0.02));
    }

    #[test]
    fn test_tax_rate_is_injected_not_fixed() {
        let policy = PricingPolicy::new(dec!(0.20));
        let catalog = catalog(&[(1, dec!(10.00), true)]);

        let priced = policy.price_cart(&[line(1, 1)], &catalog).unwrap();
        assert_eq!(priced.totals.tax, dec!(2.00));
        assert_eq!(priced.totals.total, dec!(12.00));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// subtotal = Σ price×qty, tax = round(subtotal×rate), total = subtotal+tax,
    /// for any cart of available items.
    #[test]
    fn prop_totals_invariant() {
        proptest!(|(
            items in prop::collection::vec((1i32..=100, 1u32..=10000u32), 1..=15)
        )| {
            let policy = PricingPolicy::new(dec!(0.10));
            let mut catalog = HashMap::new();
            let mut lines = Vec::new();

            for (i, &(quantity, price_cents)) in items.iter().enumerate() {
                let item_id = i as i32 + 1;
                let price = Decimal::from(price_cents) / Decimal::from(100);
                catalog.insert(item_id, CatalogEntry { price, available: true });
                lines.push(CartLine {
                    item_id,
                    quantity,
                    special_instructions: None,
                });
            }

            let priced = policy.price_cart(&lines, &catalog).unwrap();

            let expected_subtotal: Decimal = lines
                .iter()
                .map(|l| catalog[&l.item_id].price * Decimal::from(l.quantity))
                .sum();

            prop_assert_eq!(priced.totals.subtotal, expected_subtotal);
            prop_assert_eq!(priced.totals.tax, policy.compute_tax(expected_subtotal));
            prop_assert_eq!(priced.totals.total, priced.totals.subtotal + priced.totals.tax);
            prop_assert!(priced.totals.total >= Decimal::ZERO);
        });
    }

    /// Pricing the same cart twice gives identical results.
    #[test]
    fn prop_pricing_is_deterministic() {
        proptest!(|(
            quantity in 1i32..=50,
            price_cents in 1u32..=100000u32
        )| {
            let policy = PricingPolicy::new(dec!(0.10));
            let price = Decimal::from(price_cents) / Decimal::from(100);
            let catalog: HashMap<i32, CatalogEntry> =
                [(1, CatalogEntry { price, available: true })].into_iter().collect();
            let lines = vec![CartLine {
                item_id: 1,
                quantity,
                special_instructions: None,
            }];

            let first = policy.price_cart(&lines, &catalog).unwrap();
            let second = policy.price_cart(&lines, &catalog).unwrap();

            prop_assert_eq!(first.totals, second.totals);
        });
    }

    /// Any cart containing an unavailable item fails, naming that item.
    #[test]
    fn prop_unavailable_item_always_fails() {
        proptest!(|(
            quantity in 1i32..=50,
            price_cents in 1u32..=10000u32
        )| {
            let policy = PricingPolicy::new(dec!(0.10));
            let price = Decimal::from(price_cents) / Decimal::from(100);
            let catalog: HashMap<i32, CatalogEntry> = [
                (1, CatalogEntry { price, available: true }),
                (2, CatalogEntry { price, available: false }),
            ].into_iter().collect();

            let lines = vec![
                CartLine { item_id: 1, quantity, special_instructions: None },
                CartLine { item_id: 2, quantity, special_instructions: None },
            ];

            let result = policy.price_cart(&lines, &catalog);
            prop_assert!(matches!(result, Err(OrderError::ItemUnavailable(2))));
        });
    }
}
