// Custom validation functions for domain-specific rules

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a price is strictly positive
pub fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        Err(ValidationError::new("price_must_be_positive"))
    } else {
        Ok(())
    }
}

/// Validates an optional price field; applied to the inner value when present
pub fn validate_optional_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    validate_positive_price(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_price_is_accepted() {
        assert!(validate_positive_price(&dec!(4.50)).is_ok());
        assert!(validate_positive_price(&dec!(0.01)).is_ok());
    }

    #[test]
    fn test_zero_and_negative_prices_are_rejected() {
        assert!(validate_positive_price(&dec!(0)).is_err());
        assert!(validate_positive_price(&dec!(-1.25)).is_err());
    }
}
