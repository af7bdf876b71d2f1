use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use std::fmt;

/// A raw token balance together with the token's decimals, for display.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub struct TokenAmount {
    /// The amount in base units
    pub raw: U256,
    /// Decimal places of the token
    pub decimals: u8,
}

impl TokenAmount {
    /// Creates a new TokenAmount
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Checks if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // format_units only supports up to 77 decimals
        match format_units(self.raw, self.decimals) {
            Ok(formatted) if formatted.contains('.') => {
                let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
                f.write_str(trimmed)
            }
            Ok(formatted) => f.write_str(&formatted),
            Err(_) => write!(f, "{} (raw)", self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_six_decimals() {
        let amount = TokenAmount::new(U256::from(1_500_000u64), 6);
        assert_eq!(amount.to_string(), "1.5");
    }

    #[test]
    fn test_display_whole_number() {
        let amount = TokenAmount::new(U256::from(2_000_000_000_000_000_000u128), 18);
        assert_eq!(amount.to_string(), "2");
    }

    #[test]
    fn test_display_dust() {
        let amount = TokenAmount::new(U256::from(50u64), 18);
        assert_eq!(amount.to_string(), "0.00000000000000005");
    }

    #[test]
    fn test_display_zero_decimals() {
        let amount = TokenAmount::new(U256::from(100u64), 0);
        assert_eq!(amount.to_string(), "100");
    }

    #[test]
    fn test_display_out_of_range_decimals() {
        let amount = TokenAmount::new(U256::from(5u64), 200);
        assert_eq!(amount.to_string(), "5 (raw)");
    }

    #[test]
    fn test_is_zero() {
        assert!(TokenAmount::default().is_zero());
        assert!(!TokenAmount::new(U256::from(1u64), 18).is_zero());
    }
}
