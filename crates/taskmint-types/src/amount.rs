use crate::{Result, TypesError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STX_DECIMALS: u32 = 6;
pub const MICRO_PER_STX: u128 = 1_000_000; // 10^6

/// Token amount held as integer micro-units, the representation the contract
/// stores. Decimal strings only appear at the edges (form input, display).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StxAmount(u128);

impl StxAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_micro(micro: u128) -> Self {
        Self(micro)
    }

    pub fn micro(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal token amount such as `"1.50"` into micro-units.
    ///
    /// Digits beyond the sixth decimal place are dropped, never rounded:
    /// `"1.999999999"` becomes 1_999_999 micro-units.
    pub fn from_decimal_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TypesError::InvalidAmount("empty amount".to_string()));
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(TypesError::InvalidAmount(input.to_string()));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(TypesError::InvalidAmount(input.to_string()));
        }

        let whole_units: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| TypesError::AmountOverflow(input.to_string()))?
        };

        let kept: String = fraction.chars().take(STX_DECIMALS as usize).collect();
        let fraction_micro: u128 = if kept.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", kept, width = STX_DECIMALS as usize);
            padded
                .parse()
                .map_err(|_| TypesError::InvalidAmount(input.to_string()))?
        };

        whole_units
            .checked_mul(MICRO_PER_STX)
            .and_then(|micro| micro.checked_add(fraction_micro))
            .map(Self)
            .ok_or_else(|| TypesError::AmountOverflow(input.to_string()))
    }

    /// Drop precision below `places` decimals of a whole token.
    pub fn truncate_decimals(&self, places: u32) -> Self {
        if places >= STX_DECIMALS {
            return *self;
        }
        let unit = 10u128.pow(STX_DECIMALS - places);
        Self(self.0 - self.0 % unit)
    }

    /// Approximate value in whole tokens, for magnitude formatting only.
    pub fn to_stx_f64(&self) -> f64 {
        self.0 as f64 / MICRO_PER_STX as f64
    }

    /// Compact rendering used on bounty cards: `1.5K`, `2.3M`, `< 0.0001`.
    pub fn format_scaled(&self) -> String {
        let whole = self.0 / MICRO_PER_STX;
        let whole_len = whole.to_string().len();
        let value = self.to_stx_f64();

        match whole_len {
            n if n >= 13 => format!("{:.1}T", value / 1e12),
            n if n >= 10 => format!("{:.1}B", value / 1e9),
            n if n >= 7 => format!("{:.1}M", value / 1e6),
            n if n >= 4 => format!("{:.1}K", value / 1e3),
            _ if self.0 > 0 && self.0 < 100 => "< 0.0001".to_string(),
            _ => self.truncate_decimals(2).to_string(),
        }
    }
}

impl fmt::Display for StxAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MICRO_PER_STX;
        let fraction = self.0 % MICRO_PER_STX;
        if fraction == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:06}", fraction);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(StxAmount::from_decimal_str("1.5").unwrap().micro(), 1_500_000);
        assert_eq!(StxAmount::from_decimal_str("1.50").unwrap().micro(), 1_500_000);
        assert_eq!(StxAmount::from_decimal_str("2").unwrap().micro(), 2_000_000);
        assert_eq!(StxAmount::from_decimal_str("2.").unwrap().micro(), 2_000_000);
        assert_eq!(StxAmount::from_decimal_str(".5").unwrap().micro(), 500_000);
        assert_eq!(StxAmount::from_decimal_str(" 0.000001 ").unwrap().micro(), 1);
        assert_eq!(StxAmount::from_decimal_str("0").unwrap(), StxAmount::ZERO);
    }

    #[test]
    fn test_parse_truncates_not_rounds() {
        assert_eq!(
            StxAmount::from_decimal_str("1.999999999").unwrap().micro(),
            1_999_999
        );
        assert_eq!(StxAmount::from_decimal_str("0.0000009").unwrap().micro(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", ".", "-1", "+1", "1e3", "abc", "1.2.3", "1,5", "NaN"] {
            assert!(StxAmount::from_decimal_str(bad).is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_parse_overflow() {
        let huge = "9".repeat(40);
        assert!(matches!(
            StxAmount::from_decimal_str(&huge),
            Err(TypesError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_truncate_decimals() {
        let amount = StxAmount::from_micro(1_234_567);
        assert_eq!(amount.truncate_decimals(3).micro(), 1_234_000);
        assert_eq!(amount.truncate_decimals(0).micro(), 1_000_000);
        assert_eq!(amount.truncate_decimals(6), amount);
        assert_eq!(amount.truncate_decimals(9), amount);
    }

    #[test]
    fn test_display() {
        assert_eq!(StxAmount::from_micro(1_500_000).to_string(), "1.5");
        assert_eq!(StxAmount::from_micro(2_000_000).to_string(), "2");
        assert_eq!(StxAmount::from_micro(1_000).to_string(), "0.001");
        assert_eq!(StxAmount::ZERO.to_string(), "0");
    }

    #[test]
    fn test_format_scaled() {
        assert_eq!(StxAmount::from_micro(1_500_000).format_scaled(), "1.5");
        assert_eq!(StxAmount::from_micro(2_756_000).format_scaled(), "2.75");
        assert_eq!(StxAmount::from_micro(1_500_000_000).format_scaled(), "1.5K");
        assert_eq!(StxAmount::from_micro(2_300_000_000_000).format_scaled(), "2.3M");
        assert_eq!(StxAmount::from_micro(50).format_scaled(), "< 0.0001");
        assert_eq!(StxAmount::ZERO.format_scaled(), "0");
    }
}
