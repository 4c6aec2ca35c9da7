//! Money type for representing currency amounts
//!
//! Internally stores amounts in centavos (i64) to avoid floating-point
//! precision issues. Displays and parses Brazilian real (BRL) notation:
//! decimal comma, dot as thousands separator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as centavos (hundredths of a real)
///
/// Using i64 centavos avoids floating-point precision issues and supports
/// amounts far beyond anything a small-business ledger will hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from centavos
    ///
    /// # Examples
    /// ```
    /// use retainer::models::Money;
    /// let amount = Money::from_cents(1050); // R$ 10,50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole reais
    pub const fn from_reais(reais: i64) -> Self {
        Self(reais * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in centavos
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole reais portion (truncated toward zero)
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Get the centavos portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Divide by a positive integer, rounding to the nearest centavo
    /// (ties away from zero)
    pub fn div_round(&self, divisor: i64) -> Self {
        debug_assert!(divisor > 0, "divisor must be positive");
        let half = divisor / 2;
        if self.0 >= 0 {
            Self((self.0 + half) / divisor)
        } else {
            Self((self.0 - half) / divisor)
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts Brazilian notation and a few pragmatic variants:
    /// `"1.250,50"`, `"1250,50"`, `"1250.50"`, `"R$ 99,90"`, `"1250"`,
    /// with an optional leading minus sign.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        // Handle negative sign at start
        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped.trim_start())
        } else {
            (false, s)
        };

        // Remove currency prefix if present
        let s = s.strip_prefix("R$").unwrap_or(s).trim_start();

        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let cents = if let Some(pos) = s.rfind(',') {
            // Comma is the decimal separator; dots are thousands separators
            let int_digits: String = s[..pos].chars().filter(|c| *c != '.').collect();
            let reais: i64 = if int_digits.is_empty() {
                0
            } else {
                int_digits
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
            };
            reais * 100 + parse_fraction(&s[pos + 1..])?
        } else if let Some(pos) = s.rfind('.') {
            let fraction = &s[pos + 1..];
            if fraction.len() <= 2 && !s[..pos].contains('.') {
                // Single dot followed by up to two digits: decimal separator
                let reais: i64 = s[..pos]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;
                reais * 100 + parse_fraction(fraction)?
            } else {
                // Dots are thousands separators ("1.250" or "1.250.000")
                let digits: String = s.chars().filter(|c| *c != '.').collect();
                digits
                    .parse::<i64>()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                    * 100
            }
        } else {
            // Integer format - whole reais
            s.parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                * 100
        };

        Ok(Self(if negative { -cents } else { cents }))
    }
}

/// Parse the fractional part of an amount into centavos
fn parse_fraction(fraction: &str) -> Result<i64, MoneyParseError> {
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyParseError::InvalidFormat(fraction.to_string()));
    }
    match fraction.len() {
        0 => Ok(0),
        1 => fraction
            .parse::<i64>()
            .map(|d| d * 10)
            .map_err(|_| MoneyParseError::InvalidFormat(fraction.to_string())),
        _ => fraction[..2]
            .parse()
            .map_err(|_| MoneyParseError::InvalidFormat(fraction.to_string())),
    }
}

/// Group a non-negative integer with dots every three digits ("1250" -> "1.250")
fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(*b as char);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(
                f,
                "-R$ {},{:02}",
                group_thousands(self.reais().abs()),
                self.cents_part()
            )
        } else {
            write!(
                f,
                "R$ {},{:02}",
                group_thousands(self.reais()),
                self.cents_part()
            )
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.reais(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_from_reais() {
        let m = Money::from_reais(299);
        assert_eq!(m.cents(), 29900);
    }

    #[test]
    fn test_display_brl() {
        assert_eq!(format!("{}", Money::from_cents(125050)), "R$ 1.250,50");
        assert_eq!(format!("{}", Money::from_cents(1050)), "R$ 10,50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0,00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-R$ 10,50");
        assert_eq!(format!("{}", Money::from_cents(5)), "R$ 0,05");
        assert_eq!(
            format!("{}", Money::from_cents(123456789)),
            "R$ 1.234.567,89"
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_div_round() {
        // 100.00 / 3 = 33.333... -> 33.33
        assert_eq!(Money::from_cents(10000).div_round(3).cents(), 3333);
        // 100.00 / 6 = 16.666... -> 16.67
        assert_eq!(Money::from_cents(10000).div_round(6).cents(), 1667);
        // Exact divisions stay exact
        assert_eq!(Money::from_cents(30000).div_round(3).cents(), 10000);
        assert_eq!(Money::from_cents(120000).div_round(12).cents(), 10000);
    }

    #[test]
    fn test_parse_brazilian_notation() {
        assert_eq!(Money::parse("1.250,50").unwrap().cents(), 125050);
        assert_eq!(Money::parse("1250,50").unwrap().cents(), 125050);
        assert_eq!(Money::parse("R$ 99,90").unwrap().cents(), 9990);
        assert_eq!(Money::parse("-10,50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("0,05").unwrap().cents(), 5);
    }

    #[test]
    fn test_parse_dot_decimal() {
        assert_eq!(Money::parse("1250.50").unwrap().cents(), 125050);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("299").unwrap().cents(), 29900);
    }

    #[test]
    fn test_parse_thousands_only() {
        // Three digits after a dot means thousands grouping, not a fraction
        assert_eq!(Money::parse("1.250").unwrap().cents(), 125000);
        assert_eq!(Money::parse("1.250.000").unwrap().cents(), 125000000);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("R$").is_err());
    }

    #[test]
    fn test_comparison() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        let c = Money::from_cents(1000);

        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, c);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }

    #[test]
    fn test_format_parse_round_trip() {
        let m = Money::from_cents(125050);
        let formatted = format!("{}", m);
        assert_eq!(formatted, "R$ 1.250,50");
        assert_eq!(Money::parse(&formatted).unwrap(), m);
    }
}
