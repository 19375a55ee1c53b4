//! Peso amounts in centavos.
//!
//! Every fee and price in the reservation system is a peso amount. The
//! server sends amounts either as JSON numbers (`200`, `200.5`) or as
//! Laravel decimal strings (`"20.00"`); both deserialize into [`Centavos`],
//! an integer number of centavos, so totals never accumulate float error.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A non-negative peso amount stored as whole centavos.
///
/// Arithmetic saturates at the numeric bounds; fees in this domain are
/// nowhere near them, and saturation keeps the estimator panic-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Centavos(u64);

impl Centavos {
    /// Zero pesos.
    pub const ZERO: Self = Self(0);

    /// Construct from a raw centavo count.
    #[must_use]
    pub const fn new(centavos: u64) -> Self {
        Self(centavos)
    }

    /// Construct from a whole peso amount.
    #[must_use]
    pub const fn from_pesos(pesos: u64) -> Self {
        Self(pesos * 100)
    }

    /// The raw centavo count.
    #[must_use]
    pub const fn centavos(self) -> u64 {
        self.0
    }

    /// Multiply by a unit count (amenity quantity × unit price).
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Parse a decimal peso string such as `"20.00"` or `"1,500.50"`.
    ///
    /// A leading peso sign and digit-grouping commas are tolerated; more
    /// than two fraction digits or a negative amount are not.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyParseError`] when the string is not a non-negative
    /// decimal amount.
    pub fn parse_pesos(input: &str) -> Result<Self, MoneyParseError> {
        let cleaned: String = input
            .trim()
            .trim_start_matches('₱')
            .chars()
            .filter(|c| *c != ',')
            .collect();

        if cleaned.is_empty() || cleaned.starts_with('-') {
            return Err(MoneyParseError::Invalid(input.to_string()));
        }

        let (whole, fraction) = match cleaned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (cleaned.as_str(), ""),
        };

        if fraction.len() > 2 {
            return Err(MoneyParseError::Invalid(input.to_string()));
        }

        let whole: u64 = whole
            .parse()
            .map_err(|_| MoneyParseError::Invalid(input.to_string()))?;

        let fraction_centavos = match fraction.len() {
            0 => 0,
            len => {
                let digits: u64 = fraction
                    .parse()
                    .map_err(|_| MoneyParseError::Invalid(input.to_string()))?;
                if len == 1 { digits * 10 } else { digits }
            },
        };

        Ok(Self(whole.saturating_mul(100).saturating_add(fraction_centavos)))
    }

    /// Convert a floating-point peso amount, rounding to the centavo.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyParseError::Negative`] for negative or non-finite
    /// amounts.
    pub fn from_pesos_f64(pesos: f64) -> Result<Self, MoneyParseError> {
        if !pesos.is_finite() || pesos < 0.0 {
            return Err(MoneyParseError::Negative(pesos));
        }
        // Amounts in this domain fit comfortably in the u64 range.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self((pesos * 100.0).round() as u64))
    }
}

impl std::ops::Add for Centavos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Centavos {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl std::iter::Sum for Centavos {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl fmt::Display for Centavos {
    /// Formats as `₱1,234.56`, matching the amounts users see on screen.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pesos = self.0 / 100;
        let centavos = self.0 % 100;

        let digits = pesos.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        write!(f, "₱{grouped}.{centavos:02}")
    }
}

/// Failure to interpret a wire value as a peso amount.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoneyParseError {
    /// The string was not a non-negative decimal amount.
    #[error("invalid peso amount: {0:?}")]
    Invalid(String),

    /// The number was negative or not finite.
    #[error("peso amounts cannot be negative: {0}")]
    Negative(f64),
}

impl Serialize for Centavos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}.{:02}", self.0 / 100, self.0 % 100))
    }
}

impl<'de> Deserialize<'de> for Centavos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PesoVisitor;

        impl Visitor<'_> for PesoVisitor {
            type Value = Centavos;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a peso amount as a number or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Centavos, E> {
                Ok(Centavos::from_pesos(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Centavos, E> {
                u64::try_from(v)
                    .map(Centavos::from_pesos)
                    .map_err(|_| E::custom("peso amounts cannot be negative"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Centavos, E> {
                Centavos::from_pesos_f64(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Centavos, E> {
                Centavos::parse_pesos(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PesoVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_laravel_decimal_strings() {
        assert_eq!(Centavos::parse_pesos("20.00"), Ok(Centavos::new(2000)));
        assert_eq!(Centavos::parse_pesos("20.5"), Ok(Centavos::new(2050)));
        assert_eq!(Centavos::parse_pesos("200"), Ok(Centavos::from_pesos(200)));
        assert_eq!(Centavos::parse_pesos("1,500.00"), Ok(Centavos::from_pesos(1500)));
        assert_eq!(Centavos::parse_pesos("₱5,000.00"), Ok(Centavos::from_pesos(5000)));
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert!(Centavos::parse_pesos("").is_err());
        assert!(Centavos::parse_pesos("-20").is_err());
        assert!(Centavos::parse_pesos("20.005").is_err());
        assert!(Centavos::parse_pesos("abc").is_err());
        assert!(Centavos::from_pesos_f64(-1.0).is_err());
        assert!(Centavos::from_pesos_f64(f64::NAN).is_err());
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_int: Centavos = serde_json::from_str("200").unwrap();
        let from_float: Centavos = serde_json::from_str("200.5").unwrap();
        let from_string: Centavos = serde_json::from_str("\"200.50\"").unwrap();

        assert_eq!(from_int, Centavos::from_pesos(200));
        assert_eq!(from_float, Centavos::new(20050));
        assert_eq!(from_string, Centavos::new(20050));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Centavos::new(20050)).unwrap();
        assert_eq!(json, "\"200.50\"");
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Centavos::from_pesos(5000).to_string(), "₱5,000.00");
        assert_eq!(Centavos::new(123_456_789).to_string(), "₱1,234,567.89");
        assert_eq!(Centavos::ZERO.to_string(), "₱0.00");
    }

    proptest! {
        #[test]
        fn addition_matches_centavo_sum(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let sum = Centavos::new(a) + Centavos::new(b);
            prop_assert_eq!(sum.centavos(), a + b);
        }

        #[test]
        fn times_matches_multiplication(price in 0u64..100_000, qty in 0u32..1_000) {
            let total = Centavos::new(price).times(qty);
            prop_assert_eq!(total.centavos(), price * u64::from(qty));
        }

        #[test]
        fn serde_round_trips(centavos in 0u64..100_000_000) {
            let amount = Centavos::new(centavos);
            let json = serde_json::to_string(&amount).unwrap();
            let back: Centavos = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(amount, back);
        }
    }
}
