//! # Quantities
//!
//! Steel is counted in whole grams so that balance arithmetic is exact.
//! On the wire a quantity is a decimal number of kilograms; requests may
//! also send it as a numeric string.

use crate::errors::ValidationError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;

/// Grams per kilogram.
pub const GRAMS_PER_KG: u64 = 1_000;

/// A non-negative amount of steel, stored as grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Self = Self(0);

    pub const fn from_grams(grams: u64) -> Self {
        Self(grams)
    }

    pub const fn from_kg(kg: u64) -> Self {
        Self(kg.saturating_mul(GRAMS_PER_KG))
    }

    /// Converts a decimal kilogram value, rounding to the nearest gram.
    pub fn from_kg_f64(kg: f64) -> Result<Self, ValidationError> {
        if !kg.is_finite() || kg < 0.0 {
            return Err(ValidationError::InvalidQuantity(kg.to_string()));
        }
        let grams = (kg * GRAMS_PER_KG as f64).round();
        if grams > u64::MAX as f64 {
            return Err(ValidationError::InvalidQuantity(kg.to_string()));
        }
        Ok(Self(grams as u64))
    }

    /// Parses a decimal kilogram string such as `"12.5"`.
    pub fn parse_kg(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let kg: f64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidQuantity(trimmed.to_string()))?;
        Self::from_kg_f64(kg)
    }

    /// Same as [`Quantity::from_kg_f64`] but also rejects zero.
    pub fn positive_kg(kg: f64, field: &'static str) -> Result<Self, ValidationError> {
        let qty = Self::from_kg_f64(kg)?;
        if qty.is_zero() {
            return Err(ValidationError::NotPositive { field });
        }
        Ok(qty)
    }

    pub const fn grams(self) -> u64 {
        self.0
    }

    pub fn as_kg(self) -> f64 {
        self.0 as f64 / GRAMS_PER_KG as f64
    }

    /// Whole kilograms, rounded down.
    pub const fn whole_kg(self) -> u64 {
        self.0 / GRAMS_PER_KG
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Signed delta in grams, for ledger entries.
    pub fn as_delta(self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / GRAMS_PER_KG;
        let frac = self.0 % GRAMS_PER_KG;
        if frac == 0 {
            write!(f, "{whole} kg")
        } else {
            let digits = format!("{frac:03}");
            write!(f, "{whole}.{} kg", digits.trim_end_matches('0'))
        }
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_kg())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KgVisitor;

        impl<'de> Visitor<'de> for KgVisitor {
            type Value = Quantity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative number of kilograms")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
                v.checked_mul(GRAMS_PER_KG)
                    .map(Quantity)
                    .ok_or_else(|| E::custom("quantity out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
                let v = u64::try_from(v).map_err(|_| E::custom("quantity must not be negative"))?;
                self.visit_u64(v)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
                Quantity::from_kg_f64(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
                Quantity::parse_kg(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(KgVisitor)
    }
}
