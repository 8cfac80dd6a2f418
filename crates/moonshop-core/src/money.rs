//! # Money Module
//!
//! Provides the `Money` type for storefront prices.
//!
//! ## Whole Currency Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The storefront sells in Argentine pesos and never shows centavos.     │
//! │                                                                         │
//! │    Product.price = 12000        → displayed as "$12.000"               │
//! │    line total    = 12000 × 3    → "$36.000"                            │
//! │                                                                         │
//! │  Prices are integers end to end. Grouping uses "." as the thousands   │
//! │  separator, the way the checkout message has always rendered them.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use moonshop_core::money::Money;
//!
//! let price = Money::from_units(12000);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.to_string(), "$36.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► CartItem.price ──► CartItem.line_total() ──► Cart.total()
///                                                                   │
///                                          checkout message "$36.000" ◄┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a cart quantity.
    ///
    /// Saturates instead of overflowing; a cart line is capped far below
    /// the point where this matters.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `$12.345` style amounts (`.` groups thousands).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}${grouped}")
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "$0");
        assert_eq!(Money::from_units(999).to_string(), "$999");
        assert_eq!(Money::from_units(1000).to_string(), "$1.000");
        assert_eq!(Money::from_units(12345).to_string(), "$12.345");
        assert_eq!(Money::from_units(1234567).to_string(), "$1.234.567");
        assert_eq!(Money::from_units(-4500).to_string(), "-$4.500");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(500);

        assert_eq!((a + b).units(), 1500);
        assert_eq!((a * 3).units(), 3000);

        let mut total = Money::zero();
        total += a;
        assert_eq!(total, a);
    }

    #[test]
    fn test_sum_of_lines() {
        let total: Money = [100, 250, 650].into_iter().map(Money::from_units).sum();
        assert_eq!(total.units(), 1000);
        assert!(Money::default().is_zero());
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let huge = Money::from_units(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(4).units(), i64::MAX);
    }
}
