//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many retail systems:                                                │
//! │    R$ 10.00 / 3 = R$ 3.33 (×3 = R$ 9.99)  → Lost R$ 0.01!              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    1000 centavos / 3 = 333 centavos (×3 = 999 centavos)                │
//! │    We KNOW we lost 1 centavo, and handle it explicitly                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The one place floating point meets money is weighed goods: a 0.540 kg
//! scoop of ração has an f64 quantity, and the line total rounds to the
//! nearest centavo exactly once, in [`Money::scale`].
//!
//! ## Usage
//! ```rust
//! use pawshop_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(1850); // R$ 18.50
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // R$ 37.00
//! let total = price + Money::from_cents(500);   // R$ 23.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::FeeRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for adjustments and deltas
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price_cents ──┬──► CartItem.unit_price ──► CartItem.line_total │
/// │                        │                                                │
/// │                        └──► Displayed as "R$ 18.50" on the register     │
/// │                                                                         │
/// │  Cart total ──► Tendered payments ──► Change ──► Method fees            │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use pawshop_core::money::Money;
    ///
    /// let price = Money::from_cents(1850); // Represents R$ 18.50
    /// assert_eq!(price.cents(), 1850);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// ## Example
    /// ```rust
    /// use pawshop_core::money::Money;
    ///
    /// let price = Money::from_major_minor(18, 50); // R$ 18.50
    /// assert_eq!(price.cents(), 1850);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -R$ 5.50, not -R$ 4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero. Used for change due: tendering less
    /// than the total never produces negative change.
    #[inline]
    pub const fn max_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Scales money by an f64 quantity and rounds to the nearest centavo.
    ///
    /// This is the ONLY bridge between weights and money: a per-kg price
    /// times a fractional quantity becomes a line total here, rounded once.
    ///
    /// ## Example
    /// ```rust
    /// use pawshop_core::money::Money;
    ///
    /// let per_kg = Money::from_cents(1850); // R$ 18.50/kg
    /// let line = per_kg.scale(0.540_540_5);
    /// assert_eq!(line.cents(), 1000); // R$ 10.00
    /// ```
    #[inline]
    pub fn scale(&self, quantity: f64) -> Money {
        Money((self.0 as f64 * quantity).round() as i64)
    }

    /// Calculates a payment-method fee with round-half-up on the half centavo.
    ///
    /// ## Implementation
    /// We use integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use pawshop_core::money::Money;
    /// use pawshop_core::types::FeeRate;
    ///
    /// let amount = Money::from_cents(10000); // R$ 100.00
    /// let rate = FeeRate::from_bps(190);     // 1.9% (débito)
    ///
    /// let fee = amount.calculate_fee(rate);
    /// assert_eq!(fee.cents(), 190); // R$ 1.90
    /// ```
    pub fn calculate_fee(&self, rate: FeeRate) -> Money {
        // i128 prevents overflow on large amounts
        let fee_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(fee_cents as i64)
    }

    /// Returns `self × part ÷ whole`, rounded to the nearest centavo.
    /// Zero when `whole` is zero.
    ///
    /// ## Where This Is Used
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Split payments: slice of the TOTAL settled by one tender           │
    /// │      share = total.prorate(tender_amount, total_paid)               │
    /// │      (so change, the overpaid part, is never fee-bearing)           │
    /// │                                                                     │
    /// │  Reports: slice of a sale's fee attributed to a category filter     │
    /// │      allocated = sale_fee.prorate(filtered_revenue, sale_total)     │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn prorate(&self, part: Money, whole: Money) -> Money {
        if whole.is_zero() {
            return Money::zero();
        }
        let scaled = self.0 as i128 * part.0 as i128;
        let denom = whole.0 as i128;
        // round half away from zero
        let half = denom / 2;
        Money::from_cents(((scaled + half) / denom) as i64)
    }

    /// Multiplies money by an integer quantity (whole units).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is the format printed on receipts and the register screen.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.reais().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Parses amounts typed at the register: "18.50", "18,50", "18", "R$ 18.50".
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_start_matches("R$")
            .trim()
            .replace(',', ".");

        let invalid = || ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a valid amount", s.trim()),
        };

        if cleaned.is_empty() {
            return Err(invalid());
        }

        let (sign, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, cleaned.as_str()),
        };

        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major.is_empty() && minor.is_empty() {
            return Err(invalid());
        }
        if !major.chars().all(|c| c.is_ascii_digit()) || minor.len() > 2 {
            return Err(invalid());
        }
        if !minor.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| invalid())?
        };
        // "5" after the dot means 50 centavos, "05" means 5
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => minor.parse().map_err(|_| invalid())?,
        };

        Ok(Money::from_cents(sign * (major * 100 + minor)))
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing an iterator of Money values (cart totals, report accumulators).
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
    fn test_from_cents() {
        let money = Money::from_cents(1850);
        assert_eq!(money.cents(), 1850);
        assert_eq!(money.reais(), 18);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(18, 50);
        assert_eq!(money.cents(), 1850);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1850)), "R$ 18.50");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$ 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 399]
            .iter()
            .map(|c| Money::from_cents(*c))
            .sum();
        assert_eq!(total.cents(), 749);
    }

    #[test]
    fn test_parse() {
        assert_eq!("18.50".parse::<Money>().unwrap().cents(), 1850);
        assert_eq!("18,50".parse::<Money>().unwrap().cents(), 1850);
        assert_eq!("18".parse::<Money>().unwrap().cents(), 1800);
        assert_eq!("R$ 18.50".parse::<Money>().unwrap().cents(), 1850);
        assert_eq!("0.5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(".50".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("-3.25".parse::<Money>().unwrap().cents(), -325);

        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn test_scale_weighed_line() {
        // R$ 18.50/kg × 2 kg = R$ 37.00
        let per_kg = Money::from_cents(1850);
        assert_eq!(per_kg.scale(2.0).cents(), 3700);

        // R$ 18.50/kg × 0.5405405 kg rounds back to the tendered R$ 10.00
        assert_eq!(per_kg.scale(10.0 / 18.5).cents(), 1000);
    }

    #[test]
    fn test_fee_calculation() {
        // R$ 100.00 at 1.9% = R$ 1.90
        let amount = Money::from_cents(10000);
        assert_eq!(amount.calculate_fee(FeeRate::from_bps(190)).cents(), 190);

        // R$ 18.50 at 3.5% = R$ 0.6475 → R$ 0.65 (rounded)
        let amount = Money::from_cents(1850);
        assert_eq!(amount.calculate_fee(FeeRate::from_bps(350)).cents(), 65);

        // Zero-fee methods (Dinheiro, Pix)
        assert_eq!(amount.calculate_fee(FeeRate::zero()).cents(), 0);
    }

    #[test]
    fn test_prorate() {
        let total = Money::from_cents(3700);
        let paid = Money::from_cents(4000);

        // A R$ 40.00 tender on a R$ 37.00 sale settles the whole total
        assert_eq!(total.prorate(paid, paid).cents(), 3700);

        // Half-and-half split settles half each
        let half = Money::from_cents(2000);
        assert_eq!(total.prorate(half, paid).cents(), 1850);

        // Degenerate whole
        assert_eq!(total.prorate(half, Money::zero()).cents(), 0);
    }

    #[test]
    fn test_prorate_splits_cover_total() {
        // 30 + 10 tendered on a 37.00 sale: shares are 27.75 + 9.25 = 37.00
        let total = Money::from_cents(3700);
        let paid = Money::from_cents(4000);
        let a = total.prorate(Money::from_cents(3000), paid);
        let b = total.prorate(Money::from_cents(1000), paid);
        assert_eq!(a.cents(), 2775);
        assert_eq!(b.cents(), 925);
        assert_eq!((a + b).cents(), total.cents());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.max_zero().cents(), 0);
        assert_eq!(positive.max_zero().cents(), 100);
    }

    /// Critical test: Verify that R$ 10.00 / 3 × 3 behaves as expected.
    /// This documents the intentional precision loss.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_cents(1000);
        let one_third = Money::from_cents(1000 / 3); // 333 centavos
        let reconstructed: Money = one_third * 3; // 999 centavos

        assert_eq!(reconstructed.cents(), 999);
        let lost = ten - reconstructed;
        assert_eq!(lost.cents(), 1);
    }
}
