//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Purchase bills add up dozens of lines, each with SGST and CGST:       │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A bill total that drifts by a paisa no longer reconciles with the     │
//! │  sum of its lines, and vendor statements stop matching.                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹1,180.00 = 118000 paise                                             │
//! │    Every percentage is applied once, rounded once, then summed.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use challan_core::money::Money;
//! use challan_core::types::Rate;
//!
//! let taxable = Money::from_rupees(1000);
//! let sgst = taxable.tax_component(Rate::from_percent(18)); // half of 18%
//! assert_eq!(sgst, Money::from_rupees(90));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1 ₹ = 100 paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: Reversals and negative remaining balances are legal
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a bare integer**: `{"amount": 118000}`
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  StockInLine.unit_price ──► ChallanProduct.total_price                  │
/// │                                   │                                     │
/// │                                   ▼                                     │
/// │  PurchaseBillProduct.rate ──► taxable ──► sgst/cgst ──► line total      │
/// │                                                             │           │
/// │  BillTotals.total ◄─────────────────────────────────────────┘           │
/// │        │                                                                │
/// │        ▼                                                                │
/// │  remaining = total − advance ──► LedgerEntry.amount ──► PaymentHistory  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use challan_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ```rust
    /// use challan_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_paise(10, 99).paise(), 1099);
    /// assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
    /// ```
    ///
    /// For negative amounts only the rupee part carries the sign.
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage to this amount, rounding half away from zero.
    ///
    /// Used for line discounts (`quantity × rate × discount / 100`) and for
    /// the fixed-rate tax components.
    ///
    /// ```rust
    /// use challan_core::money::Money;
    /// use challan_core::types::Rate;
    ///
    /// let gross = Money::from_rupees(1000);
    /// assert_eq!(gross.percent_of(Rate::from_percent(10)), Money::from_rupees(100));
    /// // ₹0.05 at 10% = 0.5 paise → 1 paisa
    /// assert_eq!(Money::from_paise(5).percent_of(Rate::from_percent(10)).paise(), 1);
    /// ```
    pub fn percent_of(&self, rate: Rate) -> Money {
        // i128 keeps large bills from overflowing before the division
        let scaled = self.0 as i128 * rate.bps() as i128;
        Money(round_div(scaled, 10_000) as i64)
    }

    /// Returns one GST component (SGST or CGST) for a combined GST rate.
    ///
    /// GST is split evenly between state and central components, so each
    /// component is `amount × (rate / 2) / 100`. Dividing once by 20000
    /// keeps odd basis-point rates exact until the final rounding.
    ///
    /// ```rust
    /// use challan_core::money::Money;
    /// use challan_core::types::Rate;
    ///
    /// let taxable = Money::from_rupees(500);
    /// assert_eq!(taxable.tax_component(Rate::from_percent(12)), Money::from_rupees(30));
    /// ```
    pub fn tax_component(&self, gst_rate: Rate) -> Money {
        let scaled = self.0 as i128 * gst_rate.bps() as i128;
        Money(round_div(scaled, 20_000) as i64)
    }

    /// Multiplies a unit price by a quantity, or `None` if the product
    /// does not fit in an i64.
    ///
    /// ```rust
    /// use challan_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(50).checked_multiply_quantity(3), Some(Money::from_rupees(150)));
    /// assert_eq!(Money::from_paise(i64::MAX / 4).checked_multiply_quantity(5), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }
}

/// Integer division rounding half away from zero.
fn round_div(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `₹1180.00`. Grouping and localisation belong to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_rupees_paise() {
        assert_eq!(Money::from_rupees_paise(10, 99).paise(), 1099);
        assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
        assert_eq!(Money::from_rupees(12).paise(), 1200);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(118000).to_string(), "₹1180.00");
        assert_eq!(Money::from_paise(5).to_string(), "₹0.05");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!(a + b, Money::from_rupees(15));
        assert_eq!(a - b, Money::from_rupees(5));
        assert_eq!(b - a, Money::from_rupees(-5));
        assert_eq!(-a, Money::from_rupees(-10));
        assert_eq!(a * 3, Money::from_rupees(30));
    }

    #[test]
    fn test_checked_multiply_quantity() {
        let unit = Money::from_rupees(250);
        assert_eq!(unit.checked_multiply_quantity(4), Some(Money::from_rupees(1000)));
        assert_eq!(unit.checked_multiply_quantity(0), Some(Money::zero()));
        assert_eq!(Money::from_paise(i64::MAX / 4).checked_multiply_quantity(10), None);
        assert_eq!(Money::from_paise(i64::MIN).checked_multiply_quantity(-1), None);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_rupees(1), Money::from_rupees(2), Money::from_paise(50)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.paise(), 350);
    }

    #[test]
    fn test_nine_percent_component() {
        let taxable = Money::from_rupees(1000);
        assert_eq!(taxable.percent_of(Rate::from_bps(900)), Money::from_rupees(90));
        assert_eq!(taxable.tax_component(Rate::from_percent(18)), Money::from_rupees(90));
    }

    #[test]
    fn test_tax_component_rounding() {
        // ₹3.33 at 9% = 29.97 paise → 30
        let taxable = Money::from_paise(333);
        assert_eq!(taxable.tax_component(Rate::from_percent(18)).paise(), 30);

        // Odd basis points: ₹100 at 5.01% → 250.5 paise each half → 251
        let taxable = Money::from_rupees(100);
        assert_eq!(taxable.tax_component(Rate::from_bps(501)).paise(), 251);
    }

    #[test]
    fn test_negative_rounding_is_symmetric() {
        let reversal = Money::from_paise(-5);
        assert_eq!(reversal.percent_of(Rate::from_percent(10)).paise(), -1);
        assert_eq!(Money::from_paise(5).percent_of(Rate::from_percent(10)).paise(), 1);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_paise(1).is_positive());
        assert!(Money::from_paise(-1).is_negative());
        assert_eq!(Money::from_paise(-250).abs().paise(), 250);
    }
}
