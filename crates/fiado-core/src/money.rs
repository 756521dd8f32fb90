//! # Money Module
//!
//! Provides `Money` (integer cents) and `Quantity` (integer thousandths).
//!
//! ## Why Integers?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  A debt summed from a hundred fiado sales drifts by fractions of a     │
//! │  cent and "R$ 0.00" stops comparing equal to zero.                     │
//! │                                                                         │
//! │  OUR SOLUTION                                                           │
//! │    Money    = i64 cents         R$ 12.50  → 1250                        │
//! │    Quantity = i64 thousandths   1.250 kg  → 1250                        │
//! │    Rounding happens once, when a quantity is priced.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiado_core::money::{Money, Quantity};
//!
//! let price: Money = "8,00".parse().unwrap();
//! let qty: Quantity = "1.25".parse().unwrap();
//! assert_eq!(price.times_quantity(qty).unwrap(), Money::from_cents(1000));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate differences (debt minus payments) may go
///   negative before being floored
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating arithmetic**: `+`, `-` and `sum()` clamp at the i64 range
///   instead of wrapping or panicking
///
/// ## Where Money Flows
/// ```text
/// Product.price_cents ──► times_quantity(qty) ──► Sale.total_cents
///                                                      │
/// Payment.amount_cents ─────────────────┐              │
///                                       ▼              ▼
///                               balance::client_debt / global_summary
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// For negative amounts only the major unit carries the sign.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
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

    /// Clamps negative values to zero.
    ///
    /// Every total the ledger exposes passes through here.
    ///
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-250).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_cents(250).floor_zero().cents(), 250);
    /// ```
    #[inline]
    pub const fn floor_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Prices a quantity at this unit price.
    ///
    /// ## Rounding
    /// `cents × milli / 1000`, rounded half away from zero, computed in i128
    /// so large quantities cannot overflow the intermediate product.
    ///
    /// ```text
    /// R$ 7.99/kg × 0.333 kg = 266.067 cents → 266 → R$ 2.66
    /// R$ 2.50/un × 3 un     = 750 cents           → R$ 7.50
    /// ```
    ///
    /// ## Returns
    /// * `Err(ValidationError::InvalidFormat)` - The total does not fit in
    ///   an `i64` of cents
    pub fn times_quantity(&self, qty: Quantity) -> Result<Money, ValidationError> {
        let product = self.0 as i128 * qty.milli() as i128;
        let rounded = if product >= 0 {
            (product + 500) / 1000
        } else {
            (product - 500) / 1000
        };
        i64::try_from(rounded)
            .map(Money)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "total".to_string(),
                reason: "number too large".to_string(),
            })
    }
}

/// Shows `R$ 10.99`; the shell localizes separators for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

/// Parses operator input: `"12"`, `"12.5"`, `"12,50"`, `"-3.10"`.
///
/// At most two fractional digits; either `.` or `,` separates them.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, 2, "amount").map(Money)
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
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
// Quantity Type
// =============================================================================

/// A sold quantity in thousandths of the sale's unit.
///
/// `Quantity::from_milli(1250)` is 1.25 kg for a kg sale or 1.25 units for a
/// unit sale. Whole units are `Quantity::units(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Number of thousandths in one whole unit.
    pub const SCALE: i64 = 1000;

    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    #[inline]
    pub const fn units(whole: i64) -> Self {
        Quantity(whole * Self::SCALE)
    }

    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// Shows the shortest exact decimal: `1.25`, `3`, `0.005`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = (self.0 / Self::SCALE).abs();
        let frac = (self.0 % Self::SCALE).abs();
        if frac == 0 {
            return write!(f, "{}{}", sign, whole);
        }
        let digits = format!("{:03}", frac);
        write!(f, "{}{}.{}", sign, whole, digits.trim_end_matches('0'))
    }
}

/// Parses `"3"`, `"1.25"`, `"0,5"`; at most three fractional digits.
impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, 3, "quantity").map(Quantity)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal string into an integer scaled by `10^decimals`.
fn parse_scaled(input: &str, decimals: u32, field: &str) -> Result<i64, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut parts = body.splitn(2, ['.', ',']);
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next().unwrap_or_default();

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("no digits"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected a decimal number"));
    }
    if frac.len() > decimals as usize {
        return Err(invalid(&format!("at most {} decimal places", decimals)));
    }

    let scale = 10_i64.pow(decimals);
    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("number too large"))?
    };
    let frac_value: i64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse().map_err(|_| invalid("number too large"))?
    };

    let value = whole_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| invalid("number too large"))?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Unit Tests
// =============================================================================
