use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use crate::EngineError;

/// Largest magnitude, in whole units, accepted from user input.
///
/// Sums of accepted amounts stay far from the `Decimal` range.
pub const MAX_UNITS: i64 = 1_000_000_000_000_000;

/// Signed money amount backed by an exact decimal.
///
/// Use this type for **all** monetary values in the engine (costs, shares,
/// balances, transfers). Shares are obtained by exact decimal division, so
/// `300 / 3` is exactly `100` and `100 / 3` keeps its full precision until the
/// ledger rounds it to whole units.
///
/// The value is signed:
/// - positive = the participant is owed money
/// - negative = the participant owes money
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::from_units(12);
/// assert_eq!(amount.to_string(), "12.00");
/// assert_eq!(amount.split(4), Some(Money::from_units(3)));
/// assert_eq!(amount.split(0), None);
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10,5".parse::<Money>().unwrap().to_string(), "10.50");
/// assert!("ten".parse::<Money>().is_err());
/// assert_eq!(Money::parse_lenient("ten"), Money::ZERO);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Largest magnitude accepted from user input (see [`MAX_UNITS`]).
    #[must_use]
    pub fn max() -> Money {
        Money::from_units(MAX_UNITS)
    }

    /// Creates an amount of whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// `true` if the magnitude does not exceed [`Money::max`].
    #[must_use]
    pub fn is_within_limit(self) -> bool {
        self.0.abs() <= Decimal::from(MAX_UNITS)
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    #[must_use]
    pub fn abs(self) -> Money {
        Money(self.0.abs())
    }

    /// Splits the amount evenly across `count` parts.
    ///
    /// Returns `None` when `count` is 0 instead of producing an invalid value.
    #[must_use]
    pub fn split(self, count: usize) -> Option<Money> {
        if count == 0 {
            return None;
        }
        self.0.checked_div(Decimal::from(count)).map(Money)
    }

    /// Rounds to whole currency units, halves away from zero.
    #[must_use]
    pub fn round_units(self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Parses user input, degrading anything unparseable to zero.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Money {
        raw.parse().unwrap_or(Money::ZERO)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.2}")
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self::from_units(value)
    }
}

/// Arithmetic saturates at the `Decimal` bounds instead of panicking.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Rejects empty strings, thousands separators, anything non-numeric and
    /// magnitudes above [`MAX_UNITS`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let normalized = trimmed.replace(',', ".");
        let unsigned = normalized
            .strip_prefix(['+', '-'])
            .unwrap_or(normalized.as_str());
        let valid = !unsigned.is_empty()
            && unsigned.chars().all(|c| c.is_ascii_digit() || c == '.')
            && unsigned.chars().filter(|c| *c == '.').count() <= 1
            && unsigned.chars().any(|c| c.is_ascii_digit());
        if !valid {
            return Err(EngineError::InvalidAmount(format!(
                "invalid amount: {trimmed}"
            )));
        }

        let amount = Decimal::from_str(normalized.trim_start_matches('+'))
            .map(Money)
            .map_err(|err| EngineError::InvalidAmount(format!("{trimmed}: {err}")))?;
        if !amount.is_within_limit() {
            return Err(EngineError::InvalidAmount(format!(
                "amount too large: {trimmed}"
            )));
        }
        Ok(amount)
    }
}

/// Accepts any JSON value and never fails on it: anything that is not a
/// number (or a string holding one) becomes [`Money::ZERO`].
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
            Other(serde::de::IgnoredAny),
        }

        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Raw::Number(number)) => Money::parse_lenient(&number.to_string()),
            Some(Raw::Text(text)) => Money::parse_lenient(&text),
            Some(Raw::Other(_)) | None => Money::ZERO,
        })
    }
}
