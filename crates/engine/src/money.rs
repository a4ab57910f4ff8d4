use std::{
    fmt,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use crate::EngineError;

/// Budgets and salaries, in integer cents.
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!(Money::new(12_34).to_string(), "12.34");
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// 99 999 999 999.99, so a whole roster sums far below `i64::MAX`.
    pub const MAX: Money = Money(9_999_999_999_999);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let abs = self.0.unsigned_abs();
        write!(f, "{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money(iter.map(Money::cents).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Parses a run of ASCII digits; `None` for anything else, including "".
fn digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl FromStr for Money {
    type Err = EngineError;

    /// `1500`, `1500.5`, `1500,50`, with an optional sign. At most two
    /// decimals, and no more than [`Money::MAX`] in absolute value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reject = |reason: &str| EngineError::InvalidAmount(format!("'{}': {reason}", s.trim()));

        let text = s.trim();
        let (negative, text) = match text.as_bytes().first() {
            Some(b'-') => (true, text[1..].trim_start()),
            Some(b'+') => (false, text[1..].trim_start()),
            Some(_) => (false, text),
            None => return Err(reject("empty amount")),
        };

        let (whole, fraction) = match text.find(['.', ',']) {
            Some(at) => (&text[..at], &text[at + 1..]),
            None => (text, ""),
        };
        let whole = digits(whole).ok_or_else(|| reject("not a number"))?;
        let fraction = match fraction.len() {
            0 => 0,
            1 => digits(fraction).ok_or_else(|| reject("not a number"))? * 10,
            2 => digits(fraction).ok_or_else(|| reject("not a number"))?,
            _ => return Err(reject("more than two decimals")),
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .filter(|c| *c <= Money::MAX.0)
            .ok_or_else(|| reject("amount too large"))?;
        Ok(Money(if negative { -cents } else { cents }))
    }
}
