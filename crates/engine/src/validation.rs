//! Field rules shared by every entity type.
//!
//! [`ValidationRules`] is a single immutable value handed to the engine when
//! it is built; clubs, players and coaches are all checked against the same
//! forbidden-character set and limits. Each `check_*` function returns either
//! the normalized value or a human readable message, and [`Violations::check`]
//! files the message under the field it belongs to.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    ops::RangeInclusive,
};

use serde::Serialize;

use crate::{BudgetPolicy, Money, ResultEngine};

/// Canonical field names used as keys in [`Violations`].
///
/// They are also the wire names of the request payloads.
pub mod field {
    pub const CLUB: &str = "id_club";
    pub const NAME: &str = "nombre";
    pub const SURNAME: &str = "apellidos";
    pub const FOUNDED: &str = "fundacion";
    pub const CITY: &str = "ciudad";
    pub const STADIUM: &str = "estadio";
    pub const BUDGET: &str = "presupuesto";
    pub const SHIRT_NUMBER: &str = "dorsal";
    pub const SALARY: &str = "salario";
    pub const NATIONAL_ID: &str = "dni";
}

/// Characters never accepted in names, cities and stadiums.
pub const DEFAULT_FORBIDDEN_CHARS: &[char] = &[
    ',', '.', ';', ':', '!', '?', '¡', '¿', '"', '\'', '-', '_', '+', '#', '$', '%', '&', '/', '(',
    ')', '=', '*', '^', '~', '`', '{', '}', '[', ']', '|', '\\', '@', '<', '>',
];

/// Which rule a rejected field broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Missing, malformed or out-of-range value, or an immutable field changed.
    Structural,
    /// Duplicate code, national id, club name, shirt number or coach slot.
    Uniqueness,
    /// Not enough remaining budget.
    Budget,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

/// Per-field validation failures, keyed by [`field`] name.
///
/// Only the first failure of a field is kept: later checks on the same field
/// usually depend on the earlier one passing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(BTreeMap<&'static str, Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, kind: ViolationKind, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| Violation {
            kind,
            message: message.into(),
        });
    }

    pub fn structural(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(field, ViolationKind::Structural, message);
    }

    pub fn uniqueness(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(field, ViolationKind::Uniqueness, message);
    }

    pub fn budget(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(field, ViolationKind::Budget, message);
    }

    /// Records a structural failure, or hands back the checked value.
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.structural(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Violation)> {
        self.0.iter().map(|(field, violation)| (*field, violation))
    }

    /// Returns `true` when every violation is of `kind`.
    pub fn all_of_kind(&self, kind: ViolationKind) -> bool {
        !self.is_empty() && self.0.values().all(|v| v.kind == kind)
    }

    /// Flattens to `field -> message`, the shape returned to callers.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, v)| ((*field).to_string(), v.message.clone()))
            .collect()
    }

    /// `Ok(())` when nothing was recorded, otherwise a rejection.
    pub fn into_result(self) -> ResultEngine<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, violation) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", violation.message)?;
        }
        Ok(())
    }
}

/// Limits and character sets applied by the assignment validator.
#[derive(Clone, Debug)]
pub struct ValidationRules {
    pub forbidden_chars: BTreeSet<char>,
    pub budget_policy: BudgetPolicy,
    pub min_founding_year: i32,
    pub name_len: RangeInclusive<usize>,
    pub code_len: RangeInclusive<usize>,
    pub shirt_numbers: RangeInclusive<i64>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            forbidden_chars: DEFAULT_FORBIDDEN_CHARS.iter().copied().collect(),
            budget_policy: BudgetPolicy::default(),
            min_founding_year: 1857,
            name_len: 2..=50,
            code_len: 3..=5,
            shirt_numbers: 1..=99,
        }
    }
}

impl ValidationRules {
    pub fn with_budget_policy(mut self, policy: BudgetPolicy) -> Self {
        self.budget_policy = policy;
        self
    }

    pub fn with_forbidden_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.forbidden_chars = chars.into_iter().collect();
        self
    }

    fn has_forbidden_char(&self, value: &str) -> bool {
        value.chars().any(|c| self.forbidden_chars.contains(&c))
    }

    /// Shared rules for free text: required, no leading whitespace, no
    /// forbidden characters, no digits.
    fn check_text(&self, value: Option<&str>, label: &str) -> Result<String, String> {
        let value = value.ok_or_else(|| format!("{label} is required"))?;
        if value.trim().is_empty() {
            return Err(format!("{label} is required"));
        }
        if value.starts_with(char::is_whitespace) {
            return Err(format!("{label} must not start with whitespace"));
        }
        if self.has_forbidden_char(value) {
            return Err(format!("{label} must not contain special characters"));
        }
        if value.chars().any(|c| c.is_ascii_digit()) {
            return Err(format!("{label} must not contain digits"));
        }
        Ok(value.trim_end().to_string())
    }

    /// First name / surname of a player or coach.
    pub fn check_person_name(&self, value: Option<&str>, label: &str) -> Result<String, String> {
        let value = self.check_text(value, label)?;
        let len = value.chars().count();
        if !self.name_len.contains(&len) {
            return Err(format!(
                "{label} must be between {} and {} characters",
                self.name_len.start(),
                self.name_len.end()
            ));
        }
        Ok(value)
    }

    /// Club name, city and stadium.
    pub fn check_place_text(&self, value: Option<&str>, label: &str) -> Result<String, String> {
        self.check_text(value, label)
    }

    /// Club code: fixed length range, no whitespace.
    pub fn check_code(&self, value: Option<&str>) -> Result<String, String> {
        let value = value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| "club code is required".to_string())?;
        if value.chars().any(char::is_whitespace) {
            return Err("club code must not contain whitespace".to_string());
        }
        let len = value.chars().count();
        if !self.code_len.contains(&len) {
            return Err(format!(
                "club code must be between {} and {} characters",
                self.code_len.start(),
                self.code_len.end()
            ));
        }
        Ok(value.to_string())
    }

    pub fn check_founding_year(&self, year: Option<i64>, current_year: i32) -> Result<i32, String> {
        let year = year.ok_or_else(|| "founding year is required".to_string())?;
        if year < i64::from(self.min_founding_year) || year > i64::from(current_year) {
            return Err(format!(
                "founding year must be between {} and {current_year}",
                self.min_founding_year
            ));
        }
        i32::try_from(year).map_err(|_| "founding year is out of range".to_string())
    }

    /// Salary or budget: numeric and strictly positive.
    pub fn check_amount(&self, raw: Option<&str>, label: &str) -> Result<Money, String> {
        let raw = raw
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| format!("{label} is required"))?;
        let amount: Money = raw
            .parse()
            .map_err(|_| format!("{label} must be a number with at most two decimals"))?;
        if !amount.is_positive() {
            return Err(format!("{label} must be greater than 0"));
        }
        Ok(amount)
    }

    pub fn check_shirt_number(&self, number: Option<i64>) -> Result<i32, String> {
        let number = number.ok_or_else(|| "shirt number is required".to_string())?;
        if !self.shirt_numbers.contains(&number) {
            return Err(format!(
                "shirt number must be between {} and {}",
                self.shirt_numbers.start(),
                self.shirt_numbers.end()
            ));
        }
        i32::try_from(number).map_err(|_| "shirt number is out of range".to_string())
    }

    /// National id: 8 digits followed by one uppercase letter.
    pub fn check_national_id(&self, value: Option<&str>) -> Result<String, String> {
        let value = value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| "national id is required".to_string())?;
        if !is_national_id(value) {
            return Err(
                "national id must be 8 digits followed by an uppercase letter".to_string(),
            );
        }
        Ok(value.to_string())
    }
}

fn is_national_id(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 9
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8].is_ascii_uppercase()
}
