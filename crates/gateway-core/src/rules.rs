//! Field-level validation rules.
//!
//! Each rule is a pure function over a single value. A [`RuleSet`] carries
//! the parameters (password policy, phone length, lifespan) and names the
//! field in the [`RuleViolation`] it returns, so request types can compose
//! rules in a fixed order with `?`:
//!
//! ```ignore
//! rules.email("email", &req.email)?;
//! rules.phone("phone", &req.phone)?;
//! rules.password("user_password", &req.user_password)?;
//! ```

use chrono::{Months, NaiveDate, Utc};
use validator::ValidateEmail;

use crate::errors::ApiError;

/// A failed rule: which field, and why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct RuleViolation {
    pub field: &'static str,
    pub reason: String,
}

impl RuleViolation {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl From<RuleViolation> for ApiError {
    fn from(violation: RuleViolation) -> Self {
        ApiError::validation(violation.to_string()).with_cause(violation.field)
    }
}

/// Minimum length plus a minimum number of character classes.
///
/// The classes are lowercase letters, uppercase letters, digits and
/// everything else (symbols, whitespace, non-ASCII).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub min_classes: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_classes: 3,
        }
    }
}

impl PasswordPolicy {
    pub fn check(&self, password: &str) -> Result<(), String> {
        let length = password.chars().count();

        let mut classes = [false; 4];
        for c in password.chars() {
            let idx = if c.is_ascii_lowercase() {
                0
            } else if c.is_ascii_uppercase() {
                1
            } else if c.is_ascii_digit() {
                2
            } else {
                3
            };
            classes[idx] = true;
        }
        let mixed = classes.iter().filter(|present| **present).count();

        if length < self.min_length || mixed < self.min_classes {
            return Err(format!(
                "password must be at least {} characters and mix at least {} of: lowercase, uppercase, digits, symbols",
                self.min_length, self.min_classes
            ));
        }

        Ok(())
    }
}

pub fn check_email(value: &str) -> Result<(), String> {
    const REASON: &str = "must be a mailbox address like name@example.com";

    if value.is_empty() || !value.validate_email() {
        return Err(REASON.to_string());
    }

    let domain = value.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
    let labelled = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if !labelled {
        return Err(REASON.to_string());
    }

    Ok(())
}

pub fn check_phone(value: &str, digits: usize) -> Result<(), String> {
    let well_formed = value.len() == digits
        && value.bytes().all(|b| b.is_ascii_digit())
        && !value.starts_with('0');

    if !well_formed {
        return Err(format!(
            "must be exactly {} digits with country code and no formatting characters",
            digits
        ));
    }

    Ok(())
}

pub fn check_birthday(value: &str, today: NaiveDate, max_age_years: u32) -> Result<(), String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "must be a calendar date in YYYY-MM-DD format".to_string())?;

    if date > today {
        return Err("cannot be in the future".to_string());
    }

    let earliest = today
        .checked_sub_months(Months::new(max_age_years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN);
    if date < earliest {
        return Err(format!("must be within the last {} years", max_age_years));
    }

    Ok(())
}

/// Parameters for the field rules, shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub password: PasswordPolicy,
    pub phone_digits: usize,
    pub max_age_years: u32,
    /// Fixed "today" for birth-date checks; `None` means the current UTC date.
    pub today: Option<NaiveDate>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            password: PasswordPolicy::default(),
            phone_digits: 12,
            max_age_years: 120,
            today: None,
        }
    }
}

impl RuleSet {
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn email(&self, field: &'static str, value: &str) -> Result<(), RuleViolation> {
        check_email(value).map_err(|reason| RuleViolation::new(field, reason))
    }

    pub fn phone(&self, field: &'static str, value: &str) -> Result<(), RuleViolation> {
        check_phone(value, self.phone_digits).map_err(|reason| RuleViolation::new(field, reason))
    }

    pub fn birthday(&self, field: &'static str, value: &str) -> Result<(), RuleViolation> {
        check_birthday(value, self.today(), self.max_age_years)
            .map_err(|reason| RuleViolation::new(field, reason))
    }

    pub fn password(&self, field: &'static str, value: &str) -> Result<(), RuleViolation> {
        self.password
            .check(value)
            .map_err(|reason| RuleViolation::new(field, reason))
    }
}
