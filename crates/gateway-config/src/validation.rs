use std::env;

/// Parameters of the field rules applied to request bodies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationConfig {
    pub password_min_length: usize,
    pub password_min_classes: usize,
    pub phone_digits: usize,
    pub max_age_years: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            password_min_classes: 3,
            phone_digits: 12,
            max_age_years: 120,
        }
    }
}

impl ValidationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            password_min_length: env::var("PASSWORD_MIN_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.password_min_length),
            // There are only four character classes to mix.
            password_min_classes: env::var("PASSWORD_MIN_CLASSES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.password_min_classes)
                .min(4),
            phone_digits: env::var("PHONE_DIGITS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.phone_digits),
            max_age_years: env::var("MAX_AGE_YEARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_age_years),
        }
    }
}
