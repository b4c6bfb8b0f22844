//! Run configuration and pre-flight validation.
//!
//! Every field is checked once, in `main`, before the browser launches.
//! A validation failure is fatal and must prevent any network activity.

use std::path::PathBuf;
use thiserror::Error;

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Athlete profile to scrape. A digit string, not an integer.
    pub athlete_id: String,
    /// Month tokens in `YYYYMM` form, in the order they will be fetched.
    pub months: Vec<String>,
    /// Account email used to log in.
    pub email: String,
    /// Account password used to log in.
    pub password: String,
    /// Where the result batch is written.
    pub output: PathBuf,
    /// Delay after navigation for client-side content to populate.
    pub settle_ms: u64,
    /// Minimum delay between page fetches.
    pub delay_ms: u64,
    /// Run the browser with a visible window.
    pub headful: bool,
}

/// A missing or invalid run-time parameter. Fatal, pre-network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("athlete id must be a non-empty digit string, got {0:?}")]
    InvalidAthleteId(String),
    #[error("at least one month is required")]
    NoMonths,
    #[error("month must be six digits in YYYYMM form, got {0:?}")]
    InvalidMonth(String),
    #[error("month part of {0:?} is outside 01-12")]
    MonthOutOfRange(String),
    #[error("email must contain '@', got {0:?}")]
    InvalidEmail(String),
    #[error("password must be non-empty")]
    EmptyPassword,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.athlete_id.is_empty() || !self.athlete_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidAthleteId(self.athlete_id.clone()));
        }
        if self.months.is_empty() {
            return Err(ConfigError::NoMonths);
        }
        for month in &self.months {
            if month.len() != 6 || !month.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::InvalidMonth(month.clone()));
            }
            let mm: u32 = month[4..].parse().expect("digits already checked");
            if !(1..=12).contains(&mm) {
                return Err(ConfigError::MonthOutOfRange(month.clone()));
            }
        }
        if !self.email.contains('@') {
            return Err(ConfigError::InvalidEmail(self.email.clone()));
        }
        if self.password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RunConfig {
        RunConfig {
            athlete_id: "55006593".to_string(),
            months: vec!["202003".to_string(), "202010".to_string()],
            email: "scraper@example.com".to_string(),
            password: "hunter2".to_string(),
            output: PathBuf::from("activities.json"),
            settle_ms: 5_000,
            delay_ms: 2_000,
            headful: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_athlete_id_must_be_digits() {
        let mut config = valid();
        config.athlete_id = "abc123".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidAthleteId("abc123".to_string()))
        );

        config.athlete_id = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAthleteId(_))
        ));
    }

    #[test]
    fn test_months_are_required() {
        let mut config = valid();
        config.months.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoMonths));
    }

    #[test]
    fn test_month_must_be_six_digit_token() {
        let mut config = valid();
        // The older MM + YYYY split is rejected; only YYYYMM is accepted.
        config.months = vec!["10".to_string()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMonth("10".to_string()))
        );

        config.months = vec!["2020-3".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMonth(_))));
    }

    #[test]
    fn test_month_part_must_be_in_range() {
        let mut config = valid();
        config.months = vec!["202013".to_string()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::MonthOutOfRange("202013".to_string()))
        );

        config.months = vec!["202000".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MonthOutOfRange(_))
        ));
    }

    #[test]
    fn test_email_needs_at_sign() {
        let mut config = valid();
        config.email = "not-an-email".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidEmail("not-an-email".to_string()))
        );
    }

    #[test]
    fn test_password_must_be_non_empty() {
        let mut config = valid();
        config.password = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyPassword));
    }
}
