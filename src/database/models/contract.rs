use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

pub const DEPARTMENT_MAX_LENGTH: usize = 200;
pub const DEPARTMENT_SHORT_MAX_LENGTH: usize = 100;
pub const CONTACT_MAX_LENGTH: usize = 254;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$")
        .expect("valid email pattern")
});

/// Expected working time of a contract, written as `H:MM` (e.g. `40:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkingHours {
    minutes: i64,
}

impl WorkingHours {
    pub fn from_minutes(minutes: i64) -> Self {
        Self { minutes }
    }

    pub fn total_minutes(&self) -> i64 {
        self.minutes
    }

    pub fn hours(&self) -> i64 {
        self.minutes / 60
    }

    pub fn minutes(&self) -> i64 {
        self.minutes % 60
    }
}

impl fmt::Display for WorkingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours(), self.minutes())
    }
}

impl FromStr for WorkingHours {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ValidationError::for_field(
                "hours",
                format!("'{}' is not a valid working-hours value (expected H:MM).", s),
            )
        };

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hours.is_empty()
            || minutes.len() != 2
            || !hours.bytes().all(|b| b.is_ascii_digit())
            || !minutes.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let hours: i64 = hours.parse().map_err(|_| invalid())?;
        let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }

        let total = hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .ok_or_else(invalid)?;

        Ok(WorkingHours::from_minutes(total))
    }
}

impl Serialize for WorkingHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkingHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    pub id: i64,
    pub department: String,
    pub department_short: Option<String>,
    pub hours: WorkingHours,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub employee_id: i64,
}

/// Contract fields as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractInput {
    pub department: String,
    pub department_short: Option<String>,
    pub hours: String,
    pub contact: Option<String>,
}

/// Contract fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub department: String,
    pub department_short: Option<String>,
    pub hours: WorkingHours,
    pub contact: Option<String>,
}

impl ContractInput {
    pub fn clean(self) -> Result<NewContract, ValidationError> {
        let department = self.department.trim().to_string();
        if department.is_empty() {
            return Err(ValidationError::for_field(
                "department",
                "This field is required.",
            ));
        }
        check_length("department", &department, DEPARTMENT_MAX_LENGTH)?;

        let department_short = self
            .department_short
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(short) = &department_short {
            check_length("department_short", short, DEPARTMENT_SHORT_MAX_LENGTH)?;
        }

        let hours = self.hours.parse::<WorkingHours>()?;

        let contact = self
            .contact
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(contact) = &contact {
            check_length("contact", contact, CONTACT_MAX_LENGTH)?;
            if !EMAIL_RE.is_match(contact) {
                return Err(ValidationError::for_field(
                    "contact",
                    "Enter a valid email address.",
                ));
            }
        }

        Ok(NewContract {
            department,
            department_short,
            hours,
            contact,
        })
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::for_field(
            field,
            format!("Ensure this value has at most {} characters.", max),
        ));
    }
    Ok(())
}
