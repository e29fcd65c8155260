//! Configuration types for the availability checker
//!
//! This module defines the configuration structure shared by the daemon and
//! library callers.

use std::collections::HashMap;
use std::time::Duration as StdDuration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{PropertyId, Query};
use crate::state::record::DEFAULT_COOLDOWN_HOURS;

/// Main checker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Check-in date to watch
    pub check_in: NaiveDate,

    /// Number of nights (>= 1)
    #[serde(default = "default_nights")]
    pub nights: u32,

    /// Number of guests (>= 1)
    #[serde(default = "default_guests")]
    pub guests: u32,

    /// Properties to check; empty means all registered properties
    #[serde(default)]
    pub properties: Vec<PropertyId>,

    /// Optional per-property room filter (catalog room ids)
    #[serde(default)]
    pub room_filter: HashMap<PropertyId, Vec<String>>,

    /// Minutes between check cycles
    #[serde(default = "default_interval_mins")]
    pub interval_mins: u64,

    /// Hours before the same room+stay may alert again
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: i64,

    /// Per-property check deadline in seconds
    #[serde(default = "default_check_timeout_secs")]
    pub check_timeout_secs: u64,

    /// Directory for notification state files
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Whether the browser runs headless
    #[serde(default = "default_headless")]
    pub headless: bool,
}

impl CheckConfig {
    /// Create a configuration for one check-in date with defaults elsewhere
    pub fn new(check_in: NaiveDate) -> Self {
        Self {
            check_in,
            nights: default_nights(),
            guests: default_guests(),
            properties: Vec::new(),
            room_filter: HashMap::new(),
            interval_mins: default_interval_mins(),
            cooldown_hours: default_cooldown_hours(),
            check_timeout_secs: default_check_timeout_secs(),
            state_dir: default_state_dir(),
            headless: default_headless(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.query().validate()?;

        if self.interval_mins < MIN_INTERVAL_MINS {
            return Err(crate::Error::config(format!(
                "interval_mins must be at least {MIN_INTERVAL_MINS} (booking sites throttle aggressive polling)"
            )));
        }
        if self.cooldown_hours < 1 {
            return Err(crate::Error::config("cooldown_hours must be at least 1"));
        }
        if self.check_timeout_secs == 0 {
            return Err(crate::Error::config("check_timeout_secs must be > 0"));
        }
        if self.state_dir.is_empty() {
            return Err(crate::Error::config("state_dir cannot be empty"));
        }

        Ok(())
    }

    /// Properties to check, falling back to all when none are listed
    pub fn properties_or_all(&self) -> Vec<PropertyId> {
        if self.properties.is_empty() {
            PropertyId::all().to_vec()
        } else {
            self.properties.clone()
        }
    }

    /// The availability query this configuration describes
    pub fn query(&self) -> Query {
        Query {
            check_in: self.check_in,
            nights: self.nights,
            guests: self.guests,
            room_filter: self.room_filter.clone(),
        }
    }

    /// Cooldown as a chrono duration
    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::hours(self.cooldown_hours)
    }

    /// Per-property check deadline
    pub fn check_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.check_timeout_secs)
    }

    /// Pause between check cycles
    pub fn interval(&self) -> StdDuration {
        StdDuration::from_secs(self.interval_mins * 60)
    }
}

/// Floor on the polling interval
pub const MIN_INTERVAL_MINS: u64 = 15;

fn default_nights() -> u32 {
    1
}

fn default_guests() -> u32 {
    2
}

fn default_interval_mins() -> u64 {
    30
}

fn default_cooldown_hours() -> i64 {
    DEFAULT_COOLDOWN_HOURS
}

fn default_check_timeout_secs() -> u64 {
    120
}

fn default_state_dir() -> String {
    ".yadocheck".to_string()
}

fn default_headless() -> bool {
    true
}
