//! Core domain model for availability checking
//!
//! Everything here is a plain value type: queries going in, availability
//! facts coming out. Nothing in this module performs I/O.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};

/// Supported lodging properties, one per booking backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyId {
    /// Natsuse Onsen Miyakowasure (Yadosys booking system)
    Miyakowasure,
    /// Miyamaso Takamiya, Zao Onsen (489ban.net booking system)
    Miyamaso,
}

impl PropertyId {
    /// All supported properties, in canonical order
    pub fn all() -> &'static [PropertyId] {
        &[PropertyId::Miyakowasure, PropertyId::Miyamaso]
    }

    /// Parse a property from a user-supplied string (supports aliases)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "miyakowasure" => Some(PropertyId::Miyakowasure),
            "miyamaso" | "takamiya" => Some(PropertyId::Miyamaso),
            _ => None,
        }
    }

    /// Canonical identifier used in state file names and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyId::Miyakowasure => "miyakowasure",
            PropertyId::Miyamaso => "miyamaso",
        }
    }

    /// Human-readable property name
    pub fn display_name(&self) -> &'static str {
        match self {
            PropertyId::Miyakowasure => "Natsuse Onsen Miyakowasure",
            PropertyId::Miyamaso => "Miyamaso Takamiya (Zao Onsen)",
        }
    }

    /// File name of the per-property notification state file
    pub fn state_file_name(&self) -> String {
        format!("{}-state.json", self.as_str())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata for one bookable room
///
/// Room ids are backend-native strings (e.g. `"00005"`, `"25112"`) and are
/// unique only within their property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Identifier used by the booking system
    pub id: String,
    /// Human-readable room name
    pub name: String,
    /// Maximum number of guests
    pub max_guests: u32,
    /// Whether the room has a private bath (hot spring)
    pub has_private_bath: bool,
    /// Base price per person, if the catalog knows it
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub base_price: Option<u32>,
}

impl RoomInfo {
    /// Create a catalog entry without a price hint
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        max_guests: u32,
        has_private_bath: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_guests,
            has_private_bath,
            base_price: None,
        }
    }

    /// Attach a base price hint
    pub fn with_base_price(mut self, price: u32) -> Self {
        self.base_price = Some(price);
        self
    }
}

/// One availability request: date, stay length, party size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Check-in date
    pub check_in: NaiveDate,
    /// Number of nights (>= 1)
    pub nights: u32,
    /// Number of guests (>= 1)
    pub guests: u32,
    /// Optional per-property restriction to a subset of catalog room ids.
    /// Properties not present here are checked against their full catalog.
    #[serde(default, skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub room_filter: std::collections::HashMap<PropertyId, Vec<String>>,
}

impl Query {
    /// Create a query with an empty room filter
    pub fn new(check_in: NaiveDate, nights: u32, guests: u32) -> Self {
        Self {
            check_in,
            nights,
            guests,
            room_filter: std::collections::HashMap::new(),
        }
    }

    /// Check-out date, derived as check-in + nights
    ///
    /// With `nights >= 1` this is always strictly after `check_in`.
    pub fn check_out(&self) -> NaiveDate {
        self.check_in + Days::new(u64::from(self.nights))
    }

    /// Validate the query invariants
    pub fn validate(&self) -> Result<()> {
        if self.nights < 1 {
            return Err(Error::config("nights must be at least 1"));
        }
        if self.guests < 1 {
            return Err(Error::config("guests must be at least 1"));
        }
        Ok(())
    }
}

/// Availability status for one room on one check
///
/// Produced fresh on every check; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAvailability {
    /// The room this fact is about
    pub room: RoomInfo,
    /// Whether the room can currently be booked for the query
    pub available: bool,
    /// Price per person, when the page exposed one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price_per_person: Option<u32>,
    /// Remaining room count, when the page exposed one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spots_left: Option<u32>,
}

impl RoomAvailability {
    /// Shorthand for an unavailable room with no price data
    pub fn unavailable(room: RoomInfo) -> Self {
        Self {
            room,
            available: false,
            price_per_person: None,
            spots_left: None,
        }
    }
}

/// Per-property failure carried inside a [`CheckResult`]
///
/// Cloneable summary of what went wrong, detached from the richer
/// [`crate::Error`] so results stay plain values.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckFailure {
    /// Backend unreachable, page structure changed, or parsing failed
    #[error("scrape failed: {cause}")]
    Scrape {
        /// Human-readable cause
        cause: String,
    },
    /// The caller-supplied deadline expired before the check finished
    #[error("deadline exceeded after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed milliseconds when the check was abandoned
        elapsed_ms: u64,
    },
}

/// Result of checking one property for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The property that was checked
    pub property: PropertyId,
    /// The query that was checked
    pub query: Query,
    /// Availability for every room in the checked catalog subset, in catalog
    /// order. Empty when `error` is set.
    pub rooms: Vec<RoomAvailability>,
    /// Timestamp captured when the check ran (not when results were consumed)
    pub checked_at: DateTime<Utc>,
    /// Failure for this property, if the check did not complete
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<CheckFailure>,
}

impl CheckResult {
    /// Build a successful result
    pub fn ok(
        property: PropertyId,
        query: Query,
        rooms: Vec<RoomAvailability>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            property,
            query,
            rooms,
            checked_at,
            error: None,
        }
    }

    /// Build a failed result
    pub fn failed(
        property: PropertyId,
        query: Query,
        failure: CheckFailure,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            property,
            query,
            rooms: Vec::new(),
            checked_at,
            error: Some(failure),
        }
    }

    /// Whether the check completed without error
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Rooms that are currently bookable
    pub fn available_rooms(&self) -> impl Iterator<Item = &RoomAvailability> {
        self.rooms.iter().filter(|r| r.available)
    }
}

/// One room newly eligible for alerting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifiableEvent {
    /// Property the room belongs to
    pub property: PropertyId,
    /// The available room
    pub room: RoomInfo,
    /// The query that found it
    pub query: Query,
    /// Check-time timestamp; the cooldown window is anchored here
    pub timestamp: DateTime<Utc>,
    /// Price per person, if known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price_per_person: Option<u32>,
    /// Remaining room count, if known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spots_left: Option<u32>,
    /// Direct booking URL for this room and date
    pub booking_url: String,
}

impl NotifiableEvent {
    /// Short notification title
    pub fn title(&self) -> String {
        if self.room.has_private_bath {
            format!(
                "{}: {} (private bath!)",
                self.property.display_name(),
                self.room.name
            )
        } else {
            format!("{}: {} available", self.property.display_name(), self.room.name)
        }
    }

    /// Notification body for transports that want plain text
    pub fn message(&self) -> String {
        let price = match self.price_per_person {
            Some(p) => format!("{p}/person"),
            None => "price TBD".to_string(),
        };
        let spots = match self.spots_left {
            Some(n) => format!(" ({n} left)"),
            None => String::new(),
        };
        let bath_note = if self.room.has_private_bath {
            "\nPrivate hot spring bath in room!"
        } else {
            ""
        };

        format!(
            "Room available at {}!{}\n\nRoom: {}\nDates: {} -> {}\nPrice: {}{}\n\nBook now: {}",
            self.property.display_name(),
            bath_note,
            self.room.name,
            self.query.check_in,
            self.query.check_out(),
            price,
            spots,
            self.booking_url,
        )
    }
}
