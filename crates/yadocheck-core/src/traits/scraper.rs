// # Availability Scraper Trait
//
// Defines the interface for per-backend availability scrapers.
//
// ## Implementations
//
// - Yadosys booking system: `yadocheck-scraper-yadosys` crate
// - 489ban.net booking system: `yadocheck-scraper-ban` crate
//
// Each backend has its own page navigation and parsing logic, but all
// implementations conform to this contract so the engine stays
// backend-agnostic. New properties are added by implementing this trait and
// registering a `PropertyConfig`; there is no shared base state to inherit.

use async_trait::async_trait;

use crate::domain::{PropertyId, Query, RoomAvailability};
use crate::error::Result;

/// Trait for availability scraper implementations
///
/// # Contract
///
/// `check_availability` returns one [`RoomAvailability`] for **every** room
/// the query asks about, in catalog order. A room the target site no longer
/// shows is reported as unavailable, never omitted, so callers can tell
/// "checked and unavailable" from "missing from catalog" (the latter is a
/// configuration error surfaced elsewhere).
///
/// # Sessions and timeouts
///
/// Implementations hold at most one page-automation session per invocation
/// and must release it on every exit path, including errors and timeouts.
/// Every page interaction is bounded by the interaction timeout the scraper
/// was built with; an expired interaction fails the check with a scrape
/// error rather than hanging the cycle.
///
/// # Isolation
///
/// Scrapers never touch the notification store and never decide whether an
/// alert should fire; they only observe. A failure here is wrapped into a
/// per-property `CheckResult` by the engine and must not take down checks
/// for other properties.
#[async_trait]
pub trait AvailabilityScraper: Send + Sync {
    /// Check room availability for the given query
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<RoomAvailability>)`: one entry per requested catalog room
    /// - `Err(Error)`: the backend was unreachable or its page structure
    ///   changed; the error carries the property id and a readable cause
    async fn check_availability(&self, query: &Query) -> Result<Vec<RoomAvailability>>;

    /// The property this scraper is responsible for
    fn property(&self) -> PropertyId;

    /// Name of the booking backend (for logging/debugging)
    fn backend_name(&self) -> &'static str;
}
