//! Core traits for the availability checker
//!
//! This module defines the abstract interfaces that all implementations must
//! follow.
//!
//! - [`AvailabilityScraper`]: check one property's rooms for one query
//! - [`PageDriver`] / [`PageSession`]: injected page-automation capability
//! - [`Notifier`]: deliver one alert for one eligible room
//! - [`NotificationStore`]: persistent per-property alert history

pub mod notifier;
pub mod page;
pub mod scraper;
pub mod store;

pub use notifier::Notifier;
pub use page::{PageDriver, PageSession};
pub use scraper::AvailabilityScraper;
pub use store::NotificationStore;
