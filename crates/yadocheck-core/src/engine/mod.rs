//! Availability engine
//!
//! The engine orchestrates one check cycle across properties:
//!
//! 1. Validate the query and resolve every requested property up front
//! 2. Run each property's scraper in its own task, bounded by a deadline
//! 3. Normalize success or failure into a per-property [`CheckResult`]
//!
//! ## Isolation
//!
//! A failure in one property's adapter never prevents results for other
//! properties: scrape errors, timeouts, and even task panics become a
//! `CheckFailure` on that property's result. Only configuration errors
//! discovered before any scraping starts abort the whole invocation.
//!
//! ## Ordering & concurrency
//!
//! Properties are checked concurrently (adapters are independent and share
//! no mutable state), but results always come back in request order.
//! Within one property the scraper holds a single page-automation session,
//! so per-property work is strictly sequential.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{CheckFailure, CheckResult, PropertyId, Query};
use crate::error::Result;
use crate::registry::PropertyRegistry;
use crate::traits::AvailabilityScraper;

/// Default per-property check deadline
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(120);

/// Orchestrates availability checks across registered properties
pub struct AvailabilityEngine {
    registry: Arc<PropertyRegistry>,
    check_timeout: Duration,
}

impl AvailabilityEngine {
    /// Create an engine with the default deadline
    pub fn new(registry: Arc<PropertyRegistry>) -> Self {
        Self::with_timeout(registry, DEFAULT_CHECK_TIMEOUT)
    }

    /// Create an engine with a caller-supplied per-property deadline
    pub fn with_timeout(registry: Arc<PropertyRegistry>, check_timeout: Duration) -> Self {
        Self {
            registry,
            check_timeout,
        }
    }

    /// Check availability for a set of properties
    ///
    /// Returns one [`CheckResult`] per distinct requested property, in
    /// request order (duplicates are collapsed onto the first occurrence —
    /// backend sessions are not safely shareable, so one property never
    /// runs two concurrent checks).
    ///
    /// # Errors
    ///
    /// Only configuration problems error out: an invalid query, an
    /// unregistered property, or a room filter naming an unknown room.
    /// Everything that happens after scraping starts is reported inside
    /// the per-property results.
    pub async fn check(&self, properties: &[PropertyId], query: &Query) -> Result<Vec<CheckResult>> {
        query.validate()?;

        let mut requested: Vec<(PropertyId, Arc<dyn AvailabilityScraper>)> = Vec::new();
        for &property in properties {
            // Resolve everything before any scraping begins; an unknown
            // property or filter room aborts the whole invocation.
            let config = self.registry.get(property)?;
            self.registry.rooms_to_check(property, query)?;
            if !requested.iter().any(|(p, _)| *p == property) {
                requested.push((property, Arc::clone(&config.scraper)));
            }
        }

        info!(
            properties = requested.len(),
            check_in = %query.check_in,
            nights = query.nights,
            guests = query.guests,
            "starting availability check"
        );

        let handles: Vec<(PropertyId, JoinHandle<CheckResult>)> = requested
            .into_iter()
            .map(|(property, scraper)| {
                let query = query.clone();
                let deadline = self.check_timeout;
                let handle = tokio::spawn(async move {
                    let checked_at = Utc::now();
                    let started = std::time::Instant::now();
                    debug!(property = %property, "checking property");
                    match tokio::time::timeout(deadline, scraper.check_availability(&query)).await {
                        Ok(Ok(rooms)) => {
                            debug!(
                                property = %property,
                                rooms = rooms.len(),
                                available = rooms.iter().filter(|r| r.available).count(),
                                "check finished"
                            );
                            CheckResult::ok(property, query, rooms, checked_at)
                        }
                        Ok(Err(e)) => {
                            warn!(property = %property, error = %e, "check failed");
                            CheckResult::failed(
                                property,
                                query,
                                CheckFailure::Scrape {
                                    cause: e.to_string(),
                                },
                                checked_at,
                            )
                        }
                        Err(_) => {
                            // Dropping the scrape future releases its page
                            // session via the session's drop path.
                            let elapsed_ms = started.elapsed().as_millis() as u64;
                            warn!(property = %property, elapsed_ms, "check deadline exceeded");
                            CheckResult::failed(
                                property,
                                query,
                                CheckFailure::Timeout { elapsed_ms },
                                checked_at,
                            )
                        }
                    }
                });
                (property, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (property, handle) in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(join_err) => {
                    warn!(property = %property, error = %join_err, "check task aborted");
                    results.push(CheckResult::failed(
                        property,
                        query.clone(),
                        CheckFailure::Scrape {
                            cause: format!("check task aborted: {join_err}"),
                        },
                        Utc::now(),
                    ));
                }
            }
        }
        Ok(results)
    }
}
