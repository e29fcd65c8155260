// # yadocheck-scraper-yadosys
//
// Availability adapter for the Yadosys booking backend, used by
// Natsuse Onsen Miyakowasure.
//
// Yadosys works off one search form: fill the check-in date, stay length
// and guest counts, submit, and a single results page covers every room.
// The adapter drives an injected `PageDriver` through that flow and hands
// the page text to the pure parsers in `parse`.

pub mod parse;
pub mod rooms;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use tracing::{debug, warn};

use yadocheck_core::error::{Error, Result};
use yadocheck_core::traits::{AvailabilityScraper, PageDriver, PageSession};
use yadocheck_core::{PropertyId, Query, RoomAvailability, RoomInfo};

/// Plan list search page, English locale
pub const PLAN_LIST_URL: &str =
    "https://www3.yadosys.com/reserve/en/order/planlist/1/52/0/ptc";

/// Deadline for each individual page interaction
const STEP_TIMEOUT: Duration = Duration::from_secs(60);

/// Yadosys adapter for Miyakowasure
pub struct YadosysScraper {
    driver: Arc<dyn PageDriver>,
    catalog: Vec<RoomInfo>,
}

impl YadosysScraper {
    /// Create an adapter over the given page driver
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            catalog: rooms::catalog(),
        }
    }

    /// Rooms this check should report, honoring the query's filter
    fn rooms_for(&self, query: &Query) -> Vec<RoomInfo> {
        match query.room_filter.get(&PropertyId::Miyakowasure) {
            Some(ids) if !ids.is_empty() => self
                .catalog
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned()
                .collect(),
            _ => self.catalog.clone(),
        }
    }

    async fn fill_search_form(&self, session: &mut Box<dyn PageSession>, query: &Query) -> Result<()> {
        let check_in = query.check_in;

        // Date dropdowns; Yadosys renders slightly different ids per skin,
        // so the selectors match on name fragments
        self.soft_select(session, r#"select[name*="year"]"#, &check_in.year().to_string()).await;
        self.soft_select(session, r#"select[name*="month"]"#, &check_in.month().to_string()).await;
        self.soft_select(session, r#"select[name*="day"]"#, &check_in.day().to_string()).await;

        self.soft_select(session, r#"select[name*="night"], select[name*="stay"]"#, &query.nights.to_string()).await;

        // Yadosys splits the party into male/female counts; the split does
        // not affect availability, so everyone goes in the first box
        self.select_or_fill(session, r#"select[name*="male"], input[name*="male"]"#, &query.guests.to_string()).await;
        self.select_or_fill(session, r#"select[name*="female"], input[name*="female"]"#, "0").await;

        Ok(())
    }

    /// Select an option, tolerating a missing element
    ///
    /// Some form fields only exist in certain Yadosys skins. A missing
    /// optional field falls back to the form's default value, which the
    /// submitted search still accepts.
    async fn soft_select(&self, session: &mut Box<dyn PageSession>, selector: &str, value: &str) {
        if let Err(e) = session.select(selector, value, STEP_TIMEOUT).await {
            debug!(selector, value, error = %e, "optional form field not set");
        }
    }

    /// Select an option, falling back to text-input fill
    async fn select_or_fill(&self, session: &mut Box<dyn PageSession>, selector: &str, value: &str) {
        if session.select(selector, value, STEP_TIMEOUT).await.is_err() {
            if let Err(e) = session.fill(selector, value, STEP_TIMEOUT).await {
                debug!(selector, value, error = %e, "guest count field not set");
            }
        }
    }

    async fn run_check(
        &self,
        session: &mut Box<dyn PageSession>,
        query: &Query,
    ) -> Result<Vec<RoomAvailability>> {
        session.goto(PLAN_LIST_URL, STEP_TIMEOUT).await?;
        self.fill_search_form(session, query).await?;

        session
            .click(
                r#"input[type="submit"], button[type="submit"]"#,
                STEP_TIMEOUT,
            )
            .await?;

        let content = session.content(STEP_TIMEOUT).await?;
        debug!(bytes = content.len(), "fetched results page");

        Ok(self
            .rooms_for(query)
            .iter()
            .map(|room| parse::parse_room(&content, room))
            .collect())
    }
}

#[async_trait]
impl AvailabilityScraper for YadosysScraper {
    async fn check_availability(&self, query: &Query) -> Result<Vec<RoomAvailability>> {
        let mut session = self.driver.open().await.map_err(|e| {
            Error::scrape(PropertyId::Miyakowasure, format!("failed to open page session: {e}"))
        })?;

        let outcome = self.run_check(&mut session, query).await;

        // The session is released on every exit path; a close failure is
        // logged but never masks the check outcome
        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close page session");
        }

        outcome.map_err(|e| Error::scrape(PropertyId::Miyakowasure, e.to_string()))
    }

    fn property(&self) -> PropertyId {
        PropertyId::Miyakowasure
    }

    fn backend_name(&self) -> &'static str {
        "yadosys"
    }
}
