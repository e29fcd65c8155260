// # yadocheck-scraper-ban
//
// Availability adapter for the 489ban.net booking backend, used by
// Miyamaso Takamiya in Zao Onsen.
//
// 489ban renders everything client-side and has no combined results page,
// so the adapter navigates straight to each room's stay page and parses it
// in isolation. A single room failing to load is reported as unavailable;
// only a failure to obtain any page session fails the property.

pub mod parse;
pub mod rooms;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use yadocheck_core::error::{Error, Result};
use yadocheck_core::traits::{AvailabilityScraper, PageDriver, PageSession};
use yadocheck_core::{PropertyId, Query, RoomAvailability, RoomInfo};

/// Booking site root for Miyamaso Takamiya
pub const BASE_URL: &str = "https://reserve.489ban.net/client/zao-takamiya/4";

/// Deadline for each individual page interaction
const STEP_TIMEOUT: Duration = Duration::from_secs(60);

/// 489ban adapter for Miyamaso
pub struct BanScraper {
    driver: Arc<dyn PageDriver>,
    catalog: Vec<RoomInfo>,
}

impl BanScraper {
    /// Create an adapter over the given page driver
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            catalog: rooms::catalog(),
        }
    }

    /// Stay page for one room and check-in date
    pub fn stay_url(room_id: &str, query: &Query) -> String {
        format!(
            "{BASE_URL}/plan/room/{room_id}/stay?date={}&roomCount=1",
            query.check_in
        )
    }

    fn rooms_for(&self, query: &Query) -> Vec<RoomInfo> {
        match query.room_filter.get(&PropertyId::Miyamaso) {
            Some(ids) if !ids.is_empty() => self
                .catalog
                .iter()
                .filter(|r| ids.contains(&r.id))
                .cloned()
                .collect(),
            _ => self.catalog.clone(),
        }
    }

    async fn check_room(&self, room: &RoomInfo, query: &Query) -> Result<RoomAvailability> {
        let url = Self::stay_url(&room.id, query);
        let mut session = self.driver.open().await?;

        let outcome = async {
            session.goto(&url, STEP_TIMEOUT).await?;
            let content = session.content(STEP_TIMEOUT).await?;
            debug!(room = %room.id, bytes = content.len(), "fetched room page");
            let (available, price) = parse::parse_room_page(&content);
            Ok::<_, Error>(RoomAvailability {
                room: room.clone(),
                available,
                price_per_person: price,
                spots_left: None,
            })
        }
        .await;

        if let Err(e) = session.close().await {
            warn!(room = %room.id, error = %e, "failed to close page session");
        }
        outcome
    }
}

#[async_trait]
impl AvailabilityScraper for BanScraper {
    async fn check_availability(&self, query: &Query) -> Result<Vec<RoomAvailability>> {
        let mut results = Vec::new();
        for room in self.rooms_for(query) {
            match self.check_room(&room, query).await {
                Ok(availability) => results.push(availability),
                Err(e) => {
                    // One room's page failing must not sink the others;
                    // report it closed and move on
                    warn!(room = %room.id, error = %e, "room check failed, reporting unavailable");
                    results.push(RoomAvailability::unavailable(room));
                }
            }
        }
        Ok(results)
    }

    fn property(&self) -> PropertyId {
        PropertyId::Miyamaso
    }

    fn backend_name(&self) -> &'static str {
        "489ban"
    }
}
