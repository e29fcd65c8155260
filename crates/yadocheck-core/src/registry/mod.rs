//! Property registry
//!
//! Binds each [`PropertyId`] to its room catalog and the scraper adapter
//! responsible for it. The registry is built once at startup and read-only
//! afterwards; adding a property means implementing
//! [`AvailabilityScraper`](crate::traits::AvailabilityScraper) and
//! registering a [`PropertyConfig`] here, nothing else.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::domain::{PropertyId, Query, RoomInfo};
use crate::error::{Error, Result};
use crate::traits::AvailabilityScraper;

/// Static registry entry for one property
pub struct PropertyConfig {
    /// The property this entry describes
    pub property: PropertyId,
    /// Booking site base URL
    pub base_url: String,
    /// Booking URL template with `{room_id}` and `{date}` placeholders
    pub booking_url_template: String,
    /// Full room catalog, in display order
    pub rooms: Vec<RoomInfo>,
    /// Scraper adapter for this property's booking backend
    pub scraper: Arc<dyn AvailabilityScraper>,
}

impl PropertyConfig {
    /// Look up a catalog room by id
    pub fn room(&self, room_id: &str) -> Option<&RoomInfo> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// Render the direct booking URL for a room and check-in date
    pub fn booking_url(&self, room_id: &str, check_in: chrono::NaiveDate) -> String {
        self.booking_url_template
            .replace("{room_id}", room_id)
            .replace("{date}", &check_in.to_string())
    }
}

impl std::fmt::Debug for PropertyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyConfig")
            .field("property", &self.property)
            .field("base_url", &self.base_url)
            .field("rooms", &self.rooms.len())
            .field("scraper", &self.scraper.backend_name())
            .finish()
    }
}

/// Registry of all configured properties
///
/// Owned by the process for its lifetime; populated during startup, then
/// shared immutably (`Arc`) with the engine and dispatcher.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    configs: HashMap<PropertyId, PropertyConfig>,
}

impl PropertyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property configuration
    ///
    /// Re-registering a property replaces the previous entry (logged).
    pub fn register(&mut self, config: PropertyConfig) {
        if self.configs.contains_key(&config.property) {
            warn!(property = %config.property, "replacing existing property registration");
        }
        self.configs.insert(config.property, config);
    }

    /// Resolve a property's configuration
    pub fn get(&self, property: PropertyId) -> Result<&PropertyConfig> {
        self.configs
            .get(&property)
            .ok_or_else(|| Error::UnknownProperty(property.to_string()))
    }

    /// Whether a property is registered
    pub fn contains(&self, property: PropertyId) -> bool {
        self.configs.contains_key(&property)
    }

    /// All registered properties, in canonical order
    pub fn properties(&self) -> Vec<PropertyId> {
        PropertyId::all()
            .iter()
            .copied()
            .filter(|p| self.configs.contains_key(p))
            .collect()
    }

    /// Catalog subset a query asks about for one property
    ///
    /// Applies the query's room filter; every filter id must exist in the
    /// property's catalog, otherwise the whole request is a configuration
    /// error (a missing room cannot be reported as "unavailable" — that
    /// would mask a typo forever).
    pub fn rooms_to_check(&self, property: PropertyId, query: &Query) -> Result<Vec<RoomInfo>> {
        let config = self.get(property)?;
        match query.room_filter.get(&property) {
            None => Ok(config.rooms.clone()),
            Some(ids) if ids.is_empty() => Ok(config.rooms.clone()),
            Some(ids) => {
                for id in ids {
                    if config.room(id).is_none() {
                        return Err(Error::UnknownRoom {
                            property,
                            room: id.clone(),
                        });
                    }
                }
                Ok(config
                    .rooms
                    .iter()
                    .filter(|r| ids.contains(&r.id))
                    .cloned()
                    .collect())
            }
        }
    }

    /// Warnings for rooms whose capacity the query exceeds
    ///
    /// Not an error: the site will simply never show these rooms as
    /// bookable for that party size, which is worth telling the user.
    pub fn guest_capacity_warnings(&self, property: PropertyId, query: &Query) -> Vec<String> {
        let Ok(rooms) = self.rooms_to_check(property, query) else {
            return Vec::new();
        };
        rooms
            .iter()
            .filter(|room| query.guests > room.max_guests)
            .map(|room| {
                format!(
                    "{} only allows {} guests, but the query asks for {}",
                    room.name, room.max_guests, query.guests
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use crate::domain::RoomAvailability;

    struct NullScraper(PropertyId);

    #[async_trait]
    impl AvailabilityScraper for NullScraper {
        async fn check_availability(&self, _query: &Query) -> Result<Vec<RoomAvailability>> {
            Ok(Vec::new())
        }

        fn property(&self) -> PropertyId {
            self.0
        }

        fn backend_name(&self) -> &'static str {
            "null"
        }
    }

    fn sample_registry() -> PropertyRegistry {
        let mut registry = PropertyRegistry::new();
        registry.register(PropertyConfig {
            property: PropertyId::Miyakowasure,
            base_url: "https://www3.yadosys.com/reserve/en".to_string(),
            booking_url_template: "https://www3.yadosys.com/reserve/en/room/{room_id}".to_string(),
            rooms: vec![
                RoomInfo::new("00001", "SAKURA-KAN (river view)", 3, false),
                RoomInfo::new("00006", "MOMIJI-KAN VIP ROOM", 4, false),
            ],
            scraper: Arc::new(NullScraper(PropertyId::Miyakowasure)),
        });
        registry
    }

    fn query() -> Query {
        Query::new(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(), 1, 2)
    }

    #[test]
    fn unknown_property_is_an_error() {
        let registry = sample_registry();
        assert!(registry.get(PropertyId::Miyakowasure).is_ok());
        assert!(matches!(
            registry.get(PropertyId::Miyamaso),
            Err(Error::UnknownProperty(_))
        ));
    }

    #[test]
    fn rooms_to_check_honors_filter() {
        let registry = sample_registry();

        let mut q = query();
        assert_eq!(
            registry
                .rooms_to_check(PropertyId::Miyakowasure, &q)
                .unwrap()
                .len(),
            2
        );

        q.room_filter
            .insert(PropertyId::Miyakowasure, vec!["00006".to_string()]);
        let rooms = registry.rooms_to_check(PropertyId::Miyakowasure, &q).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, "00006");
    }

    #[test]
    fn unknown_filter_room_is_a_config_error() {
        let registry = sample_registry();
        let mut q = query();
        q.room_filter
            .insert(PropertyId::Miyakowasure, vec!["99999".to_string()]);
        assert!(matches!(
            registry.rooms_to_check(PropertyId::Miyakowasure, &q),
            Err(Error::UnknownRoom { .. })
        ));
    }

    #[test]
    fn capacity_warnings_flag_oversized_parties() {
        let registry = sample_registry();
        let mut q = query();
        q.guests = 4;
        let warnings = registry.guest_capacity_warnings(PropertyId::Miyakowasure, &q);
        // SAKURA-KAN caps at 3 guests, the VIP room fits 4
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("SAKURA-KAN"));
    }

    #[test]
    fn booking_url_renders_placeholders() {
        let registry = sample_registry();
        let config = registry.get(PropertyId::Miyakowasure).unwrap();
        let url = config.booking_url("00001", NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(url, "https://www3.yadosys.com/reserve/en/room/00001");
    }
}
