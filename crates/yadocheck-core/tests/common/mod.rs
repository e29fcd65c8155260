//! Test doubles and common utilities for architecture contract tests
//!
//! Minimal scraper, store, and notifier doubles that verify the engine and
//! dispatcher contracts without touching any real booking backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use yadocheck_core::error::Result;
use yadocheck_core::traits::{AvailabilityScraper, NotificationStore, Notifier};
use yadocheck_core::{
    Error, NotifiableEvent, NotificationRecord, PropertyConfig, PropertyId, PropertyRegistry,
    Query, RoomAvailability, RoomInfo,
};

/// A scraper that returns a scripted answer and counts its calls
pub struct ScriptedScraper {
    property: PropertyId,
    rooms: Vec<RoomAvailability>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedScraper {
    pub fn new(property: PropertyId, rooms: Vec<RoomAvailability>) -> Self {
        Self {
            property,
            rooms,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl AvailabilityScraper for ScriptedScraper {
    async fn check_availability(&self, _query: &Query) -> Result<Vec<RoomAvailability>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.rooms.clone())
    }

    fn property(&self) -> PropertyId {
        self.property
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

/// A scraper that always fails
pub struct FailingScraper {
    property: PropertyId,
}

impl FailingScraper {
    pub fn new(property: PropertyId) -> Self {
        Self { property }
    }
}

#[async_trait]
impl AvailabilityScraper for FailingScraper {
    async fn check_availability(&self, _query: &Query) -> Result<Vec<RoomAvailability>> {
        Err(Error::scrape(self.property, "backend unreachable"))
    }

    fn property(&self) -> PropertyId {
        self.property
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// A scraper that never finishes (for deadline testing)
pub struct HangingScraper {
    property: PropertyId,
}

impl HangingScraper {
    pub fn new(property: PropertyId) -> Self {
        Self { property }
    }
}

#[async_trait]
impl AvailabilityScraper for HangingScraper {
    async fn check_availability(&self, _query: &Query) -> Result<Vec<RoomAvailability>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("the deadline should fire first")
    }

    fn property(&self) -> PropertyId {
        self.property
    }

    fn backend_name(&self) -> &'static str {
        "hanging"
    }
}

/// A store that counts loads and saves around a real in-memory map
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: yadocheck_core::MemoryNotificationStore,
    load_count: Arc<AtomicUsize>,
    save_count: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationStore for CountingStore {
    async fn load(&self, property: PropertyId) -> Result<NotificationRecord> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        self.inner.load(property).await
    }

    async fn save(&self, property: PropertyId, record: &NotificationRecord) -> Result<()> {
        self.save_count.fetch_add(1, Ordering::SeqCst);
        self.inner.save(property, record).await
    }
}

/// A store whose saves always fail
#[derive(Clone, Default)]
pub struct BrokenStore;

#[async_trait]
impl NotificationStore for BrokenStore {
    async fn load(&self, _property: PropertyId) -> Result<NotificationRecord> {
        Ok(NotificationRecord::new())
    }

    async fn save(&self, _property: PropertyId, _record: &NotificationRecord) -> Result<()> {
        Err(Error::state("disk full"))
    }
}

/// A notifier that records every event it was asked to deliver
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<std::sync::Mutex<Vec<NotifiableEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<NotifiableEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, event: &NotifiableEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Catalog rooms used across the contract tests
pub fn sample_rooms() -> Vec<RoomInfo> {
    vec![
        RoomInfo::new("00001", "SAKURA-KAN (river view)", 3, false),
        RoomInfo::new("00006", "MOMIJI-KAN VIP ROOM", 4, false),
    ]
}

/// Availability facts marking every sample room as bookable
pub fn all_rooms_open() -> Vec<RoomAvailability> {
    sample_rooms()
        .into_iter()
        .map(|room| RoomAvailability {
            room,
            available: true,
            price_per_person: Some(25000),
            spots_left: Some(1),
        })
        .collect()
}

/// Build a registry binding one property to the given scraper
pub fn registry_with(
    property: PropertyId,
    scraper: Arc<dyn AvailabilityScraper>,
) -> PropertyRegistry {
    let mut registry = PropertyRegistry::new();
    registry.register(PropertyConfig {
        property,
        base_url: "https://example.invalid".to_string(),
        booking_url_template: "https://example.invalid/{room_id}?date={date}".to_string(),
        rooms: sample_rooms(),
        scraper,
    });
    registry
}

/// A standard one-night query for two guests
pub fn sample_query() -> Query {
    Query::new(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(), 1, 2)
}
