//! Notification dispatch
//!
//! Turns a batch of [`CheckResult`]s into the list of alerts that should
//! actually fire, applying the per-room cooldown against persisted history.
//!
//! ## Record-before-notify
//!
//! History is persisted before the caller gets the event. If delivery then
//! fails, the alert is lost until the cooldown expires; the opposite order
//! would spam a duplicate on every cycle after a crash between notify and
//! save. A missed alert self-heals in one cooldown window, spam does not.
//!
//! ## Infallibility
//!
//! `dispatch` never returns an error. Errored check results are skipped,
//! and a store failure on one property is logged and skips that property
//! only. The check cycle always completes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{CheckResult, NotifiableEvent, PropertyId};
use crate::registry::PropertyRegistry;
use crate::state::record::{NotificationRecord, DEFAULT_COOLDOWN_HOURS};
use crate::traits::NotificationStore;

/// Decides which availability findings become alerts
pub struct DispatchCoordinator {
    registry: Arc<PropertyRegistry>,
    store: Arc<dyn NotificationStore>,
    cooldown: Duration,
    // One lock per property so concurrent dispatches cannot interleave a
    // load-modify-save on the same state file.
    locks: Mutex<HashMap<PropertyId, Arc<Mutex<()>>>>,
}

impl DispatchCoordinator {
    /// Create a coordinator with the default 24h cooldown
    pub fn new(registry: Arc<PropertyRegistry>, store: Arc<dyn NotificationStore>) -> Self {
        Self::with_cooldown(registry, store, Duration::hours(DEFAULT_COOLDOWN_HOURS))
    }

    /// Create a coordinator with a caller-supplied cooldown
    pub fn with_cooldown(
        registry: Arc<PropertyRegistry>,
        store: Arc<dyn NotificationStore>,
        cooldown: Duration,
    ) -> Self {
        Self {
            registry,
            store,
            cooldown,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, property: PropertyId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(property).or_default())
    }

    /// Filter check results down to the alerts that should fire now
    ///
    /// Events are returned in result order; within one property, in the
    /// order the scraper reported the rooms. Cooldown arithmetic uses each
    /// result's `checked_at` as "now", so slow scrapes or transports do
    /// not stretch the window.
    pub async fn dispatch(&self, results: &[CheckResult]) -> Vec<NotifiableEvent> {
        let mut events = Vec::new();
        for result in results {
            if let Some(failure) = &result.error {
                debug!(property = %result.property, error = %failure, "skipping errored result");
                continue;
            }
            match self.dispatch_one(result).await {
                Ok(mut property_events) => events.append(&mut property_events),
                Err(e) => {
                    warn!(
                        property = %result.property,
                        error = %e,
                        "dispatch failed for property, skipping"
                    );
                }
            }
        }
        if !events.is_empty() {
            info!(events = events.len(), "availability alerts ready to send");
        }
        events
    }

    async fn dispatch_one(&self, result: &CheckResult) -> crate::Result<Vec<NotifiableEvent>> {
        let property = result.property;
        let config = self.registry.get(property)?;
        let lock = self.lock_for(property).await;
        let _guard = lock.lock().await;

        let now = result.checked_at;
        let mut record = self.store.load(property).await?;
        let before = record.clone();
        record.prune_expired(now, self.cooldown);

        let check_in = result.query.check_in;
        let check_out = result.query.check_out();
        let mut events = Vec::new();
        for availability in result.available_rooms() {
            let key = NotificationRecord::room_key(&availability.room.id, check_in, check_out);
            if !record.should_notify(&key, now, self.cooldown) {
                debug!(
                    property = %property,
                    room = %availability.room.id,
                    "alert suppressed by cooldown"
                );
                continue;
            }
            record.record_notified(&key, now);
            events.push(NotifiableEvent {
                property,
                room: availability.room.clone(),
                query: result.query.clone(),
                timestamp: now,
                price_per_person: availability.price_per_person,
                spots_left: availability.spots_left,
                booking_url: config.booking_url(&availability.room.id, check_in),
            });
        }

        if record != before {
            self.store.save(property, &record).await?;
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use crate::domain::{Query, RoomAvailability, RoomInfo};
    use crate::error::Result;
    use crate::registry::PropertyConfig;
    use crate::state::MemoryNotificationStore;
    use crate::traits::AvailabilityScraper;

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

    fn registry() -> Arc<PropertyRegistry> {
        let mut registry = PropertyRegistry::new();
        registry.register(PropertyConfig {
            property: PropertyId::Miyakowasure,
            base_url: "https://example.invalid".to_string(),
            booking_url_template: "https://example.invalid/{room_id}?date={date}".to_string(),
            rooms: vec![
                RoomInfo::new("00001", "SAKURA-KAN (river view)", 3, false),
                RoomInfo::new("00006", "MOMIJI-KAN VIP ROOM", 4, false),
            ],
            scraper: Arc::new(NullScraper(PropertyId::Miyakowasure)),
        });
        Arc::new(registry)
    }

    fn result_with_room(available: bool, checked_at: chrono::DateTime<Utc>) -> CheckResult {
        let query = Query::new(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(), 1, 2);
        let room = RoomInfo::new("00001", "SAKURA-KAN (river view)", 3, false);
        CheckResult::ok(
            PropertyId::Miyakowasure,
            query,
            vec![RoomAvailability {
                room,
                available,
                price_per_person: Some(25000),
                spots_left: Some(2),
            }],
            checked_at,
        )
    }

    #[tokio::test]
    async fn first_sighting_produces_an_event() {
        let store = Arc::new(MemoryNotificationStore::new());
        let coordinator = DispatchCoordinator::new(registry(), store);

        let events = coordinator.dispatch(&[result_with_room(true, Utc::now())]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].room.id, "00001");
        assert_eq!(
            events[0].booking_url,
            "https://example.invalid/00001?date=2026-03-15"
        );
    }

    #[tokio::test]
    async fn repeat_within_cooldown_is_suppressed() {
        let store = Arc::new(MemoryNotificationStore::new());
        let coordinator = DispatchCoordinator::new(registry(), store);

        let now = Utc::now();
        assert_eq!(coordinator.dispatch(&[result_with_room(true, now)]).await.len(), 1);
        let later = now + Duration::hours(1);
        assert!(coordinator.dispatch(&[result_with_room(true, later)]).await.is_empty());
    }

    #[tokio::test]
    async fn repeat_after_cooldown_fires_again() {
        let store = Arc::new(MemoryNotificationStore::new());
        let coordinator = DispatchCoordinator::new(registry(), store);

        let now = Utc::now();
        assert_eq!(coordinator.dispatch(&[result_with_room(true, now)]).await.len(), 1);
        let later = now + Duration::hours(25);
        assert_eq!(coordinator.dispatch(&[result_with_room(true, later)]).await.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_rooms_never_alert() {
        let store = Arc::new(MemoryNotificationStore::new());
        let coordinator = DispatchCoordinator::new(registry(), store);
        assert!(coordinator
            .dispatch(&[result_with_room(false, Utc::now())])
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn errored_results_are_skipped() {
        let store = Arc::new(MemoryNotificationStore::new());
        let coordinator = DispatchCoordinator::new(registry(), store.clone());

        let query = Query::new(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(), 1, 2);
        let failed = CheckResult::failed(
            PropertyId::Miyakowasure,
            query,
            crate::domain::CheckFailure::Scrape {
                cause: "backend unreachable".to_string(),
            },
            Utc::now(),
        );

        assert!(coordinator.dispatch(&[failed]).await.is_empty());
        assert!(store.is_empty().await, "failed checks must not touch state");
    }
}
