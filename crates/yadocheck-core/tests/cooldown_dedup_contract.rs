//! Architecture contract: cooldown deduplication
//!
//! The same room+stay must alert at most once per cooldown window, the
//! window must survive restarts (history is in the store, not in memory),
//! and history must be written before the caller can attempt delivery.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::*;
use yadocheck_core::traits::Notifier;
use yadocheck_core::{
    CheckResult, DispatchCoordinator, MemoryNotificationStore, PropertyId, PropertyRegistry,
};

fn registry() -> Arc<PropertyRegistry> {
    Arc::new(registry_with(
        PropertyId::Miyakowasure,
        Arc::new(ScriptedScraper::new(
            PropertyId::Miyakowasure,
            all_rooms_open(),
        )),
    ))
}

fn open_result(checked_at: chrono::DateTime<Utc>) -> CheckResult {
    CheckResult::ok(
        PropertyId::Miyakowasure,
        sample_query(),
        all_rooms_open(),
        checked_at,
    )
}

#[tokio::test]
async fn same_room_alerts_once_per_cooldown_window() {
    let store = Arc::new(MemoryNotificationStore::new());
    let coordinator = DispatchCoordinator::new(registry(), store);

    let t0 = Utc::now();

    // First sighting: both open rooms alert
    assert_eq!(coordinator.dispatch(&[open_result(t0)]).await.len(), 2);

    // Still open an hour later: suppressed
    assert!(coordinator
        .dispatch(&[open_result(t0 + Duration::hours(1))])
        .await
        .is_empty());

    // A day later the window has passed: alerts fire again
    assert_eq!(
        coordinator
            .dispatch(&[open_result(t0 + Duration::hours(25))])
            .await
            .len(),
        2
    );
}

#[tokio::test]
async fn cooldown_survives_a_restart() {
    let store = Arc::new(MemoryNotificationStore::new());
    let t0 = Utc::now();

    {
        let coordinator = DispatchCoordinator::new(registry(), store.clone());
        assert_eq!(coordinator.dispatch(&[open_result(t0)]).await.len(), 2);
    }

    // A fresh coordinator over the same store sees the history
    let coordinator = DispatchCoordinator::new(registry(), store);
    assert!(coordinator
        .dispatch(&[open_result(t0 + Duration::hours(1))])
        .await
        .is_empty());
}

#[tokio::test]
async fn different_stay_dates_alert_independently() {
    let store = Arc::new(MemoryNotificationStore::new());
    let coordinator = DispatchCoordinator::new(registry(), store);

    let t0 = Utc::now();
    assert_eq!(coordinator.dispatch(&[open_result(t0)]).await.len(), 2);

    // Same rooms, different check-in: a separate stay, fresh alerts
    let mut other_stay = open_result(t0 + Duration::minutes(1));
    other_stay.query.check_in = other_stay.query.check_in + chrono::Days::new(7);
    assert_eq!(coordinator.dispatch(&[other_stay]).await.len(), 2);
}

#[tokio::test]
async fn history_is_recorded_before_delivery() {
    let store = Arc::new(CountingStore::new());
    let coordinator = DispatchCoordinator::new(registry(), store.clone());
    let notifier = RecordingNotifier::new();

    let events = coordinator.dispatch(&[open_result(Utc::now())]).await;
    assert_eq!(store.save_count(), 1, "state must be saved during dispatch");

    // Delivery happens strictly after the save
    for event in &events {
        notifier.notify(event).await.unwrap();
    }
    assert_eq!(notifier.delivered().len(), 2);
}

#[tokio::test]
async fn store_failure_skips_the_property_but_never_errors() {
    let coordinator = DispatchCoordinator::new(registry(), Arc::new(BrokenStore));

    // Save fails, so no event may escape (record-before-notify)
    let events = coordinator.dispatch(&[open_result(Utc::now())]).await;
    assert!(events.is_empty());
}

#[tokio::test]
async fn no_redundant_saves_when_nothing_changed() {
    let store = Arc::new(CountingStore::new());
    let coordinator = DispatchCoordinator::new(registry(), store.clone());

    let t0 = Utc::now();
    coordinator.dispatch(&[open_result(t0)]).await;
    assert_eq!(store.save_count(), 1);

    // Everything suppressed, history untouched, no second write
    coordinator
        .dispatch(&[open_result(t0 + Duration::hours(1))])
        .await;
    assert_eq!(store.save_count(), 1);
}
