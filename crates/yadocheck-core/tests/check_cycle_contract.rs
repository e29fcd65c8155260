//! Architecture contract: full check cycle
//!
//! Engine output feeds straight into dispatch, dispatch output feeds
//! straight into a notifier, with file-backed history in between. This is
//! the daemon's loop body, minus the real browser and the real transport.

mod common;

use std::sync::Arc;

use common::*;
use tempfile::tempdir;
use yadocheck_core::traits::Notifier;
use yadocheck_core::{
    AvailabilityEngine, DispatchCoordinator, FileNotificationStore, PropertyId,
};

#[tokio::test]
async fn open_rooms_flow_from_scraper_to_notifier_exactly_once() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileNotificationStore::new(dir.path()).await.unwrap());

    let registry = Arc::new(registry_with(
        PropertyId::Miyakowasure,
        Arc::new(ScriptedScraper::new(
            PropertyId::Miyakowasure,
            all_rooms_open(),
        )),
    ));
    let engine = AvailabilityEngine::new(Arc::clone(&registry));
    let coordinator = DispatchCoordinator::new(registry, store);
    let notifier = RecordingNotifier::new();

    // First cycle: every open room produces a delivered alert
    let results = engine
        .check(&[PropertyId::Miyakowasure], &sample_query())
        .await
        .unwrap();
    let events = coordinator.dispatch(&results).await;
    for event in &events {
        notifier.notify(event).await.unwrap();
    }
    assert_eq!(notifier.delivered().len(), 2);
    let event = &notifier.delivered()[0];
    assert!(event.booking_url.contains(&event.room.id));
    assert!(event.booking_url.contains("2026-03-15"));

    // Second cycle right away: same rooms still open, nothing delivered
    let results = engine
        .check(&[PropertyId::Miyakowasure], &sample_query())
        .await
        .unwrap();
    assert!(coordinator.dispatch(&results).await.is_empty());
}

#[tokio::test]
async fn room_filter_limits_the_cycle_to_chosen_rooms() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileNotificationStore::new(dir.path()).await.unwrap());

    let registry = Arc::new(registry_with(
        PropertyId::Miyakowasure,
        Arc::new(ScriptedScraper::new(
            PropertyId::Miyakowasure,
            // The scraper reports only the room it was asked about
            all_rooms_open()
                .into_iter()
                .filter(|r| r.room.id == "00006")
                .collect(),
        )),
    ));
    let engine = AvailabilityEngine::new(Arc::clone(&registry));
    let coordinator = DispatchCoordinator::new(registry, store);

    let mut query = sample_query();
    query
        .room_filter
        .insert(PropertyId::Miyakowasure, vec!["00006".to_string()]);

    let results = engine.check(&[PropertyId::Miyakowasure], &query).await.unwrap();
    let events = coordinator.dispatch(&results).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].room.id, "00006");
}
