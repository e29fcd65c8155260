// # yadocheck-core
//
// Core library for the ryokan availability checker.
//
// ## Architecture Overview
//
// This library provides the core functionality for watching room
// availability at small Japanese inns:
// - **AvailabilityScraper**: Trait implemented by one adapter per booking backend
// - **PageDriver / PageSession**: Traits abstracting browser page automation
// - **NotificationStore**: Trait for persistent alert history (cooldown dedup)
// - **Notifier**: Trait for alert delivery transports
// - **AvailabilityEngine**: Runs scrapers concurrently with per-property isolation
// - **DispatchCoordinator**: Applies the cooldown and decides which alerts fire
// - **PropertyRegistry**: Binds properties to room catalogs and scrapers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from backend adapters
// 2. **Plugin-Based**: Properties are registered dynamically, no hard-coded if-else
// 3. **Library-First**: All core functionality can be used without the daemon
// 4. **Isolation**: One property's failure never blocks another's results

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod engine;
pub mod error;
pub mod registry;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::CheckConfig;
pub use dispatch::DispatchCoordinator;
pub use domain::{
    CheckFailure, CheckResult, NotifiableEvent, PropertyId, Query, RoomAvailability, RoomInfo,
};
pub use engine::AvailabilityEngine;
pub use error::{Error, Result};
pub use registry::{PropertyConfig, PropertyRegistry};
pub use state::{FileNotificationStore, MemoryNotificationStore, NotificationRecord};
pub use traits::{AvailabilityScraper, NotificationStore, Notifier, PageDriver, PageSession};
