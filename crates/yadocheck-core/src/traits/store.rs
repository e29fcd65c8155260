// # Notification Store Trait
//
// Defines the interface for persistent per-property alert history.
//
// ## Purpose
//
// The store is what keeps repeated checks from re-alerting the same room:
// it remembers when each room+stay combination was last alerted so the
// dispatch coordinator can enforce the cooldown window.
//
// ## Implementations
//
// - File-based (one JSON file per property, atomic replace): [`crate::state::FileNotificationStore`]
// - In-memory (tests, ephemeral runs): [`crate::state::MemoryNotificationStore`]

use async_trait::async_trait;

use crate::domain::PropertyId;
use crate::error::Result;
use crate::state::NotificationRecord;

/// Trait for notification store implementations
///
/// # Thread safety
///
/// Implementations must be safe to call from multiple tasks. They do not
/// have to serialize read-decide-write cycles themselves; the dispatch
/// coordinator holds a per-property critical section around `load` → decide
/// → `save`.
///
/// # Corruption
///
/// An unreadable or invalid persisted record is not fatal: `load` recovers
/// by returning an empty record (logged as a warning), which at worst causes
/// one extra alert rather than a crashed cycle.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Load the alert history for one property
    ///
    /// Missing state is indistinguishable from "never alerted": both come
    /// back as an empty record.
    async fn load(&self, property: PropertyId) -> Result<NotificationRecord>;

    /// Persist the alert history for one property
    ///
    /// Persistence is atomic per property: a crash mid-save leaves either
    /// the old or the new state on disk, never a hybrid.
    async fn save(&self, property: PropertyId, record: &NotificationRecord) -> Result<()>;
}
