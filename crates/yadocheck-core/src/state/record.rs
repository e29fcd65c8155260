//! Per-property alert history
//!
//! A [`NotificationRecord`] is a small map from room+stay keys to the
//! timestamp of the last alert. All cooldown arithmetic lives here as pure
//! functions over caller-supplied timestamps, so slow notification
//! transports cannot skew the window: the `now` passed in is always the
//! check-time timestamp captured on the `CheckResult`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default cooldown before the same room may alert again
pub const DEFAULT_COOLDOWN_HOURS: i64 = 24;

/// Alert history for one property
///
/// Keys are `"{room_id}:{check_in}:{check_out}"`, so the same room alerts
/// independently for different stay dates. A key with no entry has either
/// never been alerted or had its expired entry pruned; both mean "alert
/// away".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Room+stay key -> last alerted timestamp
    #[serde(default)]
    pub notified: BTreeMap<String, DateTime<Utc>>,
}

impl NotificationRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the history key for a room and stay
    pub fn room_key(room_id: &str, check_in: NaiveDate, check_out: NaiveDate) -> String {
        format!("{room_id}:{check_in}:{check_out}")
    }

    /// Whether an alert may fire for this key at `now`
    ///
    /// True iff the key has no entry, or at least the full cooldown has
    /// elapsed since the last alert. The boundary is inclusive: exactly
    /// `cooldown` after the last alert, the room is eligible again.
    pub fn should_notify(&self, key: &str, now: DateTime<Utc>, cooldown: Duration) -> bool {
        match self.notified.get(key) {
            None => true,
            Some(last) => now.signed_duration_since(*last) >= cooldown,
        }
    }

    /// Record an alert for this key at `now`
    pub fn record_notified(&mut self, key: &str, now: DateTime<Utc>) {
        self.notified.insert(key.to_string(), now);
    }

    /// Drop entries whose cooldown has fully expired
    ///
    /// Expired entries and absent entries mean the same thing to
    /// [`Self::should_notify`]; pruning just keeps the persisted file from
    /// growing with stale stays.
    pub fn prune_expired(&mut self, now: DateTime<Utc>, cooldown: Duration) {
        self.notified
            .retain(|_, last| now.signed_duration_since(*last) < cooldown);
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.notified.len()
    }

    /// Whether the record has no entries
    pub fn is_empty(&self) -> bool {
        self.notified.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> String {
        NotificationRecord::room_key(
            "00001",
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
        )
    }

    fn cooldown() -> Duration {
        Duration::hours(DEFAULT_COOLDOWN_HOURS)
    }

    #[test]
    fn no_entry_means_notify() {
        let record = NotificationRecord::new();
        assert!(record.should_notify(&key(), Utc::now(), cooldown()));
    }

    #[test]
    fn within_cooldown_suppresses() {
        let now = Utc::now();
        let mut record = NotificationRecord::new();
        record.record_notified(&key(), now);

        // one hour later: still suppressed
        assert!(!record.should_notify(&key(), now + Duration::hours(1), cooldown()));
        // just shy of the window: still suppressed
        assert!(!record.should_notify(
            &key(),
            now + cooldown() - Duration::seconds(1),
            cooldown()
        ));
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let now = Utc::now();
        let mut record = NotificationRecord::new();
        record.record_notified(&key(), now);

        assert!(record.should_notify(&key(), now + cooldown(), cooldown()));
        assert!(record.should_notify(&key(), now + cooldown() + Duration::hours(1), cooldown()));
    }

    #[test]
    fn different_stays_tracked_separately() {
        let now = Utc::now();
        let check_in = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let other_in = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let k1 = NotificationRecord::room_key("00001", check_in, check_in + chrono::Days::new(1));
        let k2 = NotificationRecord::room_key("00001", other_in, other_in + chrono::Days::new(1));

        let mut record = NotificationRecord::new();
        record.record_notified(&k1, now);

        assert!(!record.should_notify(&k1, now, cooldown()));
        assert!(record.should_notify(&k2, now, cooldown()));
    }

    #[test]
    fn prune_drops_only_expired_entries() {
        let now = Utc::now();
        let mut record = NotificationRecord::new();
        record.record_notified("fresh", now - Duration::hours(1));
        record.record_notified("stale", now - Duration::hours(25));

        record.prune_expired(now, cooldown());

        assert_eq!(record.len(), 1);
        assert!(record.notified.contains_key("fresh"));
    }
}
