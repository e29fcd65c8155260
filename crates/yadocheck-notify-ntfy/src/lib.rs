// # yadocheck-notify-ntfy
//
// `Notifier` implementation publishing to an ntfy.sh topic.
//
// ntfy's publish API is a plain POST: the body is the message, metadata
// rides in headers. Alerts for rooms with a private bath are bumped to
// urgent priority.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use yadocheck_core::error::{Error, Result};
use yadocheck_core::traits::Notifier;
use yadocheck_core::NotifiableEvent;

/// Default ntfy server
pub const DEFAULT_SERVER: &str = "https://ntfy.sh";

/// Delivery timeout per alert
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Notifier posting availability alerts to one ntfy topic
pub struct NtfyNotifier {
    url: String,
    client: reqwest::Client,
}

impl NtfyNotifier {
    /// Create a notifier for a topic on the public ntfy.sh server
    pub fn new(topic: impl AsRef<str>) -> Result<Self> {
        Self::with_server(DEFAULT_SERVER, topic)
    }

    /// Create a notifier for a topic on a self-hosted server
    pub fn with_server(server: &str, topic: impl AsRef<str>) -> Result<Self> {
        let topic = topic.as_ref();
        if topic.is_empty() {
            return Err(Error::config("ntfy topic cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| Error::notify(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: format!("{}/{topic}", server.trim_end_matches('/')),
            client,
        })
    }

    fn priority_for(event: &NotifiableEvent) -> &'static str {
        if event.room.has_private_bath {
            "urgent"
        } else {
            "high"
        }
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn notify(&self, event: &NotifiableEvent) -> Result<()> {
        debug!(
            property = %event.property,
            room = %event.room.id,
            "publishing ntfy alert"
        );

        let response = self
            .client
            .post(&self.url)
            .header("Title", event.title())
            .header("Priority", Self::priority_for(event))
            .header("Tags", "jp,hotel,onsen")
            .header("Click", &event.booking_url)
            .body(event.message())
            .send()
            .await
            .map_err(|e| Error::notify(format!("ntfy publish failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "ntfy rejected the alert");
            return Err(Error::notify(format!("ntfy returned {status}")));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ntfy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use yadocheck_core::{PropertyId, Query, RoomInfo};

    fn event(private_bath: bool) -> NotifiableEvent {
        NotifiableEvent {
            property: PropertyId::Miyamaso,
            room: RoomInfo::new("25112", "HINAKURA Villa", 4, private_bath),
            query: Query::new(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(), 1, 2),
            timestamp: Utc::now(),
            price_per_person: Some(55000),
            spots_left: None,
            booking_url: "https://example.invalid/book".to_string(),
        }
    }

    #[test]
    fn private_bath_rooms_get_urgent_priority() {
        assert_eq!(NtfyNotifier::priority_for(&event(true)), "urgent");
        assert_eq!(NtfyNotifier::priority_for(&event(false)), "high");
    }

    #[test]
    fn topic_is_appended_to_the_server_url() {
        let notifier = NtfyNotifier::with_server("https://ntfy.example/", "room-alerts").unwrap();
        assert_eq!(notifier.url, "https://ntfy.example/room-alerts");
    }

    #[test]
    fn empty_topic_is_rejected() {
        assert!(NtfyNotifier::new("").is_err());
    }
}
