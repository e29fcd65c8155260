// # Notifier Trait
//
// Defines the interface for alert delivery.
//
// ## Implementations
//
// - ntfy.sh push topic: `yadocheck-notify-ntfy` crate
//
// The core calls `notify` once per eligible event, in the order events were
// produced. Transports must not retry forever: the cooldown for an event is
// recorded before delivery is attempted, so a failed delivery is logged and
// the room is simply re-alerted after the cooldown expires (duplicate
// suppression is prioritized over guaranteed delivery).

use async_trait::async_trait;

use crate::domain::NotifiableEvent;
use crate::error::Result;

/// Trait for notification transport implementations
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the transport accepted the alert
    /// - `Err(Error)`: delivery failed; the caller logs and moves on
    async fn notify(&self, event: &NotifiableEvent) -> Result<()>;

    /// Transport name (for logging/debugging)
    fn name(&self) -> &'static str;
}
