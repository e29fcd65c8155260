//! Notification state management
//!
//! Implementations of [`crate::traits::NotificationStore`] plus the
//! [`NotificationRecord`] value type they persist.

pub mod file;
pub mod memory;
pub mod record;

pub use file::FileNotificationStore;
pub use memory::MemoryNotificationStore;
pub use record::NotificationRecord;
