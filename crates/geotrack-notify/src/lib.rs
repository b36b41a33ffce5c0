//! GeoTrack Notify - Notification channels
//!
//! One capability, [`NotificationChannel`], with a log and a webhook
//! implementation selected by configuration. [`ChannelNotifier`] adapts any
//! channel to the core alert notification port.

pub mod log;
pub mod notifier;
pub mod ports;
pub mod webhook;

pub use log::LogChannel;
pub use notifier::{build_channel, ChannelNotifier};
pub use ports::{NotificationChannel, NotificationContent, NotificationOutcome, Recipient};
pub use webhook::WebhookChannel;
