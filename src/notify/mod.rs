//! Notification module
//!
//! This module handles everything that leaves the process as a message:
//! - Composing baseline, new-tournament and error messages
//! - Sanitizing and truncating text for the sink
//! - Posting to a webhook

pub mod message;
mod traits;
mod webhook;

pub use message::{baseline_message, error_message, new_tournaments_message, sanitize, MAX_MESSAGE_CHARS};
pub use traits::{Delivery, Notifier, NotifyError, NotifyResult};
pub use webhook::WebhookNotifier;
