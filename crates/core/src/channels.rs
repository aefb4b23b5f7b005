//! Notification delivery channel constants.
//!
//! These match the `channel` column values on the `notifications` table.

/// Delivered inside the portal (bell icon, polled by the dashboard).
pub const CHANNEL_IN_APP: &str = "in_app";

/// Delivered by SMTP when mail is configured.
pub const CHANNEL_EMAIL: &str = "email";
