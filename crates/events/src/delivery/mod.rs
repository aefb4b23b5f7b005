//! External delivery channels for portal notifications.
//!
//! Currently only SMTP email; in-app notifications are plain database rows
//! polled by the dashboard.

pub mod email;
