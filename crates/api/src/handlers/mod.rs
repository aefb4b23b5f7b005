//! HTTP handlers, one module per resource.

pub mod auth;
pub mod dashboard;
pub mod escalations;
pub mod games;
pub mod notifications;
pub mod qr;
pub mod reports;
pub mod service_categories;
pub mod surveys;
pub mod tickets;
pub mod units;
pub mod users;
pub mod visitors;
