//! Event-driven notification routing.

pub mod router;

pub use router::NotificationRouter;
