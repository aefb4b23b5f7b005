//! KISS event bus and notification infrastructure.
//!
//! Building blocks for the portal-wide event system:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PortalEvent`] — the canonical domain event envelope.
//! - [`EventPersistence`] — background service that durably writes every
//!   event to the `events` table.
//! - [`EscalationSweeper`] — periodic service applying escalation rules
//!   to overdue tickets.
//! - [`delivery`] — external delivery channels (email).

pub mod bus;
pub mod delivery;
pub mod escalation;
pub mod persistence;

pub use bus::{EventBus, PortalEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use escalation::EscalationSweeper;
pub use persistence::EventPersistence;
