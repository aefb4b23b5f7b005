//! Domain logic for the KISS hospital portal.
//!
//! Pure types and rules shared by the database and API layers: the error
//! taxonomy, ticket lifecycle, phone validation, survey statistics,
//! QR code tokens, and escalation rule matching. No I/O lives here.

pub mod channels;
pub mod error;
pub mod escalation;
pub mod export;
pub mod phone;
pub mod qr;
pub mod roles;
pub mod survey;
pub mod ticket;
pub mod types;
