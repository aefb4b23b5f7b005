//! Row structs and DTOs, one module per table (or tightly-coupled pair).

pub mod escalation_rule;
pub mod event;
pub mod game_score;
pub mod notification;
pub mod qr_code;
pub mod role;
pub mod service_category;
pub mod session;
pub mod survey;
pub mod ticket;
pub mod unit;
pub mod user;
pub mod visitor;
