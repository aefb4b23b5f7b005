//! Ticket lifecycle rules: kind, category, and the status transition graph.
//!
//! Tickets are stored with TEXT status/kind/category columns; these enums
//! are the single source of truth for the accepted values and for which
//! status transitions the API may perform.
//!
//! Status graph:
//!
//! ```text
//! open ──> in_progress ──> resolved ──> closed
//!   │           │
//!   └───────────┴──> rejected
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Whether a ticket was raised by hospital staff or by a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    Internal,
    External,
}

impl TicketKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketKind::Internal => "internal",
            TicketKind::External => "external",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "internal" => Ok(TicketKind::Internal),
            "external" => Ok(TicketKind::External),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket kind '{other}' (expected internal or external)"
            ))),
        }
    }
}

/// What the reporter is submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    Complaint,
    Suggestion,
    Information,
}

impl TicketCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketCategory::Complaint => "complaint",
            TicketCategory::Suggestion => "suggestion",
            TicketCategory::Information => "information",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "complaint" => Ok(TicketCategory::Complaint),
            "suggestion" => Ok(TicketCategory::Suggestion),
            "information" => Ok(TicketCategory::Information),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket category '{other}' (expected complaint, suggestion, or information)"
            ))),
        }
    }
}

/// Ticket processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Rejected,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
            TicketStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            "rejected" => Ok(TicketStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket status '{other}'"
            ))),
        }
    }

    /// Whether the graph allows moving from `self` to `to`.
    pub fn can_transition_to(self, to: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, to),
            (Open, InProgress)
                | (Open, Rejected)
                | (InProgress, Resolved)
                | (InProgress, Rejected)
                | (Resolved, Closed)
        )
    }

    /// Validate a requested transition, with the attempted pair in the error.
    pub fn validate_transition(self, to: TicketStatus) -> Result<(), CoreError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid status transition: {} -> {}",
                self.as_str(),
                to.as_str()
            )))
        }
    }

    /// Statuses from which escalation rules may still fire.
    pub fn is_escalatable(self) -> bool {
        matches!(self, TicketStatus::Open | TicketStatus::InProgress)
    }
}

/// Format a ticket number from the per-month sequence.
///
/// Convention: `KISS-YYYYMM-NNNN`, e.g. `KISS-202608-0042`.
pub fn format_ticket_number(year: i32, month: u32, seq: i64) -> String {
    format!("KISS-{year:04}{month:02}-{seq:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::InProgress));
        assert!(TicketStatus::InProgress.can_transition_to(TicketStatus::Resolved));
        assert!(TicketStatus::Resolved.can_transition_to(TicketStatus::Closed));
    }

    #[test]
    fn rejection_only_before_resolution() {
        assert!(TicketStatus::Open.can_transition_to(TicketStatus::Rejected));
        assert!(TicketStatus::InProgress.can_transition_to(TicketStatus::Rejected));
        assert!(!TicketStatus::Resolved.can_transition_to(TicketStatus::Rejected));
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Rejected));
    }

    #[test]
    fn no_backwards_or_skip_transitions() {
        assert!(!TicketStatus::Open.can_transition_to(TicketStatus::Resolved));
        assert!(!TicketStatus::Open.can_transition_to(TicketStatus::Closed));
        assert!(!TicketStatus::Resolved.can_transition_to(TicketStatus::Open));
        assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::InProgress));
        assert!(!TicketStatus::Rejected.can_transition_to(TicketStatus::Open));
    }

    #[test]
    fn invalid_transition_names_the_pair() {
        let err = TicketStatus::Closed
            .validate_transition(TicketStatus::Open)
            .unwrap_err();
        assert!(err.to_string().contains("closed -> open"));
    }

    #[test]
    fn parse_round_trips() {
        for s in ["open", "in_progress", "resolved", "closed", "rejected"] {
            assert_eq!(TicketStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(TicketStatus::parse("pending").is_err());
    }

    #[test]
    fn ticket_number_format() {
        assert_eq!(format_ticket_number(2026, 8, 42), "KISS-202608-0042");
        assert_eq!(format_ticket_number(2026, 12, 1), "KISS-202612-0001");
        // Sequence wider than four digits is not truncated.
        assert_eq!(format_ticket_number(2026, 1, 12345), "KISS-202601-12345");
    }
}
