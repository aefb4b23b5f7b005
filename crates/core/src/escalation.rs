//! Escalation rule matching.
//!
//! A rule names a ticket population (optionally narrowed to a unit and a
//! category) and an age threshold. A ticket matches when it is still in an
//! escalatable status and has been waiting longer than the threshold. The
//! sweeper in `kiss-events` applies this predicate over database rows and
//! guarantees at-most-once firing per (rule, ticket) pair.

use chrono::Duration;

use crate::ticket::{TicketCategory, TicketStatus};
use crate::types::{DbId, Timestamp};

/// The matching criteria of an escalation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCriteria {
    /// Restrict to one unit, or `None` for hospital-wide.
    pub unit_id: Option<DbId>,
    /// Restrict to one ticket category, or `None` for all.
    pub category: Option<TicketCategory>,
    /// Minimum ticket age, in hours, before the rule fires.
    pub threshold_hours: i32,
}

/// The facts about a ticket the predicate needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketFacts {
    pub unit_id: DbId,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub created_at: Timestamp,
}

/// Whether `rule` should fire for `ticket` as of `now`.
pub fn rule_matches(rule: &RuleCriteria, ticket: &TicketFacts, now: Timestamp) -> bool {
    if !ticket.status.is_escalatable() {
        return false;
    }
    if let Some(unit_id) = rule.unit_id {
        if unit_id != ticket.unit_id {
            return false;
        }
    }
    if let Some(category) = rule.category {
        if category != ticket.category {
            return false;
        }
    }
    now - ticket.created_at >= Duration::hours(i64::from(rule.threshold_hours))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn ticket(age_hours: i64, status: TicketStatus) -> TicketFacts {
        TicketFacts {
            unit_id: 7,
            category: TicketCategory::Complaint,
            status,
            created_at: Utc::now() - Duration::hours(age_hours),
        }
    }

    fn global_rule(threshold_hours: i32) -> RuleCriteria {
        RuleCriteria {
            unit_id: None,
            category: None,
            threshold_hours,
        }
    }

    #[test]
    fn fires_when_past_threshold() {
        let rule = global_rule(24);
        assert!(rule_matches(&rule, &ticket(25, TicketStatus::Open), Utc::now()));
        assert!(rule_matches(
            &rule,
            &ticket(48, TicketStatus::InProgress),
            Utc::now()
        ));
    }

    #[test]
    fn does_not_fire_before_threshold() {
        let rule = global_rule(24);
        assert!(!rule_matches(&rule, &ticket(23, TicketStatus::Open), Utc::now()));
    }

    #[test]
    fn terminal_statuses_never_fire() {
        let rule = global_rule(1);
        for status in [
            TicketStatus::Resolved,
            TicketStatus::Closed,
            TicketStatus::Rejected,
        ] {
            assert!(!rule_matches(&rule, &ticket(100, status), Utc::now()));
        }
    }

    #[test]
    fn unit_scope_is_respected() {
        let mut rule = global_rule(1);
        rule.unit_id = Some(7);
        assert!(rule_matches(&rule, &ticket(2, TicketStatus::Open), Utc::now()));

        rule.unit_id = Some(8);
        assert!(!rule_matches(&rule, &ticket(2, TicketStatus::Open), Utc::now()));
    }

    #[test]
    fn category_scope_is_respected() {
        let mut rule = global_rule(1);
        rule.category = Some(TicketCategory::Suggestion);
        assert!(!rule_matches(&rule, &ticket(2, TicketStatus::Open), Utc::now()));

        rule.category = Some(TicketCategory::Complaint);
        assert!(rule_matches(&rule, &ticket(2, TicketStatus::Open), Utc::now()));
    }
}
