//! Escalation sweeper.
//!
//! [`EscalationSweeper`] runs as a background task, periodically loading the
//! active escalation rules and checking them against open tickets. When a
//! rule matches a ticket for the first time the sweeper records the
//! at-most-once marker and publishes a `ticket.escalated` event; the
//! notification router turns that into notifications for the target role.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kiss_core::escalation::{rule_matches, RuleCriteria, TicketFacts};
use kiss_core::ticket::{TicketCategory, TicketStatus};
use kiss_db::models::escalation_rule::EscalationRule;
use kiss_db::models::ticket::EscalatableTicket;
use kiss_db::repositories::{EscalationRepo, TicketRepo};
use kiss_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::bus::{EventBus, PortalEvent};

/// Default sweep interval.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(900);

// ---------------------------------------------------------------------------
// EscalationSweeper
// ---------------------------------------------------------------------------

/// Background service that applies escalation rules on a periodic basis.
pub struct EscalationSweeper {
    pool: DbPool,
    bus: Arc<EventBus>,
    interval: Duration,
}

impl EscalationSweeper {
    /// Create a sweeper with the default interval.
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self {
            pool,
            bus,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Override the sweep interval (configuration and tests).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the sweep loop.
    ///
    /// The loop exits gracefully when the provided [`CancellationToken`]
    /// is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Escalation sweeper cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep().await {
                        tracing::error!(error = %e, "Escalation sweep failed");
                    }
                }
            }
        }
    }

    /// One pass: evaluate every active rule against its candidate tickets.
    pub async fn sweep(&self) -> Result<(), sqlx::Error> {
        let rules = EscalationRepo::list_active(&self.pool).await?;
        let now = Utc::now();
        let mut fired = 0usize;

        for rule in &rules {
            let criteria = match rule_criteria(rule) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(rule_id = rule.id, error = %e, "Skipping malformed rule");
                    continue;
                }
            };

            let candidates = TicketRepo::list_escalation_candidates(&self.pool, rule.id).await?;

            for ticket in &candidates {
                let facts = match ticket_facts(ticket) {
                    Ok(f) => f,
                    Err(e) => {
                        tracing::warn!(ticket_id = ticket.id, error = %e, "Skipping ticket with bad columns");
                        continue;
                    }
                };

                if !rule_matches(&criteria, &facts, now) {
                    continue;
                }

                // The marker insert is the race arbiter; losing it means
                // another sweep already escalated this pair.
                if !EscalationRepo::mark_escalated(&self.pool, rule.id, ticket.id).await? {
                    continue;
                }

                tracing::info!(
                    rule_id = rule.id,
                    ticket_id = ticket.id,
                    ticket_number = %ticket.ticket_number,
                    "Escalating overdue ticket"
                );

                self.bus.publish(
                    PortalEvent::new("ticket.escalated")
                        .with_source("ticket", ticket.id)
                        .with_payload(serde_json::json!({
                            "ticket_number": ticket.ticket_number,
                            "subject": ticket.subject,
                            "unit_id": ticket.unit_id,
                            "rule_id": rule.id,
                            "rule_name": rule.name,
                            "escalate_to_role": rule.escalate_to_role,
                            "notify_email": rule.notify_email,
                        })),
                );
                fired += 1;
            }
        }

        if fired > 0 {
            tracing::info!(fired, rules = rules.len(), "Escalation sweep complete");
        }

        Ok(())
    }
}

/// Convert a rule row into the pure matching criteria.
fn rule_criteria(rule: &EscalationRule) -> Result<RuleCriteria, kiss_core::error::CoreError> {
    let category = rule
        .ticket_category
        .as_deref()
        .map(TicketCategory::parse)
        .transpose()?;
    Ok(RuleCriteria {
        unit_id: rule.unit_id,
        category,
        threshold_hours: rule.threshold_hours,
    })
}

/// Convert a candidate ticket row into the pure matching facts.
fn ticket_facts(ticket: &EscalatableTicket) -> Result<TicketFacts, kiss_core::error::CoreError> {
    Ok(TicketFacts {
        unit_id: ticket.unit_id,
        category: TicketCategory::parse(&ticket.category)?,
        status: TicketStatus::parse(&ticket.status)?,
        created_at: ticket.created_at,
    })
}
