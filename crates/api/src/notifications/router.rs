//! Event-to-notification routing engine.
//!
//! [`NotificationRouter`] subscribes to the portal event bus and turns the
//! events that concern staff into in-app notification rows. Escalation
//! events additionally go out by email when the matching rule configured a
//! recipient address.

use kiss_core::channels::CHANNEL_IN_APP;
use kiss_core::roles::ROLE_STAFF;
use kiss_core::types::DbId;
use kiss_db::models::notification::CreateNotification;
use kiss_db::repositories::{NotificationRepo, TicketRepo, UserRepo};
use kiss_db::DbPool;
use kiss_events::{EmailDelivery, PortalEvent};
use tokio::sync::broadcast;

/// Routes portal events to user notifications.
///
/// Consumes events from the broadcast channel and, for each event type it
/// knows about, determines the target users and inserts an in-app
/// notification per user.
pub struct NotificationRouter {
    pool: DbPool,
    email: Option<EmailDelivery>,
}

impl NotificationRouter {
    /// Create a new router. `email` is `None` when SMTP is not configured;
    /// escalation emails are then skipped with a log line.
    pub fn new(pool: DbPool, email: Option<EmailDelivery>) -> Self {
        Self { pool, email }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](kiss_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PortalEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Route a single event. Event types with no notification audience are
    /// ignored; they still reach the durable event log via the persistence
    /// service.
    async fn route_event(
        &self,
        event: &PortalEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match event.event_type.as_str() {
            "ticket.created" => self.on_ticket_created(event).await,
            "ticket.status_changed" => self.on_ticket_status_changed(event).await,
            "ticket.escalated" => self.on_ticket_escalated(event).await,
            _ => Ok(()),
        }
    }

    /// New ticket: notify every active staff member of the receiving unit.
    async fn on_ticket_created(
        &self,
        event: &PortalEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(unit_id) = event.payload["unit_id"].as_i64() else {
            tracing::warn!("ticket.created event missing unit_id payload");
            return Ok(());
        };
        let ticket_number = event.payload["ticket_number"].as_str().unwrap_or("?");
        let subject = event.payload["subject"].as_str().unwrap_or("");

        let staff = UserRepo::list_staff_of_unit(&self.pool, unit_id).await?;
        for user in staff {
            self.notify(
                user.id,
                format!("New ticket {ticket_number}"),
                subject.to_string(),
            )
            .await?;
        }
        Ok(())
    }

    /// Status change: notify the assigned handler, unless they made the
    /// change themselves.
    async fn on_ticket_status_changed(
        &self,
        event: &PortalEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(ticket_id) = event.source_entity_id else {
            return Ok(());
        };
        let Some(ticket) = TicketRepo::find_by_id(&self.pool, ticket_id).await? else {
            return Ok(());
        };
        let Some(assignee) = ticket.assigned_user_id else {
            return Ok(());
        };
        if event.actor_user_id == Some(assignee) {
            return Ok(());
        }

        let to_status = event.payload["to_status"].as_str().unwrap_or("?");
        self.notify(
            assignee,
            format!("Ticket {} is now {to_status}", ticket.ticket_number),
            ticket.subject.clone(),
        )
        .await?;
        Ok(())
    }

    /// Escalation: notify every user holding the rule's target role, plus
    /// the rule's extra email recipient if SMTP is configured.
    async fn on_ticket_escalated(
        &self,
        event: &PortalEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let role = event.payload["escalate_to_role"].as_str().unwrap_or("");
        let ticket_number = event.payload["ticket_number"].as_str().unwrap_or("?");
        let subject = event.payload["subject"].as_str().unwrap_or("");
        let rule_name = event.payload["rule_name"].as_str().unwrap_or("?");

        // Staff targets are narrowed to the ticket's unit; admin roles see
        // everything so no unit filter applies.
        let unit_scope = if role == ROLE_STAFF {
            event.payload["unit_id"].as_i64()
        } else {
            None
        };

        let title = format!("Ticket {ticket_number} escalated ({rule_name})");
        let targets = UserRepo::list_by_role(&self.pool, role, unit_scope).await?;
        for user in targets {
            self.notify(user.id, title.clone(), subject.to_string()).await?;
        }

        if let Some(to) = event.payload["notify_email"].as_str() {
            match &self.email {
                Some(email) => {
                    if let Err(e) = email
                        .deliver(to, &title, &format!("{subject}\n\nRule: {rule_name}"))
                        .await
                    {
                        tracing::error!(error = %e, to, "Failed to send escalation email");
                    }
                }
                None => {
                    tracing::debug!(to, "SMTP not configured, skipping escalation email");
                }
            }
        }
        Ok(())
    }

    /// Insert one in-app notification row.
    async fn notify(&self, user_id: DbId, title: String, body: String) -> Result<(), sqlx::Error> {
        NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id,
                title,
                body,
                channel: CHANNEL_IN_APP.to_string(),
                event_id: None,
            },
        )
        .await?;
        Ok(())
    }
}
