//! Integration tests for the ticket repository: numbering, status history,
//! soft delete, and escalation bookkeeping. Runs against a real database
//! with the crate's migrations applied.

use sqlx::PgPool;

use kiss_db::models::escalation_rule::CreateEscalationRule;
use kiss_db::models::ticket::{CreateTicket, TicketFilter};
use kiss_db::models::unit::{CreateUnit, CreateUnitType};
use kiss_db::repositories::{EscalationRepo, TicketRepo, UnitRepo, UnitTypeRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_unit(pool: &PgPool, code: &str) -> i64 {
    let unit_type = UnitTypeRepo::create(
        pool,
        &CreateUnitType {
            name: format!("type-{code}"),
            description: None,
        },
    )
    .await
    .expect("create unit type");

    UnitRepo::create(
        pool,
        &CreateUnit {
            name: format!("Unit {code}"),
            code: code.to_string(),
            unit_type_id: unit_type.id,
        },
    )
    .await
    .expect("create unit")
    .id
}

fn new_ticket(unit_id: i64, subject: &str) -> CreateTicket {
    CreateTicket {
        kind: "external".to_string(),
        category: "complaint".to_string(),
        unit_id,
        reporter_name: "Budi".to_string(),
        reporter_phone: Some("081234567890".to_string()),
        reporter_email: None,
        reporter_user_id: None,
        subject: subject.to_string(),
        body: "Something went wrong".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn ticket_numbers_are_sequential_within_month(pool: PgPool) {
    let unit_id = seed_unit(&pool, "IGD").await;

    let first = TicketRepo::create(&pool, &new_ticket(unit_id, "first"))
        .await
        .expect("create first ticket");
    let second = TicketRepo::create(&pool, &new_ticket(unit_id, "second"))
        .await
        .expect("create second ticket");

    assert!(first.ticket_number.starts_with("KISS-"));
    assert!(first.ticket_number.ends_with("-0001"));
    assert!(second.ticket_number.ends_with("-0002"));
    assert_eq!(first.status, "open");
}

#[sqlx::test]
async fn status_change_records_history_and_stamps_times(pool: PgPool) {
    let unit_id = seed_unit(&pool, "LAB").await;
    let ticket = TicketRepo::create(&pool, &new_ticket(unit_id, "slow result"))
        .await
        .expect("create ticket");

    let ticket = TicketRepo::change_status(&pool, ticket.id, "open", "in_progress", None, None)
        .await
        .expect("open -> in_progress");
    assert_eq!(ticket.status, "in_progress");
    assert!(ticket.resolved_at.is_none());

    let ticket = TicketRepo::change_status(
        &pool,
        ticket.id,
        "in_progress",
        "resolved",
        None,
        Some("fixed"),
    )
    .await
    .expect("in_progress -> resolved");
    assert!(ticket.resolved_at.is_some());

    let history = TicketRepo::history(&pool, ticket.id).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].from_status, "open");
    assert_eq!(history[0].to_status, "in_progress");
    assert_eq!(history[1].to_status, "resolved");
    assert_eq!(history[1].note.as_deref(), Some("fixed"));
}

#[sqlx::test]
async fn soft_delete_hides_and_restore_reveals(pool: PgPool) {
    let unit_id = seed_unit(&pool, "GIZI").await;
    let ticket = TicketRepo::create(&pool, &new_ticket(unit_id, "cold food"))
        .await
        .expect("create ticket");

    assert!(TicketRepo::soft_delete(&pool, ticket.id).await.expect("delete"));
    assert!(TicketRepo::find_by_id(&pool, ticket.id)
        .await
        .expect("find")
        .is_none());

    let listed = TicketRepo::list(&pool, &TicketFilter::default(), None, 50, 0)
        .await
        .expect("list");
    assert!(listed.is_empty());

    // Second delete is a no-op.
    assert!(!TicketRepo::soft_delete(&pool, ticket.id).await.expect("redelete"));

    assert!(TicketRepo::restore(&pool, ticket.id).await.expect("restore"));
    assert!(TicketRepo::find_by_id(&pool, ticket.id)
        .await
        .expect("find after restore")
        .is_some());
}

#[sqlx::test]
async fn list_filters_by_unit_and_status(pool: PgPool) {
    let unit_a = seed_unit(&pool, "A").await;
    let unit_b = seed_unit(&pool, "B").await;

    let t1 = TicketRepo::create(&pool, &new_ticket(unit_a, "a-open"))
        .await
        .expect("t1");
    TicketRepo::create(&pool, &new_ticket(unit_b, "b-open"))
        .await
        .expect("t2");
    TicketRepo::change_status(&pool, t1.id, "open", "in_progress", None, None)
        .await
        .expect("progress t1");

    let filter = TicketFilter {
        status: Some("in_progress".to_string()),
        ..Default::default()
    };
    let rows = TicketRepo::list(&pool, &filter, None, 50, 0).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].subject, "a-open");

    // Staff scope restricts regardless of requested filter.
    let rows = TicketRepo::list(&pool, &TicketFilter::default(), Some(unit_b), 50, 0)
        .await
        .expect("scoped list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].unit_id, unit_b);
}

#[sqlx::test]
async fn escalation_marker_fires_at_most_once(pool: PgPool) {
    let unit_id = seed_unit(&pool, "ICU").await;
    let ticket = TicketRepo::create(&pool, &new_ticket(unit_id, "stale"))
        .await
        .expect("create ticket");

    let rule = EscalationRepo::create(
        &pool,
        &CreateEscalationRule {
            name: "24h complaints".to_string(),
            unit_id: None,
            ticket_category: None,
            threshold_hours: 24,
            escalate_to_role: "admin".to_string(),
            notify_email: None,
        },
    )
    .await
    .expect("create rule");

    let candidates = TicketRepo::list_escalation_candidates(&pool, rule.id)
        .await
        .expect("candidates");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, ticket.id);

    assert!(EscalationRepo::mark_escalated(&pool, rule.id, ticket.id)
        .await
        .expect("first mark"));
    assert!(!EscalationRepo::mark_escalated(&pool, rule.id, ticket.id)
        .await
        .expect("second mark"));

    let candidates = TicketRepo::list_escalation_candidates(&pool, rule.id)
        .await
        .expect("candidates after mark");
    assert!(candidates.is_empty());
}
