//! Integration tests for the admin surfaces: ticket workflow, unit
//! management, QR codes and the public scan redirect, escalation rules,
//! notifications, and staff unit scoping.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_unit, create_test_user, delete_auth, get, get_auth, login_token,
    post_json, post_json_auth, put_json_auth, ROLE_ID_ADMIN, ROLE_ID_STAFF,
};
use sqlx::PgPool;

/// Submit a ticket through the public endpoint and return its id.
async fn submit_ticket(pool: &PgPool, unit_id: i64, subject: &str) -> i64 {
    let body = serde_json::json!({
        "kind": "external",
        "category": "complaint",
        "unit_id": unit_id,
        "reporter_name": "Reporter",
        "subject": subject,
        "body": "details",
    });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/tickets", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let number = json["data"]["ticket_number"].as_str().unwrap();

    // The public view hides the id; look it up by number.
    sqlx::query_scalar::<_, i64>("SELECT id FROM tickets WHERE ticket_number = $1")
        .bind(number)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Ticket workflow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn ticket_status_walks_the_transition_graph(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "ER", "ER").await;
    let ticket_id = submit_ticket(&pool, unit_id, "noise at night").await;
    let (_user, password) = create_test_user(&pool, "handler", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "handler", &password).await;

    for (status, expected) in [
        ("in_progress", StatusCode::OK),
        ("resolved", StatusCode::OK),
        ("closed", StatusCode::OK),
    ] {
        let body = serde_json::json!({ "status": status, "note": null });
        let response = put_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/admin/tickets/{ticket_id}/status"),
            &token,
            body,
        )
        .await;
        assert_eq!(response.status(), expected, "transition to {status}");
    }

    // Full history: one row per transition.
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/tickets/{ticket_id}/history"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn ticket_rejects_invalid_transition(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "ER", "ER").await;
    let ticket_id = submit_ticket(&pool, unit_id, "skipped queue").await;
    let (_user, password) = create_test_user(&pool, "handler", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "handler", &password).await;

    // open -> closed skips the graph.
    let body = serde_json::json!({ "status": "closed" });
    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/tickets/{ticket_id}/status"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_only_see_their_own_units_tickets(pool: PgPool) {
    let own_unit = create_test_unit(&pool, "Pediatrics", "PED").await;
    let other_unit = create_test_unit(&pool, "Surgery", "SUR").await;
    let own_ticket = submit_ticket(&pool, own_unit, "ours").await;
    let other_ticket = submit_ticket(&pool, other_unit, "theirs").await;

    let (_user, password) =
        create_test_user(&pool, "pedstaff", ROLE_ID_STAFF, Some(own_unit)).await;
    let token = login_token(common::build_test_app(pool.clone()), "pedstaff", &password).await;

    // The list only contains the staff member's unit.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/tickets",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let tickets = json["data"].as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["id"], own_ticket);

    // Another unit's ticket reads as if it did not exist.
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/tickets/{other_ticket}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_cannot_delete_tickets(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "Pediatrics", "PED").await;
    let ticket_id = submit_ticket(&pool, unit_id, "ours").await;

    let (_user, password) =
        create_test_user(&pool, "pedstaff", ROLE_ID_STAFF, Some(unit_id)).await;
    let token = login_token(common::build_test_app(pool.clone()), "pedstaff", &password).await;

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/tickets/{ticket_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleted_ticket_disappears_until_restored(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "ER", "ER").await;
    let ticket_id = submit_ticket(&pool, unit_id, "to delete").await;
    let (_user, password) = create_test_user(&pool, "cleaner", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "cleaner", &password).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/tickets/{ticket_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/tickets/{ticket_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = common::post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/tickets/{ticket_id}/restore"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/tickets/{ticket_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unit_crud_roundtrip(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "unitadmin", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "unitadmin", &password).await;

    let body = serde_json::json!({ "name": "Inpatient", "description": null });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/unit-types",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let type_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = serde_json::json!({ "name": "Ward A", "code": "WA", "unit_type_id": type_id });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/units",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let unit_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = serde_json::json!({ "name": "Ward A1" });
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/units/{unit_id}"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Ward A1");

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/units/{unit_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deactivated units drop out of the public list.
    let response = get(common::build_test_app(pool), "/api/v1/units").await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// QR codes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn qr_scan_redirects_and_counts(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "ICU", "ICU").await;
    let (_user, password) = create_test_user(&pool, "qradmin", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "qradmin", &password).await;

    let body = serde_json::json!({
        "label": "ICU feedback poster",
        "target": "form",
        "target_unit_id": unit_id,
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/qr",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let code = json["data"]["code"].as_str().unwrap().to_string();
    let qr_id = json["data"]["id"].as_i64().unwrap();

    // Public scan issues a temporary redirect to the survey form.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/qr/{code}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()["location"].to_str().unwrap();
    assert_eq!(location, format!("http://localhost:5173/survey?unit={unit_id}"));

    // The scan shows up in analytics.
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/qr/{qr_id}/analytics"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_scans"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn qr_scan_unknown_code_returns_404(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/qr/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn qr_scan_deactivated_code_returns_410(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "ICU", "ICU").await;
    let (_user, password) = create_test_user(&pool, "qradmin", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "qradmin", &password).await;

    let body = serde_json::json!({
        "label": "old poster",
        "target": "unit",
        "target_unit_id": unit_id,
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/qr",
        &token,
        body,
    )
    .await;
    let json = body_json(response).await;
    let code = json["data"]["code"].as_str().unwrap().to_string();
    let qr_id = json["data"]["id"].as_i64().unwrap();

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/qr/{qr_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/qr/{code}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::GONE);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn qr_create_rejects_relative_url_target(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "qradmin", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "qradmin", &password).await;

    let body = serde_json::json!({
        "label": "bad link",
        "target": "url",
        "target_url": "www.example.com/page",
    });
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/qr",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Escalation rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn escalation_rule_rejects_unknown_role(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "ruleadmin", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "ruleadmin", &password).await;

    let body = serde_json::json!({
        "name": "late complaints",
        "unit_id": null,
        "ticket_category": "complaint",
        "threshold_hours": 48,
        "escalate_to_role": "czar",
        "notify_email": null,
    });
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/escalation-rules",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn escalation_rule_crud(pool: PgPool) {
    let (_user, password) = create_test_user(&pool, "ruleadmin", ROLE_ID_ADMIN, None).await;
    let token = login_token(common::build_test_app(pool.clone()), "ruleadmin", &password).await;

    let body = serde_json::json!({
        "name": "late complaints",
        "unit_id": null,
        "ticket_category": "complaint",
        "threshold_hours": 48,
        "escalate_to_role": "admin",
        "notify_email": "duty@hospital.test",
    });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/escalation-rules",
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let rule_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = serde_json::json!({ "threshold_hours": 24 });
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/escalation-rules/{rule_id}"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["threshold_hours"], 24);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/escalation-rules/{rule_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn notifications_are_scoped_to_the_recipient(pool: PgPool) {
    use kiss_core::channels::CHANNEL_IN_APP;
    use kiss_db::models::notification::CreateNotification;
    use kiss_db::repositories::NotificationRepo;

    let (alice, alice_pw) = create_test_user(&pool, "alice", ROLE_ID_ADMIN, None).await;
    let (_bob, bob_pw) = create_test_user(&pool, "bob", ROLE_ID_ADMIN, None).await;

    let notification = NotificationRepo::create(
        &pool,
        &CreateNotification {
            user_id: alice.id,
            event_id: None,
            title: "Ticket KISS-202608-0001 escalated".to_string(),
            body: None,
            channel: CHANNEL_IN_APP.to_string(),
        },
    )
    .await
    .unwrap();

    let alice_token = login_token(common::build_test_app(pool.clone()), "alice", &alice_pw).await;
    let bob_token = login_token(common::build_test_app(pool.clone()), "bob", &bob_pw).await;

    // Alice sees it and can mark it read.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications/unread-count",
        &alice_token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["unread"], 1);

    // Bob cannot touch Alice's notification.
    let response = common::post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{}/read", notification.id),
        &bob_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = common::post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{}/read", notification.id),
        &alice_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/notifications/unread-count",
        &alice_token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["unread"], 0);
}
