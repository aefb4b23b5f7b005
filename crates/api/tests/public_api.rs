//! Integration tests for the anonymous public surfaces: ticket submission
//! and tracking, surveys, visitor registration, and the leaderboard game.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_unit, get, post_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_ticket_and_track_it(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "Radiology", "RAD").await;

    let body = serde_json::json!({
        "kind": "external",
        "category": "complaint",
        "unit_id": unit_id,
        "reporter_name": "Budi Santoso",
        "reporter_phone": "+6281234567890",
        "reporter_email": null,
        "subject": "Long wait",
        "body": "Waited three hours for a scheduled scan.",
    });
    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/tickets", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let ticket_number = json["data"]["ticket_number"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["status"], "open");
    // Internal fields never leak through the public view.
    assert!(json["data"].get("reporter_phone").is_none());
    assert!(json["data"].get("unit_id").is_none());

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/tickets/track/{ticket_number}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["subject"], "Long wait");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_ticket_rejects_unknown_category(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "Pharmacy", "PHM").await;

    let body = serde_json::json!({
        "kind": "external",
        "category": "gossip",
        "unit_id": unit_id,
        "reporter_name": "X",
        "subject": "s",
        "body": "b",
    });
    let response = post_json(common::build_test_app(pool), "/api/v1/tickets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_ticket_rejects_bad_phone(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "Lab", "LAB").await;

    let body = serde_json::json!({
        "kind": "external",
        "category": "complaint",
        "unit_id": unit_id,
        "reporter_name": "X",
        "reporter_phone": "12345",
        "subject": "s",
        "body": "b",
    });
    let response = post_json(common::build_test_app(pool), "/api/v1/tickets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn track_unknown_ticket_returns_404(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        "/api/v1/tickets/track/KISS-202608-9999",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Surveys
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_survey_accepts_valid_score(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "ER", "ER").await;

    let body = serde_json::json!({
        "unit_id": unit_id,
        "score": 4,
        "comment": "Quick and friendly",
    });
    let response = post_json(common::build_test_app(pool), "/api/v1/surveys", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn submit_survey_rejects_out_of_range_score(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "ER2", "ER2").await;

    for bad_score in [0, 6] {
        let body = serde_json::json!({ "unit_id": unit_id, "score": bad_score });
        let response =
            post_json(common::build_test_app(pool.clone()), "/api/v1/surveys", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// ---------------------------------------------------------------------------
// Visitors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn register_visitor_normalizes_phone(pool: PgPool) {
    let body = serde_json::json!({
        "name": "Siti Rahma",
        "institution": "Puskesmas Kota",
        "phone": "+6281234567890",
        "visit_date": "2026-09-01",
    });
    let response = post_json(common::build_test_app(pool), "/api/v1/visitors", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    // International form is stored in local form.
    assert_eq!(json["data"]["phone"], "081234567890");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn register_visitor_rejects_bad_phone(pool: PgPool) {
    let body = serde_json::json!({
        "name": "Siti",
        "institution": "Somewhere",
        "phone": "0812-3456",
        "visit_date": "2026-09-01",
    });
    let response = post_json(common::build_test_app(pool), "/api/v1/visitors", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Game leaderboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn leaderboard_orders_by_score_descending(pool: PgPool) {
    for (name, score) in [("alice", 120), ("bob", 340), ("carol", 210)] {
        let body = serde_json::json!({ "player_name": name, "score": score });
        let response =
            post_json(common::build_test_app(pool.clone()), "/api/v1/games/scores", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(
        common::build_test_app(pool),
        "/api/v1/games/leaderboard?limit=2",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["player_name"], "bob");
    assert_eq!(rows[1]["player_name"], "carol");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn game_score_rejects_negative(pool: PgPool) {
    let body = serde_json::json!({ "player_name": "cheater", "score": -1 });
    let response = post_json(common::build_test_app(pool), "/api/v1/games/scores", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Public lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn public_units_list_returns_active_units(pool: PgPool) {
    let unit_id = create_test_unit(&pool, "Cardiology", "CRD").await;

    let response = get(common::build_test_app(pool), "/api/v1/units").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let units = json["data"].as_array().unwrap();
    assert!(units.iter().any(|u| u["id"] == unit_id));
}
