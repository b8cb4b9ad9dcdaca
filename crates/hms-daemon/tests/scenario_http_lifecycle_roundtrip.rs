//! In-process HTTP pipeline: booking → confirm → check-in → orders →
//! guarded discharge, all through the router, asserting stable error
//! codes, status mapping and full-snapshot responses.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot

use hms_daemon::{routes, state};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn call(router: axum::Router, req: Request<axum::body::Body>) -> (StatusCode, Value) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("body is not valid JSON")
    };
    (status, json)
}

fn post(uri: &str, body: &Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

fn actor(role: &str) -> (String, String) {
    (uuid::Uuid::new_v4().to_string(), role.to_string())
}

fn test_state(dir: &std::path::Path) -> Arc<state::AppState> {
    let settings = hms_config::DaemonSettings {
        bind_addr: "127.0.0.1:0".into(),
        audit_log_path: dir.join("audit.jsonl").to_string_lossy().into_owned(),
        audit_hash_chain: true,
    };
    Arc::new(state::AppState::new(&settings).unwrap())
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_booking_to_discharge_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let st = test_state(dir.path());
    let router = routes::build_router(Arc::clone(&st));

    let (desk_id, desk_role) = actor("RECEPTIONIST");
    let (doc_id, doc_role) = actor("DOCTOR");

    // Create a booking.
    let (status, booking) = call(
        router.clone(),
        post(
            "/api/v1/bookings",
            &json!({
                "actor_id": desk_id, "role": desk_role,
                "patient_id": uuid::Uuid::new_v4(),
                "doctor_id": uuid::Uuid::new_v4(),
                "department_id": uuid::Uuid::new_v4(),
                "scheduled_at": "2026-08-06T09:00:00Z",
                "source": "ONLINE"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "PENDING");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Confirm it; the response carries the new encounter with flags.
    let (status, confirmed) = call(
        router.clone(),
        post(
            &format!("/api/v1/bookings/{booking_id}/confirm"),
            &json!({ "actor_id": desk_id, "role": desk_role, "version": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["booking"]["status"], "CONFIRMED");
    let encounter = &confirmed["encounter"];
    assert_eq!(encounter["encounter"]["status"], "PLANNED");
    assert_eq!(encounter["capabilities"]["can_check_in"], true);
    let encounter_id = encounter["encounter"]["id"].as_str().unwrap().to_string();

    // Re-confirmation is an idempotent no-op with the same encounter id.
    let (status, again) = call(
        router.clone(),
        post(
            &format!("/api/v1/bookings/{booking_id}/confirm"),
            &json!({ "actor_id": desk_id, "role": desk_role, "version": 99 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        again["encounter"]["encounter"]["id"].as_str().unwrap(),
        encounter_id
    );

    // Check in.
    let (status, arrived) = call(
        router.clone(),
        post(
            &format!("/api/v1/encounters/{encounter_id}/check-in"),
            &json!({ "actor_id": desk_id, "role": desk_role, "version": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(arrived["encounter"]["status"], "ARRIVED");
    assert_eq!(arrived["capabilities"]["can_discharge"], true);

    // Place and activate a medication order.
    let (status, group) = call(
        router.clone(),
        post(
            "/api/v1/medication-order-groups",
            &json!({
                "actor_id": doc_id, "role": doc_role,
                "encounter_id": encounter_id,
                "orders": [{
                    "drug_name": "lisinopril", "dose": "10 mg",
                    "route": "oral", "frequency": "qd"
                }]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = group["orders"][0]["id"].as_str().unwrap().to_string();

    let (status, active) = call(
        router.clone(),
        post(
            &format!("/api/v1/medication-orders/{order_id}/activate"),
            &json!({ "actor_id": doc_id, "role": doc_role, "version": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["status"], "ACTIVE");

    // Discharge is now blocked with a stable, recoverable code.
    let (status, blocked) = call(
        router.clone(),
        post(
            &format!("/api/v1/encounters/{encounter_id}/discharge"),
            &json!({
                "actor_id": doc_id, "role": doc_role, "version": 1,
                "disposition": "HOME"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(blocked["code"], "OPEN_DEPENDENCY");
    assert_eq!(blocked["recoverable"], true);

    // Discontinue without a reason: MISSING_FIELD.
    let (status, missing) = call(
        router.clone(),
        post(
            &format!("/api/v1/medication-orders/{order_id}/discontinue"),
            &json!({ "actor_id": doc_id, "role": doc_role, "version": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing["code"], "MISSING_FIELD");

    // Discontinue with a reason, then discharge cleanly.
    let (status, _) = call(
        router.clone(),
        post(
            &format!("/api/v1/medication-orders/{order_id}/discontinue"),
            &json!({
                "actor_id": doc_id, "role": doc_role, "version": 1,
                "reason": "adverse reaction"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, finished) = call(
        router.clone(),
        post(
            &format!("/api/v1/encounters/{encounter_id}/discharge"),
            &json!({
                "actor_id": doc_id, "role": doc_role, "version": 1,
                "disposition": "HOME"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finished["encounter"]["status"], "FINISHED");
    assert_eq!(finished["capabilities"]["can_discharge"], false);

    // The dashboard sees the terminal states.
    let (status, dash) = call(router.clone(), get("/api/v1/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["encounters_by_status"]["FINISHED"], 1);
    assert_eq!(dash["bookings_by_status"]["COMPLETED"], 1);
    assert_eq!(dash["medication_orders_by_status"]["DISCONTINUED"], 1);
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_error_codes_map_to_http_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let st = test_state(dir.path());
    let router = routes::build_router(Arc::clone(&st));

    let (desk_id, desk_role) = actor("RECEPTIONIST");

    // Unknown id → 404 NOT_FOUND.
    let missing = uuid::Uuid::new_v4();
    let (status, body) = call(
        router.clone(),
        post(
            &format!("/api/v1/bookings/{missing}/confirm"),
            &json!({ "actor_id": desk_id, "role": desk_role, "version": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    // Role mismatch → 403 UNAUTHORIZED.
    let (status, booking) = call(
        router.clone(),
        post(
            "/api/v1/bookings",
            &json!({
                "actor_id": desk_id, "role": desk_role,
                "patient_id": uuid::Uuid::new_v4(),
                "doctor_id": uuid::Uuid::new_v4(),
                "department_id": uuid::Uuid::new_v4(),
                "scheduled_at": "2026-08-06T10:00:00Z",
                "source": "PHONE"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = booking["id"].as_str().unwrap();

    let (nurse_id, nurse_role) = actor("NURSE");
    let (status, body) = call(
        router.clone(),
        post(
            &format!("/api/v1/bookings/{booking_id}/confirm"),
            &json!({ "actor_id": nurse_id, "role": nurse_role, "version": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "UNAUTHORIZED");

    // Stale version → 409 VERSION_CONFLICT, marked recoverable.
    let (status, _) = call(
        router.clone(),
        post(
            &format!("/api/v1/bookings/{booking_id}/cancel"),
            &json!({
                "actor_id": desk_id, "role": desk_role, "version": 1,
                "reason": "patient rang to cancel"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(
        router.clone(),
        post(
            &format!("/api/v1/bookings/{booking_id}/cancel"),
            &json!({
                "actor_id": desk_id, "role": desk_role, "version": 0,
                "reason": "patient rang to cancel"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");
}
