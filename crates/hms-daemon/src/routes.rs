//! Axum router and all HTTP handlers for hms-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and
//! attaches middleware layers. Handlers are `pub(crate)` so the scenario
//! tests in `tests/` can compose the router directly.
//!
//! Every mutating handler follows the same sequence: parse, take the
//! writer lock, run the lifecycle op, release the lock, publish the
//! committed events (audit + SSE), return the full updated snapshot.
//! Domain errors map to 4xx with a stable code; the handler never
//! rewrites or swallows them.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use hms_lifecycle::{Committed, TransitionError};
use hms_schemas::{
    Actor, DiagnosticOrderStatus, DischargePlan, ImagingOrderStatus, TransitionPayload,
};

use crate::{
    api_types::{
        ActionBody, AdmitRequest, ApiError, ConfirmBookingResponse, CreateBookingRequest,
        CreateWalkInRequest, DischargePlanRequest, DischargeRequest, EmergencyArrivalRequest,
        EmergencyResponse, GenerateInvoiceRequest, HealthResponse, NewDiagnosticOrderRequest,
        NewImagingOrderRequest, NewLabOrderRequest, NewPrescriptionRequest, OrderGroupResponse,
        PaymentRequest, PlaceOrderGroupRequest, ReasonBody, RetriageRequest,
    },
    state::{AppState, BusMsg},
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/stream", get(stream))
        // Bookings
        .route("/api/v1/bookings", post(booking_create))
        .route("/api/v1/bookings/pending", get(bookings_pending))
        .route("/api/v1/bookings/:id/confirm", post(booking_confirm))
        .route("/api/v1/bookings/:id/cancel", post(booking_cancel))
        .route("/api/v1/bookings/:id/no-show", post(booking_no_show))
        // Encounters
        .route("/api/v1/encounters", post(encounter_walk_in))
        .route("/api/v1/encounters/:id/check-in", post(encounter_check_in))
        .route("/api/v1/encounters/:id/begin", post(encounter_begin))
        .route("/api/v1/encounters/:id/discharge", post(encounter_discharge))
        .route("/api/v1/encounters/:id/cancel", post(encounter_cancel))
        .route(
            "/api/v1/encounters/:id/medication-orders",
            get(encounter_med_orders),
        )
        .route("/api/v1/encounters/:id/invoice", post(invoice_generate))
        // Emergency
        .route("/api/v1/emergency", post(emergency_arrive))
        .route("/api/v1/emergency/:id/triage", post(emergency_retriage))
        .route("/api/v1/emergency/queue", get(emergency_queue_view))
        // Medication orders
        .route("/api/v1/medication-order-groups", post(order_group_place))
        .route(
            "/api/v1/medication-orders/pending",
            get(med_orders_pending),
        )
        .route(
            "/api/v1/medication-orders/:id/:action",
            post(med_order_action),
        )
        // Inpatient stays
        .route("/api/v1/inpatient-stays", post(stay_admit))
        .route(
            "/api/v1/inpatient-stays/:id/discharge-planning",
            post(stay_discharge_planning),
        )
        .route("/api/v1/inpatient-stays/:id/discharge", post(stay_discharge))
        .route("/api/v1/inpatient-stays/:id/transfer", post(stay_transfer))
        // Invoices
        .route("/api/v1/invoices/:id/payments", post(invoice_payment))
        .route("/api/v1/invoices/:id/cancel", post(invoice_cancel))
        // Lab orders
        .route("/api/v1/lab-orders", post(lab_order_create))
        .route(
            "/api/v1/lab-orders/pending-verification",
            get(lab_orders_pending_verification),
        )
        .route("/api/v1/lab-orders/:id/:action", post(lab_order_action))
        // Diagnostic / imaging orders
        .route("/api/v1/diagnostic-orders", post(diagnostic_order_create))
        .route(
            "/api/v1/diagnostic-orders/:id/:action",
            post(diagnostic_order_action),
        )
        .route("/api/v1/imaging-orders", post(imaging_order_create))
        .route(
            "/api/v1/imaging-orders/:id/:action",
            post(imaging_order_action),
        )
        // Prescriptions
        .route("/api/v1/prescriptions", post(prescription_issue))
        .route(
            "/api/v1/prescriptions/:id/dispense",
            post(prescription_dispense),
        )
        .route(
            "/api/v1/prescriptions/:id/cancel",
            post(prescription_cancel),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

fn error_response(err: TransitionError) -> Response {
    let status = match &err {
        TransitionError::NotFound { .. } => StatusCode::NOT_FOUND,
        TransitionError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        TransitionError::VersionConflict { .. } | TransitionError::DuplicateInvoice { .. } => {
            StatusCode::CONFLICT
        }
        TransitionError::InvalidTransition { .. }
        | TransitionError::MissingField { .. }
        | TransitionError::OpenDependency { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    let body = ApiError {
        code: err.code().to_string(),
        message: err.to_string(),
        recoverable: err.is_recoverable(),
    };
    (status, Json(body)).into_response()
}

/// Publish events and return the snapshot as JSON.
async fn committed_response<T: Serialize>(
    st: &AppState,
    result: Result<Committed<T>, TransitionError>,
) -> Response {
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            (StatusCode::OK, Json(committed.snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn payload_from(body: &ReasonBody) -> TransitionPayload {
    TransitionPayload {
        reason: body.reason.clone(),
        resume_at: body.until,
        result_value: body.result_value.clone(),
        ..TransitionPayload::default()
    }
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

pub(crate) async fn booking_create(
    State(st): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let committed = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::create_booking(
            &mut hospital,
            hms_lifecycle::NewBooking {
                patient_id: body.patient_id,
                doctor_id: body.doctor_id,
                department_id: body.department_id,
                scheduled_at: body.scheduled_at,
                source: body.source,
            },
            actor,
        )
    };
    st.publish(&committed.events).await;
    (StatusCode::CREATED, Json(committed.snapshot)).into_response()
}

pub(crate) async fn bookings_pending(State(st): State<Arc<AppState>>) -> Response {
    let hospital = st.hospital.read().await;
    (
        StatusCode::OK,
        Json(hms_projection::pending_bookings(&hospital)),
    )
        .into_response()
}

pub(crate) async fn booking_confirm(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActionBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::confirm_booking(&mut hospital, id, actor, body.version)
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            let response = ConfirmBookingResponse {
                booking: committed.snapshot.booking,
                encounter: committed.snapshot.encounter,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn booking_cancel(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::cancel_booking(&mut hospital, id, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

pub(crate) async fn booking_no_show(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActionBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::mark_no_show(&mut hospital, id, actor, body.version)
    };
    committed_response(&st, result).await
}

// ---------------------------------------------------------------------------
// Encounters
// ---------------------------------------------------------------------------

pub(crate) async fn encounter_walk_in(
    State(st): State<Arc<AppState>>,
    Json(body): Json<CreateWalkInRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let committed = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::create_walk_in(
            &mut hospital,
            hms_lifecycle::NewWalkIn {
                patient_id: body.patient_id,
                department_id: body.department_id,
                encounter_type: body.encounter_type,
            },
            actor,
        )
    };
    st.publish(&committed.events).await;
    (StatusCode::CREATED, Json(committed.snapshot)).into_response()
}

pub(crate) async fn encounter_check_in(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActionBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::check_in(&mut hospital, id, actor, body.version)
    };
    committed_response(&st, result).await
}

pub(crate) async fn encounter_begin(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActionBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::begin_consultation(&mut hospital, id, actor, body.version)
    };
    committed_response(&st, result).await
}

pub(crate) async fn encounter_discharge(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<DischargeRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = TransitionPayload {
        disposition: body.disposition,
        discharge_plan: body.discharge_plan.clone(),
        ..TransitionPayload::default()
    };
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::discharge(&mut hospital, id, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

pub(crate) async fn encounter_cancel(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::cancel_encounter(&mut hospital, id, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

pub(crate) async fn encounter_med_orders(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    let hospital = st.hospital.read().await;
    (
        StatusCode::OK,
        Json(hms_projection::grouped_medication_orders(&hospital, id)),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Emergency
// ---------------------------------------------------------------------------

pub(crate) async fn emergency_arrive(
    State(st): State<Arc<AppState>>,
    Json(body): Json<EmergencyArrivalRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::emergency_arrival(
            &mut hospital,
            hms_lifecycle::NewEmergency {
                patient_id: body.patient_id,
                department_id: body.department_id,
                triage_category: body.triage_category,
                pain_score: body.pain_score,
                life_threatening: body.life_threatening,
                arrival_mode: body.arrival_mode.clone(),
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            let response = EmergencyResponse {
                encounter: committed.snapshot.encounter,
                details: committed.snapshot.details,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn emergency_retriage(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<RetriageRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::retriage(
            &mut hospital,
            id,
            actor,
            body.version,
            hms_lifecycle::Retriage {
                triage_category: body.triage_category,
                pain_score: body.pain_score,
                life_threatening: body.life_threatening,
            },
        )
    };
    committed_response(&st, result).await
}

pub(crate) async fn emergency_queue_view(State(st): State<Arc<AppState>>) -> Response {
    let hospital = st.hospital.read().await;
    (
        StatusCode::OK,
        Json(hms_projection::emergency_queue(&hospital, Utc::now())),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Medication orders
// ---------------------------------------------------------------------------

pub(crate) async fn order_group_place(
    State(st): State<Arc<AppState>>,
    Json(body): Json<PlaceOrderGroupRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let orders = body
        .orders
        .iter()
        .map(|o| hms_lifecycle::NewMedicationOrder {
            drug_name: o.drug_name.clone(),
            dose: o.dose.clone(),
            route: o.route.clone(),
            frequency: o.frequency.clone(),
        })
        .collect();
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::place_order_group(
            &mut hospital,
            hms_lifecycle::NewOrderGroup {
                encounter_id: body.encounter_id,
                stay_id: body.stay_id,
                orders,
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            let response = OrderGroupResponse {
                group: committed.snapshot.group,
                orders: committed.snapshot.orders,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn med_orders_pending(State(st): State<Arc<AppState>>) -> Response {
    let hospital = st.hospital.read().await;
    (
        StatusCode::OK,
        Json(hms_projection::pending_medication_orders(&hospital)),
    )
        .into_response()
}

pub(crate) async fn med_order_action(
    State(st): State<Arc<AppState>>,
    Path((id, action)): Path<(Uuid, String)>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let result = {
        let mut hospital = st.hospital.write().await;
        match action.as_str() {
            "activate" => hms_lifecycle::activate_order(&mut hospital, id, actor, body.version),
            "hold" => hms_lifecycle::hold_order(&mut hospital, id, actor, body.version, &payload),
            "resume" => hms_lifecycle::resume_order(&mut hospital, id, actor, body.version),
            "discontinue" => {
                hms_lifecycle::discontinue_order(&mut hospital, id, actor, body.version, &payload)
            }
            "complete" => hms_lifecycle::complete_order(&mut hospital, id, actor, body.version),
            _ => return StatusCode::NOT_FOUND.into_response(),
        }
    };
    committed_response(&st, result).await
}

// ---------------------------------------------------------------------------
// Inpatient stays
// ---------------------------------------------------------------------------

pub(crate) async fn stay_admit(
    State(st): State<Arc<AppState>>,
    Json(body): Json<AdmitRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::admit(
            &mut hospital,
            hms_lifecycle::NewStay {
                encounter_id: body.encounter_id,
                ward: body.ward.clone(),
                bed: body.bed.clone(),
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            (StatusCode::CREATED, Json(committed.snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn stay_discharge_planning(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<DischargePlanRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let plan = DischargePlan {
        home_care_plan: body.home_care_plan.clone(),
        medication_reconciliation: body.medication_reconciliation.clone(),
        follow_up: body.follow_up.clone(),
        readiness_assessment: body.readiness_assessment.clone(),
    };
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::file_discharge_plan(&mut hospital, id, actor, body.version, plan)
    };
    committed_response(&st, result).await
}

pub(crate) async fn stay_discharge(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<DischargeRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = TransitionPayload {
        discharge_plan: body.discharge_plan.clone(),
        ..TransitionPayload::default()
    };
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::discharge_stay(&mut hospital, id, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

pub(crate) async fn stay_transfer(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::transfer_stay(&mut hospital, id, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

pub(crate) async fn invoice_generate(
    State(st): State<Arc<AppState>>,
    Path(encounter_id): Path<Uuid>,
    Json(body): Json<GenerateInvoiceRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::generate_invoice(
            &mut hospital,
            hms_lifecycle::GenerateInvoice {
                encounter_id,
                line_items: body.line_items.clone(),
                coverage_bps: body.coverage_bps,
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            (StatusCode::CREATED, Json(committed.snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn invoice_payment(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::record_payment(&mut hospital, id, actor, body.version, body.amount_cents)
    };
    committed_response(&st, result).await
}

pub(crate) async fn invoice_cancel(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::cancel_invoice(&mut hospital, id, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

// ---------------------------------------------------------------------------
// Lab orders
// ---------------------------------------------------------------------------

pub(crate) async fn lab_order_create(
    State(st): State<Arc<AppState>>,
    Json(body): Json<NewLabOrderRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::order_lab_test(
            &mut hospital,
            hms_lifecycle::NewLabOrder {
                encounter_id: body.encounter_id,
                test_code: body.test_code.clone(),
                test_name: body.test_name.clone(),
                urgency: body.urgency,
                reference_range: body.reference_range.clone(),
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            (StatusCode::CREATED, Json(committed.snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lab_orders_pending_verification(State(st): State<Arc<AppState>>) -> Response {
    let hospital = st.hospital.read().await;
    (
        StatusCode::OK,
        Json(hms_projection::pending_verification_lab_orders(&hospital)),
    )
        .into_response()
}

pub(crate) async fn lab_order_action(
    State(st): State<Arc<AppState>>,
    Path((id, action)): Path<(Uuid, String)>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let result = {
        let mut hospital = st.hospital.write().await;
        match action.as_str() {
            "collect" => hms_lifecycle::collect_specimen(&mut hospital, id, actor, body.version),
            "receive" => hms_lifecycle::receive_specimen(&mut hospital, id, actor, body.version),
            "start" => hms_lifecycle::start_processing(&mut hospital, id, actor, body.version),
            "complete" => {
                hms_lifecycle::complete_result(&mut hospital, id, actor, body.version, &payload)
            }
            "verify" => hms_lifecycle::verify_result(&mut hospital, id, actor, body.version),
            "reject" => {
                hms_lifecycle::reject_specimen(&mut hospital, id, actor, body.version, &payload)
            }
            _ => return StatusCode::NOT_FOUND.into_response(),
        }
    };
    committed_response(&st, result).await
}

// ---------------------------------------------------------------------------
// Diagnostic / imaging orders
// ---------------------------------------------------------------------------

pub(crate) async fn diagnostic_order_create(
    State(st): State<Arc<AppState>>,
    Json(body): Json<NewDiagnosticOrderRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::order_diagnostic(
            &mut hospital,
            hms_lifecycle::NewDiagnosticOrder {
                encounter_id: body.encounter_id,
                procedure_name: body.procedure_name.clone(),
                urgency: body.urgency,
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            (StatusCode::CREATED, Json(committed.snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn diagnostic_order_action(
    State(st): State<Arc<AppState>>,
    Path((id, action)): Path<(Uuid, String)>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let target = match action.as_str() {
        "start" => DiagnosticOrderStatus::InProgress,
        "complete" => DiagnosticOrderStatus::Completed,
        "verify" => DiagnosticOrderStatus::Verified,
        "cancel" => DiagnosticOrderStatus::Cancelled,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::diagnostic_transition(&mut hospital, id, target, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

pub(crate) async fn imaging_order_create(
    State(st): State<Arc<AppState>>,
    Json(body): Json<NewImagingOrderRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::order_imaging(
            &mut hospital,
            hms_lifecycle::NewImagingOrder {
                encounter_id: body.encounter_id,
                modality: body.modality.clone(),
                body_site: body.body_site.clone(),
                urgency: body.urgency,
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            (StatusCode::CREATED, Json(committed.snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn imaging_order_action(
    State(st): State<Arc<AppState>>,
    Path((id, action)): Path<(Uuid, String)>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let target = match action.as_str() {
        "start" => ImagingOrderStatus::InProgress,
        "report" => ImagingOrderStatus::Reported,
        "verify" => ImagingOrderStatus::Verified,
        "cancel" => ImagingOrderStatus::Cancelled,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::imaging_transition(&mut hospital, id, target, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

// ---------------------------------------------------------------------------
// Prescriptions
// ---------------------------------------------------------------------------

pub(crate) async fn prescription_issue(
    State(st): State<Arc<AppState>>,
    Json(body): Json<NewPrescriptionRequest>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::issue_prescription(
            &mut hospital,
            hms_lifecycle::NewPrescription {
                encounter_id: body.encounter_id,
                lines: body.lines.clone(),
            },
            actor,
        )
    };
    match result {
        Ok(committed) => {
            st.publish(&committed.events).await;
            (StatusCode::CREATED, Json(committed.snapshot)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn prescription_dispense(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActionBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::dispense_prescription(&mut hospital, id, actor, body.version)
    };
    committed_response(&st, result).await
}

pub(crate) async fn prescription_cancel(
    State(st): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReasonBody>,
) -> Response {
    let actor = Actor::new(body.actor_id, body.role);
    let payload = payload_from(&body);
    let result = {
        let mut hospital = st.hospital.write().await;
        hms_lifecycle::cancel_prescription(&mut hospital, id, actor, body.version, &payload)
    };
    committed_response(&st, result).await
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub(crate) async fn dashboard(State(st): State<Arc<AppState>>) -> Response {
    let hospital = st.hospital.read().await;
    (
        StatusCode::OK,
        Json(hms_projection::dashboard_summary(&hospital)),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /v1/stream  (SSE)
// ---------------------------------------------------------------------------

pub(crate) async fn stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let rx = st.bus.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<BusMsg>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(m) => {
                let event_name = match &m {
                    BusMsg::Heartbeat { .. } => "heartbeat",
                    BusMsg::Event(_) => "domain_event",
                    BusMsg::LogLine { .. } => "log",
                };
                let data = serde_json::to_string(&m).ok()?;
                Some(Ok(Event::default().event(event_name).data(data)))
            }
            Err(_) => None, // lagged / closed
        }
    })
}
