use axum::{
    extract::{Extension, Form, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
    Json, Router,
};
use tourbook_booking::{BookingForm, BookingOutcome, OutcomeSummary};
use tourbook_core::Requester;

use crate::{middleware::session_middleware, state::AppState};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/v1/bookings",
        post(submit_booking).route_layer(from_fn_with_state(state, session_middleware)),
    )
}

/// POST /v1/bookings
/// Form submission handler. Always answers with the outcome summary so the
/// page can render success, error or partial success.
async fn submit_booking(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    Form(form): Form<BookingForm>,
) -> (StatusCode, Json<OutcomeSummary>) {
    let outcome = state.workflow.submit(&requester, form).await;

    let status = match &outcome {
        BookingOutcome::Recorded { .. } => StatusCode::CREATED,
        BookingOutcome::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingOutcome::Failed(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(outcome.summary()))
}
