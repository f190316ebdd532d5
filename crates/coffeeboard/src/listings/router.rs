use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::checkout::{CheckoutError, CheckoutSession, PaymentGateway};
use super::domain::{JobDraft, Listing, SubmissionId, SubmissionStatusView};
use super::intake::ValidationError;
use super::pipeline::{BoardService, BoardServiceError, PipelineError};
use super::repository::{BoardRepository, RefundPublisher, RepositoryError};

/// Router builder exposing the render boundary (public listings) and the
/// operator/webhook boundary (payment, review, refund triggers).
pub fn board_router<R, P, N>(service: Arc<BoardService<R, P, N>>) -> Router
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    Router::new()
        .route("/api/v1/boards/:metro/jobs", get(jobs_handler::<R, P, N>))
        .route(
            "/api/v1/boards/:metro/checkout",
            post(submit_handler::<R, P, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id",
            get(status_handler::<R, P, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/payment-confirmed",
            post(confirm_payment_handler::<R, P, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/approve",
            post(approve_handler::<R, P, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/reject",
            post(reject_handler::<R, P, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/refund-confirmed",
            post(confirm_refund_handler::<R, P, N>),
        )
        .route("/api/v1/review-queue", get(queue_handler::<R, P, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobsQuery {
    /// Display hint only: `paid=1` asks the renderer for a confirmation
    /// banner and is never treated as proof of payment.
    #[serde(default)]
    paid: Option<String>,
}

/// Page payload for the external renderer: metro heading data, the banner
/// hint, and the ranked rows.
#[derive(Debug, Serialize)]
pub(crate) struct JobsPage {
    pub(crate) metro_slug: String,
    pub(crate) title: String,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) payment_notice: bool,
    pub(crate) jobs: Vec<Listing>,
}

pub(crate) async fn jobs_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
    Path(metro_slug): Path<String>,
    Query(query): Query<JobsQuery>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    let Some(metro) = service.metros().get(&metro_slug).cloned() else {
        let payload = json!({ "error": format!("metro '{metro_slug}' is not live") });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    match service.listings(&metro_slug, Utc::now()) {
        Ok(jobs) => {
            let page = JobsPage {
                metro_slug: metro.slug,
                title: metro.title,
                city: metro.city,
                state: metro.state,
                payment_notice: query.paid.as_deref() == Some("1"),
                jobs,
            };
            (StatusCode::OK, axum::Json(page)).into_response()
        }
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitResponse {
    pub(crate) submission_id: SubmissionId,
    pub(crate) url: String,
}

pub(crate) async fn submit_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
    Path(metro_slug): Path<String>,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    match service.submit(&metro_slug, draft, Utc::now()).await {
        Ok((submission_id, CheckoutSession { url })) => (
            StatusCode::ACCEPTED,
            axum::Json(SubmitResponse { submission_id, url }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    let id = SubmissionId(submission_id);
    respond(service.status(&id))
}

pub(crate) async fn confirm_payment_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    let id = SubmissionId(submission_id);
    respond(service.confirm_payment(&id, Utc::now()))
}

pub(crate) async fn approve_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    let id = SubmissionId(submission_id);
    respond(service.approve(&id, Utc::now()))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectBody {
    #[serde(default)]
    reason: String,
}

pub(crate) async fn reject_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
    Path(submission_id): Path<String>,
    axum::Json(body): axum::Json<RejectBody>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    let id = SubmissionId(submission_id);
    respond(service.reject(&id, &body.reason, Utc::now()))
}

pub(crate) async fn confirm_refund_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    let id = SubmissionId(submission_id);
    respond(service.confirm_refund(&id))
}

pub(crate) async fn queue_handler<R, P, N>(
    State(service): State<Arc<BoardService<R, P, N>>>,
) -> Response
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    match service.review_queue() {
        Ok(queue) => (StatusCode::OK, axum::Json(queue)).into_response(),
        Err(err) => error_response(err),
    }
}

fn respond(result: Result<SubmissionStatusView, BoardServiceError>) -> Response {
    match result {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

/// One place that decides which boundary an error belongs to. Invalid
/// transitions are conflicts for the operator to see, never silent.
fn error_response(err: BoardServiceError) -> Response {
    use BoardServiceError::*;

    let status = match &err {
        Validation(ValidationError::UnknownMetro(_)) => StatusCode::NOT_FOUND,
        Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Checkout(CheckoutError::MisconfiguredEndpoint) => StatusCode::INTERNAL_SERVER_ERROR,
        Checkout(_) => StatusCode::BAD_GATEWAY,
        Pipeline(PipelineError::MissingRejectionReason) => StatusCode::UNPROCESSABLE_ENTITY,
        Pipeline(PipelineError::OrphanPaymentConfirmation(_)) => StatusCode::NOT_FOUND,
        Pipeline(PipelineError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        Repository(RepositoryError::Unavailable(_)) | Refund(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
