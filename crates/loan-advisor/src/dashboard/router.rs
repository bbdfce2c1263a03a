use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::outcome::PredictionOutcome;
use super::page::DashboardView;
use super::presentation::ResultPresentation;
use super::scoring::ScoringClient;
use super::session::DashboardSession;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: String,
}

/// Router builder exposing the dashboard page and its JSON endpoints.
pub fn dashboard_router<C>(session: Arc<DashboardSession<C>>) -> Router
where
    C: ScoringClient + 'static,
{
    Router::new()
        .route("/", get(page_handler::<C>))
        .route("/evaluate", post(evaluate_form_handler::<C>))
        .route("/api/state", get(state_handler::<C>))
        .route("/api/form", post(update_field_handler::<C>))
        .route("/api/evaluate", post(evaluate_handler::<C>))
        .with_state(session)
}

pub(crate) async fn page_handler<C>(State(session): State<Arc<DashboardSession<C>>>) -> Html<String>
where
    C: ScoringClient + 'static,
{
    Html(session.render_page())
}

pub(crate) async fn evaluate_form_handler<C>(
    State(session): State<Arc<DashboardSession<C>>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError>
where
    C: ScoringClient + 'static,
{
    session.apply_form(&pairs)?;
    let ticket = session.start_submission();
    info!(generation = ticket.generation(), "evaluation requested from dashboard form");
    Ok(Redirect::to("/"))
}

pub(crate) async fn state_handler<C>(State(session): State<Arc<DashboardSession<C>>>) -> Response
where
    C: ScoringClient + 'static,
{
    (StatusCode::OK, Json(session.snapshot())).into_response()
}

pub(crate) async fn update_field_handler<C>(
    State(session): State<Arc<DashboardSession<C>>>,
    Json(update): Json<FieldUpdate>,
) -> Result<Response, AppError>
where
    C: ScoringClient + 'static,
{
    let profile = session.update_field(&update.field, &update.value)?;
    Ok((StatusCode::OK, Json(json!({ "profile": profile }))).into_response())
}

pub(crate) async fn evaluate_handler<C>(State(session): State<Arc<DashboardSession<C>>>) -> Response
where
    C: ScoringClient + 'static,
{
    let outcome = session.evaluate().await;
    let view = match &outcome {
        PredictionOutcome::Succeeded(prediction) => {
            DashboardView::Result(ResultPresentation::from_prediction(prediction))
        }
        PredictionOutcome::Failed { message } => DashboardView::Error {
            message: message.clone(),
        },
        PredictionOutcome::Pending => DashboardView::Ready,
    };
    (StatusCode::OK, Json(json!({ "outcome": outcome, "view": view }))).into_response()
}
