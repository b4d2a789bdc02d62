use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::answers::{QuizAnswers, QuizQuery};
use super::catalog::Provider;
use super::comparison::ComparisonQuery;
use super::redirect::RedirectOutcome;
use super::service::MatchService;

/// Router exposing quiz matching, the comparison table and outbound partner redirects.
pub fn match_router(service: Arc<MatchService>) -> Router {
    Router::new()
        .route("/api/v1/match", get(match_handler))
        .route("/api/v1/providers", get(providers_handler))
        .route("/api/v1/providers/:provider_id", get(provider_handler))
        .route("/go/:provider_id", get(redirect_handler))
        .with_state(service)
}

pub(crate) async fn match_handler(
    State(service): State<Arc<MatchService>>,
    Query(query): Query<QuizQuery>,
) -> Response {
    let answers = QuizAnswers::from_query(&query);
    let report = service.evaluate(answers);
    (StatusCode::OK, axum::Json(report)).into_response()
}

#[derive(Debug, Serialize)]
struct ComparisonView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    last_reviewed: Option<&'a str>,
    total: usize,
    unfiltered: bool,
    providers: Vec<&'a Provider>,
}

pub(crate) async fn providers_handler(
    State(service): State<Arc<MatchService>>,
    Query(query): Query<ComparisonQuery>,
) -> Response {
    let (filter, sort) = query.sanitize();
    let listing = service.compare(&filter, sort);
    let view = ComparisonView {
        last_reviewed: service.catalog().last_reviewed(),
        total: service.catalog().len(),
        unfiltered: listing.unfiltered,
        providers: listing.providers,
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn provider_handler(
    State(service): State<Arc<MatchService>>,
    Path(provider_id): Path<String>,
) -> Response {
    match service.provider(&provider_id) {
        Some(provider) => (StatusCode::OK, axum::Json(provider)).into_response(),
        None => {
            let payload = json!({
                "error": "provider not found",
                "provider_id": provider_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn redirect_handler(
    State(service): State<Arc<MatchService>>,
    Path(provider_id): Path<String>,
) -> Response {
    match service.resolve_redirect(&provider_id) {
        RedirectOutcome::Partner { url } => {
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, url)]).into_response()
        }
        RedirectOutcome::Fallback { location, .. } => {
            Redirect::temporary(&location).into_response()
        }
    }
}
