//! HTTP request handlers

use super::state::AppState;
use crate::search::SearchController;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use tera::Context;

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Search page with nothing submitted
pub async fn index(State(state): State<AppState>) -> Response {
    render_page(&state, &state.controller())
}

/// Run one search and render the page with its results
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let mut controller = state.controller();
    controller.set_query(params.q.unwrap_or_default());

    if !controller.submit(state.transport.as_ref()).await {
        return Redirect::to("/").into_response();
    }

    render_page(&state, &controller)
}

fn render_page(state: &AppState, controller: &SearchController) -> Response {
    let view = state.renderer.view(controller);

    let mut ctx = match Context::from_serialize(&view) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Template context error: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response();
        }
    };
    ctx.insert("instance_name", state.instance_name());

    match state
        .renderer
        .templates()
        .render_with_context("index.html", &ctx)
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Search counters as JSON
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
