//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - Plan and catalog API under `/api/v1/...`
/// - Static dashboard from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/problems", get(http::http_list_problems))
        .route("/api/v1/plans", get(http::http_list_plans).post(http::http_create_plan))
        .route("/api/v1/plans/:id", get(http::http_get_plan).delete(http::http_delete_plan))
        .route("/api/v1/plans/:id/status", post(http::http_update_status))
        .route("/api/v1/plans/:id/bookmark", post(http::http_toggle_bookmark))
        .route("/api/v1/plans/:id/feedback", get(http::http_get_feedback))
        .route("/api/v1/plans/:id/recommendations", get(http::http_get_recommendations))
        .route("/api/v1/plans/:id/next", get(http::http_get_next))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(Arc::new(AppState::from_config(None)))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    fn form() -> Value {
        json!({
            "name": "HTTP plan",
            "targetCompanies": ["Google", "Meta"],
            "duration": 1,
            "dailyGoal": 2,
            "skillLevel": "intermediate",
            "focusAreas": [],
            "startDate": "2024-03-04"
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = call(&app(), Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn catalog_lists_annotated_problems() {
        let (status, body) = call(&app(), Method::GET, "/api/v1/problems", None).await;
        assert_eq!(status, StatusCode::OK);
        let first = &body.as_array().unwrap()[0];
        assert!(first["title"].is_string());
        assert!(first["quality"]["qualityScore"].is_number());
    }

    #[tokio::test]
    async fn plan_lifecycle() {
        let app = app();
        let (status, plan) = call(&app, Method::POST, "/api/v1/plans", Some(form())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = plan["id"].as_str().unwrap().to_string();
        assert_eq!(plan["schedule"][0]["date"], "2024-03-04");

        let (status, list) = call(&app, Method::GET, "/api/v1/plans", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["id"], id.as_str());

        let session_id = plan["schedule"][0]["id"].as_str().unwrap();
        let title = plan["schedule"][0]["problems"][0]["title"].as_str().unwrap();
        let (status, out) = call(
            &app,
            Method::POST,
            &format!("/api/v1/plans/{id}/status"),
            Some(json!({ "sessionId": session_id, "problemTitle": title, "status": "completed", "notes": "two pointers" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["changed"], true);
        assert_eq!(out["plan"]["progress"]["completedProblems"], 1);

        let (status, out) = call(
            &app,
            Method::POST,
            &format!("/api/v1/plans/{id}/bookmark"),
            Some(json!({ "sessionId": session_id, "problemTitle": title })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out, json!({ "changed": true, "bookmarked": true }));

        let (status, fb) = call(&app, Method::GET, &format!("/api/v1/plans/{id}/feedback"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(fb["feedback"].is_array());

        let (status, rec) = call(&app, Method::GET, &format!("/api/v1/plans/{id}/recommendations"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(rec["suggestedDifficulty"].is_array());

        let (status, next) = call(&app, Method::GET, &format!("/api/v1/plans/{id}/next?limit=1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(next.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/plans/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, err) = call(&app, Method::GET, &format!("/api/v1/plans/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(err["error"].as_str().unwrap().contains(&id));
    }

    #[tokio::test]
    async fn invalid_form_is_bad_request() {
        let mut bad = form();
        bad["dailyGoal"] = json!(0);
        let (status, err) = call(&app(), Method::POST, "/api/v1/plans", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].as_str().unwrap().starts_with("Invalid plan configuration"));
    }

    #[tokio::test]
    async fn oversized_form_is_bad_request() {
        let app = app();
        for (field, value) in [("duration", json!(u32::MAX)), ("dailyGoal", json!(u32::MAX))] {
            let mut big = form();
            big[field] = value;
            let (status, _) = call(&app, Method::POST, "/api/v1/plans", Some(big)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        }
        let (_, list) = call(&app, Method::GET, "/api/v1/plans", None).await;
        assert_eq!(list, json!([]));
    }
}
