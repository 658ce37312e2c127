//! HTTP adapter around the label handler

use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::core::handler::Handler;
use crate::core::models::{InvocationEvent, QueryParameters, RequestContext, Response};

/// Application state
#[derive(Clone)]
pub struct AppState {
    handler: Arc<Handler>,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
    strategy: String,
}

/// Health check handler
async fn health_check(State(state): State<Arc<AppState>>) -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        strategy: state.handler.strategy().to_string(),
    })
}

/// `GET /?imageUrl=...`, answered with the function's status and body
async fn handle_query(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<QueryParameters>,
) -> (StatusCode, String) {
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let event = InvocationEvent {
        query_string_parameters: Some(params),
        request_context: Some(RequestContext { request_id }),
    };

    let response = state.handler.handle(&event).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, response.body)
}

/// `POST /invoke` with a raw event, answered with the response object
async fn invoke(
    State(state): State<Arc<AppState>>,
    Json(event): Json<InvocationEvent>,
) -> axum::Json<Response> {
    axum::Json(state.handler.handle(&event).await)
}

/// Build the router
pub fn router(handler: Arc<Handler>) -> Router {
    let state = Arc::new(AppState { handler });

    Router::new()
        .route("/", get(handle_query))
        .route("/health", get(health_check))
        .route("/invoke", post(invoke))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16, handler: Handler) -> anyhow::Result<()> {
    let app = router(Arc::new(handler));

    // Bind address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Label, TranslationStrategy};
    use crate::core::test_support::{context, spawn_stub, FakeDetector, FakeFetcher, FakeTranslator};
    use assert_json_diff::assert_json_eq;

    async fn serve(fail_fetch: bool) -> String {
        let handler = Handler::new(
            context(
                FakeFetcher { fail: fail_fetch },
                FakeDetector {
                    labels: Some(vec![Label::new("Cat", 95.5), Label::new("Dog", 82.1)]),
                },
                Arc::new(FakeTranslator::with(&[("Cat", "Gato"), ("Dog", "Cachorro")])),
            ),
            TranslationStrategy::PerLabel,
        );
        spawn_stub(router(Arc::new(handler))).await
    }

    #[tokio::test]
    async fn test_health() {
        let base = serve(false).await;
        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["strategy"], "per-label");
    }

    #[tokio::test]
    async fn test_get_with_query() {
        let base = serve(false).await;
        let response = reqwest::Client::new()
            .get(&base)
            .query(&[("imageUrl", "https://images.test/cat.jpg")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.text().await.unwrap(),
            "A imagem tem\n  95.50% de ser do tipo Gato\n 82.10% de ser do tipo Cachorro"
        );
    }

    #[tokio::test]
    async fn test_get_without_image_url() {
        let base = serve(false).await;
        let response = reqwest::get(&base).await.unwrap();

        assert_eq!(response.status().as_u16(), 500);
        assert_eq!(response.text().await.unwrap(), "Internal server error.");
    }

    #[tokio::test]
    async fn test_invoke_event() {
        let base = serve(true).await;
        let body: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/invoke", base))
            .json(&serde_json::json!({
                "queryStringParameters": {"imageUrl": "https://unreachable.test/cat.jpg"}
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_json_eq!(
            body,
            serde_json::json!({"statusCode": 500, "body": "Internal server error."})
        );
    }
}
