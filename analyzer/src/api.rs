// Standard library imports
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

// Third party imports
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

// Internal imports
use crate::analyzer::analyze_feed;
use crate::config::Config;
use feed_common::AnalysisError;

/// Trạng thái chia sẻ giữa các handler
pub struct AppState {
    /// Cấu hình service
    pub config: Config,
}

/// Cấu trúc lỗi trả về cho client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Thông báo lỗi
    pub error: String,
    /// Mã lỗi máy đọc được
    pub code: String,
}

impl ApiErrorResponse {
    fn from_error(err: &AnalysisError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

/// Handler cho POST /analyze-feed
///
/// Đo thời gian chạy engine và chèn `processing_time_ms` vào kết quả.
/// Lỗi validation trả 400, lỗi business rule trả 422.
async fn analyze_feed_endpoint(
    State(_state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Response {
    let start = Instant::now();

    match analyze_feed(&payload) {
        Ok(analysis) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match serde_json::to_value(&analysis) {
                Ok(mut body) => {
                    if let Some(obj) = body.as_object_mut() {
                        obj.insert("processing_time_ms".to_string(), json!(elapsed_ms));
                    }
                    (StatusCode::OK, Json(json!({ "analysis": body }))).into_response()
                }
                Err(err) => {
                    warn!("Lỗi serialize kết quả phân tích: {}", err);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        Err(err) => {
            let status = if err.is_business_rule() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_REQUEST
            };
            info!(code = err.code(), "Từ chối request: {}", err);
            (status, Json(ApiErrorResponse::from_error(&err))).into_response()
        }
    }
}

/// Định nghĩa router chính
pub fn get_routes(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_headers(Any)
        .allow_methods(Any)
        .allow_origin(Any);

    Router::new()
        .route("/analyze-feed", post(analyze_feed_endpoint))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
        .layer(cors)
        .with_state(app_state)
}

/// Khởi động API server
pub async fn create_api_server(app_state: Arc<AppState>) -> anyhow::Result<()> {
    let addr: SocketAddr =
        format!("{}:{}", app_state.config.api_host, app_state.config.api_port).parse()?;
    let app = get_routes(app_state);

    info!("API server đang lắng nghe ở {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// Module tests
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = Arc::new(AppState {
            config: Config::new(),
        });
        get_routes(state)
    }

    async fn post_json(router: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-feed")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Test request hợp lệ trả 200 với processing_time_ms
    #[tokio::test]
    async fn test_analyze_feed_success() {
        let (status, body) = post_json(
            test_router(),
            json!({
                "time_window_minutes": 60,
                "messages": [{
                    "id": "m1",
                    "content": "Muito bom, adorei!",
                    "timestamp": "2024-05-01T12:00:00Z",
                    "user_id": "user_teste",
                    "hashtags": ["#compras"],
                    "reactions": 2,
                    "views": 10
                }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let analysis = &body["analysis"];
        assert_eq!(analysis["sentiment_distribution"]["positive"], 100.0);
        assert_eq!(analysis["trending_topics"], json!(["#compras"]));
        assert_eq!(analysis["anomaly_detected"], false);
        assert!(analysis["anomaly_type"].is_null());
        assert!(analysis["processing_time_ms"].is_u64());
    }

    /// Test lỗi validation trả 400 với mã lỗi
    #[tokio::test]
    async fn test_validation_error_maps_to_400() {
        let (status, body) = post_json(
            test_router(),
            json!({
                "time_window_minutes": 60,
                "messages": [{ "id": "" }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Campo 'id' invalido");
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    /// Test timestamp sai trả mã INVALID_TIMESTAMP
    #[tokio::test]
    async fn test_invalid_timestamp_code() {
        let (status, body) = post_json(
            test_router(),
            json!({
                "time_window_minutes": 60,
                "messages": [{
                    "id": "m1",
                    "content": "ola",
                    "timestamp": "2024-05-01 12:00:00",
                    "user_id": "user_teste"
                }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_TIMESTAMP");
    }

    /// Test business rule trả 422
    #[tokio::test]
    async fn test_business_rule_maps_to_422() {
        let (status, body) =
            post_json(test_router(), json!({ "time_window_minutes": 123 })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "UNSUPPORTED_TIME_WINDOW");
        assert_eq!(body["error"], "Valor de janela temporal não suportado na versão atual");
    }

    /// Test ghi đè engagement qua toàn bộ pipeline HTTP
    #[tokio::test]
    async fn test_candidate_awareness_end_to_end() {
        let (status, body) = post_json(
            test_router(),
            json!({
                "time_window_minutes": 60,
                "messages": [{
                    "id": "m1",
                    "content": "achei o teste tecnico mbras interessante",
                    "timestamp": "2024-05-01T12:00:00Z",
                    "user_id": "user_teste"
                }]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["engagement_score"], 9.42);
        assert_eq!(body["analysis"]["flags"]["candidate_awareness"], true);
    }
}
