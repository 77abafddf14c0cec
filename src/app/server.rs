// ==========================================
// AirPlus 工艺流程聚合 - HTTP 服务
// ==========================================
// 路由:
//   GET /                  服务状态
//   GET /workflow          可视化页面（文件不存在 → 404 JSON）
//   GET /api/workflow-data 分析结果汇总
//   GET /api/health        健康检查
// CORS: 允许任意来源（展示层独立部署）
// ==========================================

use crate::api::MetricsSummary;
use crate::app::state::AppState;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// 构建路由
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(root))
        .route("/workflow", get(workflow_page))
        .route("/api/workflow-data", get(workflow_data))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// 绑定地址并运行,直到进程退出
pub async fn serve(state: Arc<AppState>, bind_addr: &str) -> std::io::Result<()> {
    let app = build_router(state);

    info!("Attempting to bind server to http://{}", bind_addr);
    let listener = match TcpListener::bind(bind_addr).await {
        Ok(listener) => {
            info!("Server successfully bound to {}", bind_addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                error!("地址已被占用: {}", bind_addr);
            } else {
                error!("监听失败 ({}): {}", bind_addr, e);
            }
            return Err(e);
        }
    };

    axum::serve(listener, app).await
}

// ==========================================
// Handlers
// ==========================================

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "AirPlus Workflow API",
        "status": "running"
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "workflow-api"
    }))
}

pub async fn workflow_page(State(state): State<Arc<AppState>>) -> Response {
    let path = state.workflow_html_path();
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "可视化页面不可用");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Workflow file not found" })),
            )
                .into_response()
        }
    }
}

pub async fn workflow_data(State(state): State<Arc<AppState>>) -> Response {
    let path = state.analysis_results_path();
    let metrics_api = state.metrics_api.clone();

    // 表格解析是同步 IO,放到阻塞线程池
    let result = tokio::task::spawn_blocking(move || metrics_api.load_summary(&path)).await;

    match result {
        Ok(Ok(summary)) => Json::<MetricsSummary>(summary).into_response(),
        Ok(Err(e)) => error_response(e.to_string()),
        Err(join_err) => error_response(join_err.to_string()),
    }
}

fn error_response(message: String) -> Response {
    error!(message = %message, "分析结果汇总失败");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}
