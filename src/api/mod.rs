// ==========================================
// AirPlus 工艺流程聚合 - API 层
// ==========================================
// 职责: 提供用例门面,供 CLI 与 HTTP 服务调用
// ==========================================

pub mod error;
pub mod metrics_api;
pub mod workflow_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use metrics_api::{MetricsApi, MetricsStatus, MetricsSummary, MetricsTotals, PosteMetrics};
pub use workflow_api::{ExportResponse, PipelineOutput, WorkflowApi, WorkflowSummary};
