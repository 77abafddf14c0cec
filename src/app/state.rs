// ==========================================
// AirPlus 工艺流程聚合 - 应用状态
// ==========================================
// 职责: HTTP 服务共享的只读状态（配置 + API 实例）
// ==========================================

use crate::api::MetricsApi;
use crate::config::WorkflowConfigReader;
use std::path::PathBuf;
use std::sync::Arc;

/// 应用状态
///
/// 只读;每个请求重新读取分析结果文件
pub struct AppState {
    /// 配置
    pub config: Arc<dyn WorkflowConfigReader>,

    /// 分析结果指标API
    pub metrics_api: Arc<MetricsApi>,
}

impl AppState {
    pub fn new(config: Arc<dyn WorkflowConfigReader>) -> Self {
        tracing::info!("初始化应用状态");
        Self {
            config,
            metrics_api: Arc::new(MetricsApi::default()),
        }
    }

    pub fn analysis_results_path(&self) -> PathBuf {
        self.config.analysis_results_path()
    }

    pub fn workflow_html_path(&self) -> PathBuf {
        self.config.workflow_html_path()
    }
}
