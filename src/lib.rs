// ==========================================
// AirPlus 工艺流程聚合 - 核心库
// ==========================================
// 输入: MES 工序日志 / ERP 人员名册 / PLM 物料清单
// 输出: 阶段 → 工位 → 员工/零件 的流程模型（JSON）
// 附带: 流程指标、缺件分析、分析结果 HTTP 服务
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与模型
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 聚合与指标
pub mod engine;

// 导出 - JSON 文档
pub mod export;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能统计
pub mod perf;

// API 层 - 用例门面
pub mod api;

// 应用层 - HTTP 服务
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{WorkDuration, WorkstationNumber};

// 领域实体
pub use domain::{
    DqReport, OperationRecord, PartRecord, Stage, StaffRecord, WorkflowModel, WorkstationEntry,
};

// 引擎
pub use engine::{KpiEngine, ShortageEngine, WorkflowAggregator};

// API
pub use api::{ApiError, ApiResult, MetricsApi, WorkflowApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "AirPlus 工艺流程聚合";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
