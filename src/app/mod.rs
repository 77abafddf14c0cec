// ==========================================
// AirPlus 工艺流程聚合 - 应用层
// ==========================================
// 职责: HTTP 服务,向展示层提供状态与分析指标
// ==========================================

pub mod server;
pub mod state;

// 重导出
pub use server::{build_router, serve};
pub use state::AppState;
