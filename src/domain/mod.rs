// ==========================================
// AirPlus 工艺流程聚合 - 领域模型层
// ==========================================
// 职责: 定义源记录、派生模型、数据质量报告
// 红线: 不含文件读取逻辑,不含聚合逻辑
// ==========================================

pub mod operation;
pub mod part;
pub mod quality;
pub mod staff;
pub mod types;
pub mod workflow;

// 重导出核心类型
pub use operation::OperationRecord;
pub use part::{PartRecord, PartRef};
pub use quality::{DataSource, DqLevel, DqReport, DqSummary, DqViolation};
pub use staff::{StaffRecord, StaffRef};
pub use types::{WorkDuration, WorkstationNumber};
pub use workflow::{Relationships, Stage, WorkflowModel, WorkstationEntry};
