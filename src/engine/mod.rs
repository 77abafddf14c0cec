// ==========================================
// AirPlus 工艺流程聚合 - 引擎层
// ==========================================
// 职责: 关联键、流程聚合、指标、缺件与 6M 异常归因
// 红线: 引擎不读文件,输入输出均为内存结构
// ==========================================

pub mod aggregator;
pub mod ishikawa;
pub mod join_key;
pub mod kpi;
pub mod shortage;

// 重导出核心引擎
pub use aggregator::{
    aggregate, build_workstation_entry, extract_stages, PartIndex, StaffIndex,
    WorkflowAggregator,
};
pub use ishikawa::{
    CategoryStat, IshikawaCategory, IshikawaEngine, IshikawaProblem, IshikawaReport, CATEGORIES_6M,
};
pub use join_key::{parse_workstation_key, workstation_key};
pub use kpi::{GlobalKpis, KpiEngine, RankedCount, WorkflowKpis};
pub use shortage::{Criticality, PartShortage, ShortageEngine, ShortageReport};
