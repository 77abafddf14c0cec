// ==========================================
// AirPlus 工艺流程聚合 - 配置层
// ==========================================
// 职责: 数据源路径、导入策略、服务参数
// 存储: 扁平 JSON 键值文件,支持环境变量与命令行覆写
// ==========================================

pub mod config_manager;
pub mod workflow_config_trait;

// 重导出核心配置管理器
pub use config_manager::{
    config_keys, get_default_config_path, ConfigError, ConfigManager, CONFIG_PATH_ENV,
};
pub use workflow_config_trait::{RowErrorPolicy, WorkflowConfigReader};
