// ==========================================
// AirPlus 工艺流程聚合 - 配置读取 Trait
// ==========================================
// 职责: 定义流水线与服务所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::config_manager::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ==========================================
// RowErrorPolicy - 行级数据错误处理策略
// ==========================================
// 两种策略都保证"每个坏行都有记录"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// 剔除坏行并写入 DQ 报告,继续运行
    #[default]
    Skip,
    /// 遇到第一个坏行即中止整次运行
    Abort,
}

impl FromStr for RowErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(RowErrorPolicy::Skip),
            "abort" => Ok(RowErrorPolicy::Abort),
            other => Err(ConfigError::InvalidValue {
                key: "import.row_error_policy".to_string(),
                value: other.to_string(),
                message: "期望 skip 或 abort".to_string(),
            }),
        }
    }
}

impl fmt::Display for RowErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowErrorPolicy::Skip => write!(f, "skip"),
            RowErrorPolicy::Abort => write!(f, "abort"),
        }
    }
}

// ==========================================
// WorkflowConfigReader Trait
// ==========================================
// 实现者: ConfigManager（JSON 键值文件 + 环境变量覆写）
pub trait WorkflowConfigReader: Send + Sync {
    // ===== 数据源 =====

    /// MES 工序日志路径
    ///
    /// # 默认值
    /// - data/MES_Extraction.xlsx
    fn mes_path(&self) -> PathBuf;

    /// ERP 人员名册路径
    ///
    /// # 默认值
    /// - data/ERP_Equipes Airplus.xlsx
    fn erp_path(&self) -> PathBuf;

    /// PLM 物料清单路径
    ///
    /// # 默认值
    /// - data/PLM_DataSet.xlsx
    fn plm_path(&self) -> PathBuf;

    // ===== 导入 =====

    /// 行级数据错误处理策略
    ///
    /// # 默认值
    /// - skip
    fn row_error_policy(&self) -> Result<RowErrorPolicy, ConfigError>;

    // ===== 导出 =====

    /// 流程模型导出路径
    ///
    /// # 默认值
    /// - workflow_data.json
    fn export_path(&self) -> PathBuf;

    // ===== 分析 =====

    /// 分析结果表路径
    ///
    /// # 默认值
    /// - data/AirPlus_Analysis_Results.xlsx
    fn analysis_results_path(&self) -> PathBuf;

    /// 排行类统计的截断数量
    ///
    /// # 默认值
    /// - 6
    fn ranking_limit(&self) -> Result<usize, ConfigError>;

    // ===== 服务 =====

    /// 可视化页面路径
    ///
    /// # 默认值
    /// - react_flow/workflow.html
    fn workflow_html_path(&self) -> PathBuf;

    /// 监听地址
    ///
    /// # 默认值
    /// - 0.0.0.0:8502
    fn bind_addr(&self) -> String;
}
