// ==========================================
// AirPlus 工艺流程聚合 - 数据质量报告
// ==========================================
// 用途: 汇总每次运行中被拒绝的数据行
// 红线: 每一个坏行都必须有记录,不允许静默丢弃
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// DataSource - 数据来源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Mes,      // 工序日志
    Erp,      // 人员名册
    Plm,      // 物料清单
    Analysis, // 分析结果表
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Mes => write!(f, "MES"),
            DataSource::Erp => write!(f, "ERP"),
            DataSource::Plm => write!(f, "PLM"),
            DataSource::Analysis => write!(f, "ANALYSIS"),
        }
    }
}

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // 错误（该行被剔除）
    Warning, // 警告（该行保留）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub source: DataSource,  // 来源表
    pub row_number: usize,   // 原始文件行号（表头为第 1 行）
    pub level: DqLevel,      // 违规级别
    pub column: String,      // 违规列名
    pub message: String,     // 违规描述
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数
    pub accepted: usize,   // 通过
    pub rejected: usize,   // 剔除（ERROR）
    pub warnings: usize,   // 警告（WARNING）
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub run_id: String,
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            summary: DqSummary::default(),
            violations: Vec::new(),
        }
    }

    /// 合并单表的行计数与违规明细
    pub fn absorb(&mut self, total_rows: usize, violations: Vec<DqViolation>) {
        let rejected = violations
            .iter()
            .filter(|v| v.level == DqLevel::Error)
            .map(|v| (v.source, v.row_number))
            .collect::<std::collections::HashSet<_>>()
            .len();
        let warnings = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .count();

        self.summary.total_rows += total_rows;
        self.summary.rejected += rejected;
        self.summary.accepted += total_rows.saturating_sub(rejected);
        self.summary.warnings += warnings;
        self.violations.extend(violations);
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &DqViolation> {
        self.violations.iter().filter(|v| v.level == DqLevel::Error)
    }
}
