// ==========================================
// AirPlus 工艺流程聚合 - 分析结果指标 API
// ==========================================
// 输入: 分析结果表（xlsx/csv）
// 列: Coût total (€) / Retard (h) / Poste,均为可选
// 输出: 总量 + 按工位分组汇总;文件不存在 → no_data（不是错误）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::quality::DataSource;
use crate::engine::join_key::parse_workstation_key;
use crate::i18n::t;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportError;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::FileParser;
use crate::importer::raw_table::{RawRow, RawTable};
use crate::importer::schema::analysis;
use crate::importer::source_loader::describe_source;
use crate::perf::{record_rows, PerfGuard};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{info, instrument, warn};

// ==========================================
// 响应结构
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsStatus {
    Success,
    NoData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsTotals {
    pub total_operations: usize,
    pub total_cost: f64,
    pub total_delays: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosteMetrics {
    pub cost: f64,
    pub delays: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub status: MetricsStatus,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,

    pub metrics: MetricsTotals,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub poste_data: Option<IndexMap<String, PosteMetrics>>,
}

impl MetricsSummary {
    pub fn no_data() -> Self {
        Self {
            status: MetricsStatus::NoData,
            message: Some(t("metrics.no_data")),
            metrics: MetricsTotals::default(),
            poste_data: None,
        }
    }
}

// ==========================================
// MetricsApi
// ==========================================
pub struct MetricsApi {
    file_parser: Box<dyn FileParser>,
    cleaner: DataCleaner,
}

impl Default for MetricsApi {
    fn default() -> Self {
        Self::new(Box::new(UniversalFileParser))
    }
}

impl MetricsApi {
    pub fn new(file_parser: Box<dyn FileParser>) -> Self {
        Self {
            file_parser,
            cleaner: DataCleaner,
        }
    }

    /// 读取分析结果并汇总
    ///
    /// # 返回
    /// - Ok(Success): 正常汇总
    /// - Ok(NoData): 文件不存在
    /// - Err: 文件损坏、数值列含非数值等
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_summary(&self, path: &Path) -> ApiResult<MetricsSummary> {
        let _perf = PerfGuard::new("api.metrics_summary");

        let table = match self.file_parser.parse_to_raw_table(path) {
            Ok(table) => table,
            Err(ImportError::FileNotFound(_)) => {
                warn!(table = describe_source(DataSource::Analysis), "分析结果文件不存在");
                return Ok(MetricsSummary::no_data());
            }
            Err(e) => return Err(ApiError::AnalysisError(e.to_string())),
        };
        record_rows(table.len());

        let summary = self.summarize(&table)?;
        info!(
            table = describe_source(DataSource::Analysis),
            operations = summary.metrics.total_operations,
            total_cost = summary.metrics.total_cost,
            "分析结果汇总完成"
        );
        Ok(summary)
    }

    /// 汇总已解析的表
    pub fn summarize(&self, table: &RawTable) -> ApiResult<MetricsSummary> {
        let has_cost = table.has_column(analysis::TOTAL_COST);
        let has_delay = table.has_column(analysis::DELAY_HOURS);
        let has_poste = table.has_column(analysis::WORKSTATION);

        let mut totals = MetricsTotals {
            total_operations: table.len(),
            ..MetricsTotals::default()
        };
        let mut groups: IndexMap<String, PosteMetrics> = IndexMap::new();

        for row in &table.rows {
            let cost = if has_cost {
                self.number(row, analysis::TOTAL_COST)?
            } else {
                0.0
            };
            let delay = if has_delay {
                self.number(row, analysis::DELAY_HOURS)?
            } else {
                0.0
            };
            totals.total_cost += cost;
            totals.total_delays += delay;

            if has_poste {
                if let Some(key) = self.group_key(row) {
                    let group = groups.entry(key).or_default();
                    group.cost += cost;
                    group.delays += delay;
                }
            }
        }

        // 分组键按工位号升序,非数字键排在其后
        groups.sort_by(|a, _, b, _| compare_group_keys(a, b));

        Ok(MetricsSummary {
            status: MetricsStatus::Success,
            message: None,
            metrics: totals,
            poste_data: Some(groups),
        })
    }

    /// 空单元格按 0 计;非数值报错
    fn number(&self, row: &RawRow, column: &str) -> ApiResult<f64> {
        match self.cleaner.normalize_null(row.get(column)) {
            None => Ok(0.0),
            Some(value) => self
                .cleaner
                .clean_number(&value)
                .parse::<f64>()
                .map_err(|_| {
                    ApiError::AnalysisError(format!(
                        "行 {} 列 {} 不是数值: {}",
                        row.row_number, column, value
                    ))
                }),
        }
    }

    /// 工位列 → 分组键（"Poste 3" / "3" / "3.0" 均归为 "3"）
    fn group_key(&self, row: &RawRow) -> Option<String> {
        let value = self.cleaner.normalize_null(row.get(analysis::WORKSTATION))?;
        if let Some(ws) = parse_workstation_key(&value) {
            return Some(ws.to_string());
        }
        match value.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f >= 0.0 => Some(format!("{}", f as i64)),
            _ => Some(value),
        }
    }
}

fn compare_group_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
