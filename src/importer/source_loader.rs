// ==========================================
// AirPlus 工艺流程聚合 - 三源数据加载器
// ==========================================
// 职责: 整合导入流程,从三个文件到类型化记录
// 流程: 解析(全部) → 结构校验(全部) → 字段映射 → 行错误汇总
// 红线: 结构错误在任何映射/输出之前中止
// ==========================================

use crate::config::{RowErrorPolicy, WorkflowConfigReader};
use crate::domain::operation::OperationRecord;
use crate::domain::part::PartRecord;
use crate::domain::quality::{DataSource, DqLevel, DqReport, DqViolation};
use crate::domain::staff::StaffRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{OperationMapper, PartMapper, StaffMapper};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{FileParser, RecordMapper};
use crate::importer::raw_table::RawTable;
use crate::perf::{record_rows, PerfGuard};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// SourcePaths - 三个数据源的文件路径
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub mes: PathBuf,
    pub erp: PathBuf,
    pub plm: PathBuf,
}

impl SourcePaths {
    pub fn from_config(config: &dyn WorkflowConfigReader) -> Self {
        Self {
            mes: config.mes_path(),
            erp: config.erp_path(),
            plm: config.plm_path(),
        }
    }
}

// ==========================================
// MappedTable - 单表映射结果
// ==========================================
#[derive(Debug, Clone)]
pub struct MappedTable<T> {
    pub records: Vec<T>,
    pub total_rows: usize,
    pub violations: Vec<DqViolation>,
}

// ==========================================
// LoadedSources - 加载完成的三源数据
// ==========================================
// 所有行均已物化,聚合阶段可随机访问
#[derive(Debug, Clone)]
pub struct LoadedSources {
    pub operations: Vec<OperationRecord>,
    pub staff: Vec<StaffRecord>,
    pub parts: Vec<PartRecord>,
    pub dq_report: DqReport,
}

// ==========================================
// WorkflowSourceLoader - 三源加载器
// ==========================================
pub struct WorkflowSourceLoader {
    file_parser: Box<dyn FileParser>,
    policy: RowErrorPolicy,
}

impl WorkflowSourceLoader {
    pub fn new(file_parser: Box<dyn FileParser>, policy: RowErrorPolicy) -> Self {
        Self {
            file_parser,
            policy,
        }
    }

    /// 按扩展名自动选择解析器
    pub fn with_policy(policy: RowErrorPolicy) -> Self {
        Self::new(Box::new(UniversalFileParser), policy)
    }

    pub fn policy(&self) -> RowErrorPolicy {
        self.policy
    }

    /// 加载三个数据源
    ///
    /// # 返回
    /// - Ok(LoadedSources): 类型化记录 + DQ 报告
    /// - Err(SchemaError): 任一表缺少必需列
    /// - Err(DataError): 仅在 abort 策略下,第一个坏行
    #[instrument(skip(self, paths), fields(policy = %self.policy))]
    pub fn load(&self, paths: &SourcePaths, run_id: &str) -> ImportResult<LoadedSources> {
        let _perf = PerfGuard::new("import.load_sources");
        info!(
            run_id = %run_id,
            mes = %paths.mes.display(),
            erp = %paths.erp.display(),
            plm = %paths.plm.display(),
            "开始加载数据源"
        );

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let mes_table = self.parse(&paths.mes)?;
        let erp_table = self.parse(&paths.erp)?;
        let plm_table = self.parse(&paths.plm)?;

        // === 步骤 2: 结构校验（全部通过后才开始映射）===
        debug!("步骤 2: 结构校验");
        Self::check_schema(&mes_table, &OperationMapper)?;
        Self::check_schema(&erp_table, &StaffMapper)?;
        Self::check_schema(&plm_table, &PartMapper)?;

        // === 步骤 3: 字段映射 ===
        debug!("步骤 3: 字段映射");
        let operations = self.map_table(&OperationMapper, &mes_table)?;
        let staff = self.map_table(&StaffMapper, &erp_table)?;
        let parts = self.map_table(&PartMapper, &plm_table)?;

        // === 步骤 4: DQ 汇总 ===
        let mut dq_report = DqReport::new(run_id);
        dq_report.absorb(operations.total_rows, operations.violations);
        dq_report.absorb(staff.total_rows, staff.violations);
        dq_report.absorb(parts.total_rows, parts.violations);

        info!(
            operations = operations.records.len(),
            staff = staff.records.len(),
            parts = parts.records.len(),
            rejected = dq_report.summary.rejected,
            warnings = dq_report.summary.warnings,
            "数据源加载完成"
        );

        Ok(LoadedSources {
            operations: operations.records,
            staff: staff.records,
            parts: parts.records,
            dq_report,
        })
    }

    fn parse(&self, path: &Path) -> ImportResult<RawTable> {
        self.file_parser.parse_to_raw_table(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "文件解析失败");
            e
        })
    }

    fn check_schema<M: RecordMapper>(table: &RawTable, mapper: &M) -> ImportResult<()> {
        table
            .require_columns(mapper.source(), mapper.required_columns())
            .map_err(|e| {
                error!(table = describe_source(mapper.source()), error = %e, "结构校验失败");
                e
            })
    }

    /// 映射整张表
    ///
    /// skip 策略下坏行进入 violations; abort 策略下直接返回第一个 DataError。
    /// 可选列的 WARNING 在两种策略下都只记录,不影响该行。
    /// 非 DataError（不应在映射阶段出现）一律向上传播。
    pub fn map_table<M: RecordMapper>(
        &self,
        mapper: &M,
        table: &RawTable,
    ) -> ImportResult<MappedTable<M::Record>> {
        let mut records = Vec::with_capacity(table.len());
        let mut violations = Vec::new();
        let mut failed = 0usize;

        for row in &table.rows {
            match mapper.map_row_with_warnings(row, &mut violations) {
                Ok(record) => records.push(record),
                Err(ImportError::DataError {
                    table: source,
                    row: row_number,
                    column,
                    message,
                }) => {
                    warn!(
                        source = %source,
                        row_number,
                        column = %column,
                        message = %message,
                        "行数据转换失败"
                    );
                    if self.policy == RowErrorPolicy::Abort {
                        return Err(ImportError::DataError {
                            table: source,
                            row: row_number,
                            column,
                            message,
                        });
                    }
                    failed += 1;
                    violations.push(DqViolation {
                        source,
                        row_number,
                        level: DqLevel::Error,
                        column,
                        message,
                    });
                }
                Err(other) => return Err(other),
            }
        }
        record_rows(table.len());

        debug!(
            source = %mapper.source(),
            success = records.len(),
            failed,
            warnings = violations.len() - failed,
            "字段映射完成"
        );

        Ok(MappedTable {
            records,
            total_rows: table.len(),
            violations,
        })
    }
}

/// 单独加载一张表（含结构校验）
pub fn load_single_table<M: RecordMapper>(
    parser: &dyn FileParser,
    mapper: &M,
    path: &Path,
    policy: RowErrorPolicy,
) -> ImportResult<MappedTable<M::Record>> {
    let table = parser.parse_to_raw_table(path)?;
    table.require_columns(mapper.source(), mapper.required_columns())?;
    let loader = WorkflowSourceLoader::with_policy(policy);
    loader.map_table(mapper, &table)
}

/// 数据源标识 → 显示名（日志用）
pub fn describe_source(source: DataSource) -> &'static str {
    match source {
        DataSource::Mes => "MES 工序日志",
        DataSource::Erp => "ERP 人员名册",
        DataSource::Plm => "PLM 物料清单",
        DataSource::Analysis => "分析结果表",
    }
}
