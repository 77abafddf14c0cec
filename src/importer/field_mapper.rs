// ==========================================
// AirPlus 工艺流程聚合 - 字段映射器实现
// ==========================================
// 职责: 源列 → 类型化字段 + 类型转换
// 红线: 必需值缺失/转换失败 → DataError（带行号与列名）,不做静默强转
//       可选值转换失败 → 字段置 None + WARNING,该行保留
// ==========================================

use crate::domain::operation::OperationRecord;
use crate::domain::part::PartRecord;
use crate::domain::quality::{DataSource, DqLevel, DqViolation};
use crate::domain::staff::StaffRecord;
use crate::domain::types::{WorkDuration, WorkstationNumber};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RecordMapper;
use crate::importer::raw_table::RawRow;
use crate::importer::schema::{erp, mes, plm};

// 2^53
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

// ==========================================
// FieldReader - 单行字段读取工具
// ==========================================
struct FieldReader<'a> {
    row: &'a RawRow,
    table: DataSource,
    cleaner: DataCleaner,
    warnings: Vec<DqViolation>,
}

impl<'a> FieldReader<'a> {
    fn new(row: &'a RawRow, table: DataSource) -> Self {
        Self {
            row,
            table,
            cleaner: DataCleaner,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, column: &str, message: String) {
        self.warnings.push(DqViolation {
            source: self.table,
            row_number: self.row.row_number,
            level: DqLevel::Warning,
            column: column.to_string(),
            message,
        });
    }

    fn into_warnings(self) -> Vec<DqViolation> {
        self.warnings
    }

    fn data_error(&self, column: &str, message: String) -> ImportError {
        ImportError::DataError {
            table: self.table,
            row: self.row.row_number,
            column: column.to_string(),
            message,
        }
    }

    /// 提取字符串字段（空值标记 → None）
    fn get_string(&self, column: &str) -> Option<String> {
        self.cleaner.normalize_null(self.row.get(column))
    }

    /// 提取必填字符串字段
    fn require_string(&self, column: &str) -> ImportResult<String> {
        self.get_string(column)
            .ok_or_else(|| self.data_error(column, "必填值缺失".to_string()))
    }

    /// 解析可选浮点数（失败 → None + WARNING）
    fn parse_f64(&mut self, column: &str) -> Option<f64> {
        let value = self.get_string(column)?;
        match self.cleaner.clean_number(&value).parse::<f64>() {
            Ok(f) if f.is_finite() => Some(f),
            _ => {
                self.warn(column, format!("无法解析为数值: {}", value));
                None
            }
        }
    }

    /// 解析可选工时（失败 → None + WARNING）
    fn parse_duration(&mut self, column: &str) -> Option<WorkDuration> {
        let value = self.get_string(column)?;
        let parsed = WorkDuration::parse(&value);
        if parsed.is_none() {
            self.warn(column, format!("无法解析为工时: {}", value));
        }
        parsed
    }

    /// 解析工位号（必填,非数字即报错）
    fn require_workstation(&self, column: &str) -> ImportResult<WorkstationNumber> {
        let value = self.require_string(column)?;
        WorkstationNumber::parse(&value)
            .ok_or_else(|| self.data_error(column, format!("工位号不是非负整数: {}", value)))
    }

    /// 整值浮点转整数文本（员工号等 ID 列在 Excel 中可能是数值单元格）
    ///
    /// 超出 f64 精确整数范围的值保留原文。
    fn require_identifier(&self, column: &str) -> ImportResult<String> {
        let value = self.require_string(column)?;
        match value.parse::<f64>() {
            Ok(f)
                if f.fract() == 0.0
                    && f.abs() < MAX_EXACT_INTEGER
                    && !value.contains('e')
                    && !value.contains('E') =>
            {
                Ok(format!("{}", f as i64))
            }
            _ => Ok(value),
        }
    }
}

// ==========================================
// OperationMapper - MES 工序行映射
// ==========================================
pub struct OperationMapper;

impl RecordMapper for OperationMapper {
    type Record = OperationRecord;

    fn source(&self) -> DataSource {
        DataSource::Mes
    }

    fn required_columns(&self) -> &'static [&'static str] {
        mes::REQUIRED
    }

    fn map_row_with_warnings(
        &self,
        row: &RawRow,
        warnings: &mut Vec<DqViolation>,
    ) -> ImportResult<OperationRecord> {
        let mut reader = FieldReader::new(row, DataSource::Mes);

        let record = OperationRecord {
            stage_name: reader.require_string(mes::STAGE_NAME)?,
            workstation: reader.require_workstation(mes::WORKSTATION)?,
            part_reference: reader.get_string(mes::REFERENCE),
            planned_duration: reader.parse_duration(mes::PLANNED_DURATION),
            actual_duration: reader.parse_duration(mes::ACTUAL_DURATION),
            incident: reader.get_string(mes::INCIDENT),
            probable_cause: reader.get_string(mes::PROBABLE_CAUSE),
            row_number: row.row_number,
        };
        warnings.extend(reader.into_warnings());
        Ok(record)
    }
}

// ==========================================
// StaffMapper - ERP 人员行映射
// ==========================================
pub struct StaffMapper;

impl RecordMapper for StaffMapper {
    type Record = StaffRecord;

    fn source(&self) -> DataSource {
        DataSource::Erp
    }

    fn required_columns(&self) -> &'static [&'static str] {
        erp::REQUIRED
    }

    fn map_row_with_warnings(
        &self,
        row: &RawRow,
        warnings: &mut Vec<DqViolation>,
    ) -> ImportResult<StaffRecord> {
        let mut reader = FieldReader::new(row, DataSource::Erp);

        let record = StaffRecord {
            employee_id: reader.require_identifier(erp::EMPLOYEE_ID)?,
            first_name: reader.get_string(erp::FIRST_NAME),
            last_name: reader.get_string(erp::LAST_NAME),
            qualification: reader.get_string(erp::QUALIFICATION),
            workstation_assignment: reader.get_string(erp::WORKSTATION_ASSIGNMENT),
            hourly_cost: reader.parse_f64(erp::HOURLY_COST),
        };
        warnings.extend(reader.into_warnings());
        Ok(record)
    }
}

// ==========================================
// PartMapper - PLM 零件行映射
// ==========================================
pub struct PartMapper;

impl RecordMapper for PartMapper {
    type Record = PartRecord;

    fn source(&self) -> DataSource {
        DataSource::Plm
    }

    fn required_columns(&self) -> &'static [&'static str] {
        plm::REQUIRED
    }

    fn map_row_with_warnings(
        &self,
        row: &RawRow,
        warnings: &mut Vec<DqViolation>,
    ) -> ImportResult<PartRecord> {
        let mut reader = FieldReader::new(row, DataSource::Plm);

        let record = PartRecord {
            reference: reader.require_string(plm::REFERENCE)?,
            description: reader.get_string(plm::DESCRIPTION),
            quantity: reader.parse_f64(plm::QUANTITY),
            supplier: reader.get_string(plm::SUPPLIER),
            criticality: reader.get_string(plm::CRITICALITY),
            unit_cost: reader.parse_f64(plm::UNIT_COST),
            lead_time: reader.get_string(plm::LEAD_TIME),
        };
        warnings.extend(reader.into_warnings());
        Ok(record)
    }
}
