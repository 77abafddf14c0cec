// ==========================================
// AirPlus 工艺流程聚合 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 结构校验 → 字段映射 → 行错误汇总
// ==========================================

use crate::domain::quality::{DataSource, DqViolation};
use crate::importer::error::ImportResult;
use crate::importer::raw_table::{RawRow, RawTable};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser / ExcelParser / UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 读取整张表（首行为表头）
    ///
    /// # 返回
    /// - Ok(RawTable): 表头与所有非空行,单元格已 trim
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// RecordMapper Trait
// ==========================================
// 实现者: OperationMapper / StaffMapper / PartMapper
pub trait RecordMapper {
    type Record;

    /// 所属数据源（用于错误定位）
    fn source(&self) -> DataSource;

    /// 必需列清单,缺任一列即 SchemaError
    fn required_columns(&self) -> &'static [&'static str];

    /// 原始行 → 类型化记录
    ///
    /// 可选列无法解析时字段置 None,该行保留,WARNING 追加到 `warnings`。
    ///
    /// # 返回
    /// - Err(ImportError::DataError): 必需值缺失或转换失败（带行号与列名）
    fn map_row_with_warnings(
        &self,
        row: &RawRow,
        warnings: &mut Vec<DqViolation>,
    ) -> ImportResult<Self::Record>;

    /// 同上,丢弃 WARNING
    fn map_row(&self, row: &RawRow) -> ImportResult<Self::Record> {
        self.map_row_with_warnings(row, &mut Vec::new())
    }
}
