// ==========================================
// AirPlus 工艺流程聚合 - 导入层
// ==========================================
// 职责: 读取 MES / ERP / PLM 三个表格,生成类型化记录
// 支持: Excel (.xlsx/.xls/.xlsm/.ods), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod raw_table;
pub mod schema;
pub mod source_loader;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{OperationMapper, PartMapper, StaffMapper};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use raw_table::{RawRow, RawTable};
pub use source_loader::{
    load_single_table, LoadedSources, MappedTable, SourcePaths, WorkflowSourceLoader,
};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RecordMapper};
