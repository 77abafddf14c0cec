// ==========================================
// AirPlus 工艺流程聚合 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 文件错误 / SchemaError（缺列,致命）/ DataError（行级转换失败）
// 说明: 关联查询无匹配不是错误,不在此枚举中
// ==========================================

use crate::domain::quality::DataSource;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构错误（致命,整次运行中止）=====
    #[error("缺少必需列 ({table}): {column}")]
    SchemaError { table: DataSource, column: String },

    // ===== 行级数据错误 =====
    #[error("数据转换失败 ({table}, 行 {row}, 列 {column}): {message}")]
    DataError {
        table: DataSource,
        row: usize,
        column: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ImportError::SchemaError { .. })
    }

    pub fn is_data_error(&self) -> bool {
        matches!(self, ImportError::DataError { .. })
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
