// ==========================================
// AirPlus 工艺流程聚合 - API层错误类型
// ==========================================
// 职责: 统一导入/导出/配置/分析错误,供 CLI 与 HTTP 层使用
// ==========================================

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 导入错误
    // ==========================================
    /// 结构错误: 缺少必需列（整次运行中止）
    #[error("结构校验失败: {0}")]
    SchemaError(String),

    /// 行级数据错误（仅 abort 策略下出现）
    #[error("数据校验失败: {0}")]
    DataError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 导出 / 分析
    // ==========================================
    #[error("导出失败: {0}")]
    ExportError(String),

    #[error("分析结果读取失败: {0}")]
    AnalysisError(String),

    // ==========================================
    // 配置
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::SchemaError { .. } => ApiError::SchemaError(err.to_string()),
            ImportError::DataError { .. } => ApiError::DataError(err.to_string()),
            ImportError::FileNotFound(path) => {
                ApiError::NotFound(format!("数据文件不存在: {}", path))
            }
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// 结构/数据错误属于输入问题（CLI 退出码区分用）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ApiError::SchemaError(_) | ApiError::DataError(_) | ApiError::NotFound(_)
        )
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::DataSource;

    #[test]
    fn test_schema_error_keeps_column_name() {
        let err: ApiError = ImportError::SchemaError {
            table: DataSource::Mes,
            column: "Nom".to_string(),
        }
        .into();

        assert!(matches!(err, ApiError::SchemaError(_)));
        assert!(err.to_string().contains("Nom"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_data_error_conversion() {
        let err: ApiError = ImportError::DataError {
            table: DataSource::Erp,
            row: 7,
            column: "Matricule".to_string(),
            message: "必填值缺失".to_string(),
        }
        .into();

        assert!(matches!(err, ApiError::DataError(_)));
        assert!(err.to_string().contains('7'));
    }
}
