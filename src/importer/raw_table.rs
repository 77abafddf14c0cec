// ==========================================
// AirPlus 工艺流程聚合 - 原始表结构
// ==========================================
// 用途: 文件解析产物（表头 + 文本单元格行）
// 生命周期: 仅在导入流程内,映射为类型化记录后丢弃
// ==========================================

use crate::domain::quality::DataSource;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

/// 一行原始数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 表格中可见的行号（表头为第 1 行）
    pub row_number: usize,
    pub cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: HashMap::new(),
        }
    }

    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.cells.insert(column.to_string(), value.to_string());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// 整张原始表,所有行已完全加载
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// 校验必需列（逐字匹配,含重音符号）
    ///
    /// 只报告第一个缺失列。
    pub fn require_columns(&self, table: DataSource, columns: &[&str]) -> ImportResult<()> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(ImportError::SchemaError {
                table,
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_columns_reports_first_missing() {
        let table = RawTable::new(vec!["Nom".to_string(), "Poste".to_string()]);

        assert!(table
            .require_columns(DataSource::Mes, &["Nom", "Poste"])
            .is_ok());

        let err = table
            .require_columns(DataSource::Mes, &["Nom", "Référence", "Temps Réel"])
            .unwrap_err();
        match err {
            ImportError::SchemaError { table, column } => {
                assert_eq!(table, DataSource::Mes);
                assert_eq!(column, "Référence");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_match_is_accent_sensitive() {
        let table = RawTable::new(vec!["Reference".to_string()]);
        assert!(!table.has_column("Référence"));
    }
}
