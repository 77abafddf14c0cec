// ==========================================
// AirPlus 工艺流程聚合 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 约定: 首行为表头; 读取 Excel 第一个工作表
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use crate::importer::raw_table::{RawRow, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头（去掉 Excel 另存 CSV 时可能带上的 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut table = RawTable::new(headers);
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut row = RawRow::new(idx + 2);

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = table.headers.get(col_idx) {
                    row.cells.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row.cells.values().all(|v| v.is_empty()) {
                continue;
            }

            table.rows.push(row);
        }

        debug!(path = %file_path.display(), rows = table.len(), "CSV 解析完成");
        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格 → 文本
    ///
    /// 空单元格与错误单元格（#N/A 等）统一为空串,由映射层归一为 None。
    /// 日期/时间单元格输出其天数小数,工时解析据此换算。
    pub fn cell_to_text(cell: &Data) -> String {
        match cell {
            Data::Empty | Data::Error(_) => String::new(),
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => dt.as_f64().to_string(),
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row.iter().map(Self::cell_to_text).collect();

        // 数据区可能不从 A1 开始
        let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

        let mut table = RawTable::new(headers);
        for (idx, data_row) in rows.enumerate() {
            let mut row = RawRow::new(first_row + idx + 2);

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = table.headers.get(col_idx) {
                    row.cells.insert(header.clone(), Self::cell_to_text(cell));
                }
            }

            // 跳过完全空白的行
            if row.cells.values().all(|v| v.is_empty()) {
                continue;
            }

            table.rows.push(row);
        }

        debug!(
            path = %file_path.display(),
            sheet = %sheet_name,
            rows = table.len(),
            "Excel 解析完成"
        );
        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_raw_table(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
