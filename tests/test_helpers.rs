// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成 MES / ERP / PLM 测试表格（CSV 与 XLSX）
// ==========================================

#![allow(dead_code)]

use airplus_workflow::config::{config_keys, ConfigManager};
use airplus_workflow::importer::SourcePaths;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MES_HEADERS: &[&str] = &[
    "Poste",
    "Nom",
    "Référence",
    "Temps Prévu",
    "Temps Réel",
    "Aléas Industriels",
    "Cause Potentielle",
];

pub const ERP_HEADERS: &[&str] = &[
    "Matricule",
    "Prénom",
    "Nom",
    "Qualification",
    "Poste de montage",
    "Coût horaire (€)",
];

pub const PLM_HEADERS: &[&str] = &[
    "Code / Référence",
    "Désignation",
    "Quantité",
    "Fournisseur",
    "Criticité",
    "Coût achat pièce (€)",
    "Délai Approvisionnement",
];

/// 标准场景: Assembly(工位 1, 2) → Test(工位 3)
///
/// - 工位 1 有两名员工,工位 3 无人
/// - 工位 1 引用 PN-100（库存 0）,工位 3 引用 PN-404（PLM 中不存在）
pub fn mes_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["1", "Assembly", "PN-100", "01:00:00", "01:30:00", "Retard fournisseur", "Pièce manquante"],
        vec!["2", "Assembly", "", "00:45:00", "00:40:00", "", ""],
        vec!["3", "Test", "PN-404", "02:00:00", "02:00:00", "", ""],
    ]
}

pub fn erp_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["E001", "Alice", "Martin", "Mécanicien", "Poste 1", "40"],
        vec!["E002", "Bruno", "Petit", "Électricien", "Poste 2", "35"],
        vec!["E003", "Chloé", "Durand", "", "Poste 1", "30"],
    ]
}

pub fn plm_rows() -> Vec<Vec<&'static str>> {
    vec![
        vec!["PN-100", "Rivet titane", "0", "Safran", "Critique", "12.5", "10"],
        vec!["PN-200", "Joint torique", "50", "Thales", "Faible", "1", "5"],
    ]
}

/// 写 CSV（UTF-8,首行为表头）
pub fn write_csv(
    dir: &Path,
    name: &str,
    headers: &[&str],
    rows: &[Vec<&str>],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(path)
}

/// 写 XLSX（第一个工作表;可解析为数值的单元格写成数值）
pub fn write_xlsx(
    dir: &Path,
    name: &str,
    headers: &[&str],
    rows: &[Vec<&str>],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        let r = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(n) => worksheet.write_number(r, col as u16, n)?,
                Err(_) => worksheet.write_string(r, col as u16, *value)?,
            };
        }
    }

    workbook.save(&path)?;
    Ok(path)
}

/// 临时目录中的一套三源数据（目录需保持存活）
pub struct SampleSources {
    pub dir: TempDir,
    pub paths: SourcePaths,
}

pub fn sample_sources_csv() -> Result<SampleSources, Box<dyn Error>> {
    custom_sources_csv(&mes_rows(), &erp_rows(), &plm_rows())
}

pub fn custom_sources_csv(
    mes: &[Vec<&str>],
    erp: &[Vec<&str>],
    plm: &[Vec<&str>],
) -> Result<SampleSources, Box<dyn Error>> {
    let dir = TempDir::new()?;
    let paths = SourcePaths {
        mes: write_csv(dir.path(), "MES_Extraction.csv", MES_HEADERS, mes)?,
        erp: write_csv(dir.path(), "ERP_Equipes.csv", ERP_HEADERS, erp)?,
        plm: write_csv(dir.path(), "PLM_DataSet.csv", PLM_HEADERS, plm)?,
    };
    Ok(SampleSources { dir, paths })
}

pub fn sample_sources_xlsx() -> Result<SampleSources, Box<dyn Error>> {
    let dir = TempDir::new()?;
    let paths = SourcePaths {
        mes: write_xlsx(dir.path(), "MES_Extraction.xlsx", MES_HEADERS, &mes_rows())?,
        erp: write_xlsx(dir.path(), "ERP_Equipes Airplus.xlsx", ERP_HEADERS, &erp_rows())?,
        plm: write_xlsx(dir.path(), "PLM_DataSet.xlsx", PLM_HEADERS, &plm_rows())?,
    };
    Ok(SampleSources { dir, paths })
}

/// 指向给定数据源的配置
pub fn config_for(paths: &SourcePaths, extra: &[(&str, &str)]) -> ConfigManager {
    let mut values: Vec<(String, String)> = vec![
        (config_keys::MES_PATH.to_string(), paths.mes.display().to_string()),
        (config_keys::ERP_PATH.to_string(), paths.erp.display().to_string()),
        (config_keys::PLM_PATH.to_string(), paths.plm.display().to_string()),
    ];
    values.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    ConfigManager::from_values(values)
}
