// ==========================================
// 示例数据生成器
// ==========================================
// 用途: 生成三份示例数据源 CSV（MES / ERP / PLM）
// 输出: <目标目录>/{MES_Extraction,ERP_Equipes,PLM_DataSet}.csv
// 用法: generate_sample_data [目标目录,默认 data/sample]
// ==========================================

use anyhow::{Context, Result};
use csv::Writer;
use std::path::{Path, PathBuf};

const MES_HEADER: &[&str] = &[
    "Poste",
    "Nom",
    "Référence",
    "Temps Prévu",
    "Temps Réel",
    "Aléas Industriels",
    "Cause Potentielle",
];

const ERP_HEADER: &[&str] = &[
    "Matricule",
    "Prénom",
    "Nom",
    "Qualification",
    "Poste de montage",
    "Coût horaire (€)",
];

const PLM_HEADER: &[&str] = &[
    "Code / Référence",
    "Désignation",
    "Quantité",
    "Fournisseur",
    "Criticité",
    "Coût achat pièce (€)",
    "Délai Approvisionnement",
];

// 阶段名 + 该阶段的工位数
const STAGES: &[(&str, u32)] = &[
    ("Préparation", 2),
    ("Assemblage fuselage", 3),
    ("Câblage", 2),
    ("Contrôle qualité", 1),
];

const QUALIFICATIONS: &[&str] = &["Mécanicien", "Électricien", "Contrôleur", ""];
const SUPPLIERS: &[&str] = &["Safran", "Thales", "Liebherr", "Latécoère"];
const CRITICALITIES: &[&str] = &["Critique", "Haute", "Moyenne", "Faible"];
const INCIDENTS: &[(&str, &str)] = &[
    ("Retard fournisseur", "Pièce manquante"),
    ("Panne outillage", "Maintenance"),
];

fn hms(total_minutes: u32) -> String {
    format!("{:02}:{:02}:00", total_minutes / 60, total_minutes % 60)
}

fn write_mes(path: &Path) -> Result<usize> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(MES_HEADER)?;

    let mut poste = 0u32;
    for &(stage, count) in STAGES {
        for _ in 0..count {
            poste += 1;
            let planned = 30 + poste * 15;
            let actual = if poste % 3 == 0 { planned + 25 } else { planned - 5 };
            let reference = if poste % 4 == 0 {
                String::new()
            } else {
                format!("PN-{}", 100 + poste)
            };
            let (incident, cause) = if poste % 3 == 0 {
                INCIDENTS[(poste as usize / 3) % INCIDENTS.len()]
            } else {
                ("", "")
            };

            writer.write_record([
                poste.to_string().as_str(),
                stage,
                reference.as_str(),
                hms(planned).as_str(),
                hms(actual).as_str(),
                incident,
                cause,
            ])?;
        }
    }
    writer.flush()?;
    Ok(poste as usize)
}

fn write_erp(path: &Path, postes: usize) -> Result<usize> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(ERP_HEADER)?;

    let mut rows = 0;
    for poste in 1..=postes {
        // 最后一个工位故意无人
        let staff = if poste == postes { 0 } else { 1 + poste % 2 };
        for slot in 0..staff {
            rows += 1;
            let qualification = QUALIFICATIONS[(poste + slot) % QUALIFICATIONS.len()];
            let cost = 30 + (rows % 4) * 5;
            writer.write_record([
                format!("E{:03}", rows).as_str(),
                format!("Prénom{}", rows).as_str(),
                format!("Nom{}", rows).as_str(),
                qualification,
                format!("Poste {}", poste).as_str(),
                cost.to_string().as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn write_plm(path: &Path, postes: usize) -> Result<usize> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(PLM_HEADER)?;

    let mut rows = 0;
    for poste in 1..=postes {
        // PN-1xx 中末位为 7 的参考号不在 PLM 中
        if poste % 10 == 7 {
            continue;
        }
        rows += 1;
        let quantity = if poste % 2 == 0 { 0 } else { 10 * poste };
        let unit_cost = 2.5 * poste as f64;
        writer.write_record([
            format!("PN-{}", 100 + poste).as_str(),
            format!("Composant {}", poste).as_str(),
            quantity.to_string().as_str(),
            SUPPLIERS[poste % SUPPLIERS.len()],
            CRITICALITIES[poste % CRITICALITIES.len()],
            format!("{:.2}", unit_cost).as_str(),
            (5 + poste * 2).to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/sample"));

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("无法创建目录: {}", out_dir.display()))?;

    let mes_path = out_dir.join("MES_Extraction.csv");
    let erp_path = out_dir.join("ERP_Equipes.csv");
    let plm_path = out_dir.join("PLM_DataSet.csv");

    let postes = write_mes(&mes_path).context("写入 MES 示例失败")?;
    let staff = write_erp(&erp_path, postes).context("写入 ERP 示例失败")?;
    let parts = write_plm(&plm_path, postes).context("写入 PLM 示例失败")?;

    println!("✓ {} ({} 行)", mes_path.display(), postes);
    println!("✓ {} ({} 行)", erp_path.display(), staff);
    println!("✓ {} ({} 行)", plm_path.display(), parts);
    Ok(())
}
