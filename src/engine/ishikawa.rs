// ==========================================
// AirPlus 工艺流程聚合 - 异常 6M 归因引擎
// ==========================================
// 输入: WorkflowModel（只读）
// 输出: 每个带异常的工位条目 + 6M 分类统计
// 口径: 异常标签精确匹配分类表,未命中归为 "Non classifié"
//       占比分母为全部异常条目（含未分类）
// ==========================================

use crate::domain::types::{WorkDuration, WorkstationNumber};
use crate::domain::workflow::WorkflowModel;
use crate::engine::kpi::round_one_decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// ==========================================
// IshikawaCategory - 6M 分类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IshikawaCategory {
    #[serde(rename = "Matériel")]
    Materiel,
    #[serde(rename = "Matière")]
    Matiere,
    #[serde(rename = "Méthode")]
    Methode,
    #[serde(rename = "Main d'œuvre")]
    MainDOeuvre,
    #[serde(rename = "Milieu")]
    Milieu,
    #[serde(rename = "Mesure")]
    Mesure,
    #[serde(rename = "Non classifié")]
    Unclassified,
}

/// 统计输出顺序
pub const CATEGORIES_6M: [IshikawaCategory; 6] = [
    IshikawaCategory::Materiel,
    IshikawaCategory::Matiere,
    IshikawaCategory::Methode,
    IshikawaCategory::MainDOeuvre,
    IshikawaCategory::Milieu,
    IshikawaCategory::Mesure,
];

impl IshikawaCategory {
    pub fn label(self) -> &'static str {
        match self {
            IshikawaCategory::Materiel => "Matériel",
            IshikawaCategory::Matiere => "Matière",
            IshikawaCategory::Methode => "Méthode",
            IshikawaCategory::MainDOeuvre => "Main d'œuvre",
            IshikawaCategory::Milieu => "Milieu",
            IshikawaCategory::Mesure => "Mesure",
            IshikawaCategory::Unclassified => "Non classifié",
        }
    }

    /// 异常标签 → 6M 分类（精确匹配）
    pub fn classify(incident: &str) -> Self {
        INCIDENT_CATEGORIES
            .iter()
            .find(|(label, _)| *label == incident)
            .map(|(_, category)| *category)
            .unwrap_or(IshikawaCategory::Unclassified)
    }
}

use IshikawaCategory::{MainDOeuvre, Materiel, Matiere, Mesure, Methode, Milieu};

const INCIDENT_CATEGORIES: &[(&str, IshikawaCategory)] = &[
    ("Rupture outillage spécifique", Materiel),
    ("Dysfonctionnement machine soudure", Materiel),
    ("Problème température atelier", Milieu),
    ("Défaillance contrôle qualité", Mesure),
    ("Usure équipements serrage", Materiel),
    ("Incident logiciel robots", Materiel),
    ("Panne système ventilation", Milieu),
    ("Défaut synchronisation", Methode),
    ("Interruption réseau", Materiel),
    ("Incident manutention", Methode),
    ("Dérive calibration optique", Mesure),
    ("Usure gabarits", Materiel),
    ("Contamination zone", Milieu),
    ("Défaillance refroidissement", Materiel),
    ("Perte traçabilité", Methode),
    ("Dysfonctionnement guidage", Materiel),
    ("Incident maintenance", Materiel),
    ("Problème lubrification", Materiel),
    ("Défaut communication", Methode),
    ("Déformation supports", Materiel),
    ("Impact variations pression", Milieu),
    ("Incident ventilation", Milieu),
    ("Dérive calibration", Mesure),
    ("Contamination", Milieu),
    ("Dysfonctionnement transport", Materiel),
    ("Surchauffe critique", Milieu),
    ("Perte référencement", Methode),
    ("Usure systèmes serrage", Materiel),
    ("Incident électrique", Materiel),
    ("Défaillance majeure systèmes", Materiel),
    ("Problème communication inter-systèmes", Methode),
    ("Dysfonctionnement guidage automatisé", Materiel),
    ("Contamination zone travail sensible", Milieu),
    ("Défaillance critique système contrôle", Mesure),
    ("Usure prématurée outillages précision", Materiel),
    ("Impact variations thermiques", Milieu),
    ("Désynchronisation postes travail", Methode),
    ("Incident ventilation affectant qualité", Milieu),
    ("Dérive calibration instruments", Mesure),
    ("Contamination zones critiques", Milieu),
    ("Dysfonctionnement transport pièces", Materiel),
    ("Défaillance protocoles sécurité industrielle", Methode),
    ("Problème calibration systèmes", Mesure),
    ("Impact vibrations sur précision", Milieu),
    ("Perte traçabilité composants", Methode),
    ("Dysfonctionnement systèmes guidage", Materiel),
    ("Contamination environnement production", Milieu),
    ("Défaillance critique contrôle qualité", Mesure),
    ("Dérive paramètres production", Mesure),
    ("Problème connectique électrique", Materiel),
    ("Défaut adhérence supports", Matiere),
    ("Problème impression marquages", Materiel),
    ("Défaut positionnement étiquettes", Methode),
    ("Instabilité processus marquage", Methode),
    ("Erreur placement stickers", MainDOeuvre),
];

// ==========================================
// 输出结构
// ==========================================

/// 一个带异常的工位条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IshikawaProblem {
    pub stage: String,
    pub workstation: WorkstationNumber,
    pub incident: String,
    pub cause: Option<String>,
    pub category: IshikawaCategory,
    pub planned_duration: Option<WorkDuration>,
    pub actual_duration: Option<WorkDuration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: IshikawaCategory,
    pub count: usize,
    /// 占全部异常条目的百分比,保留一位小数
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IshikawaReport {
    pub problems: Vec<IshikawaProblem>,
    /// 固定 6M 顺序,计数为 0 的分类也列出
    pub categories: Vec<CategoryStat>,
    pub unclassified: usize,
    pub total_problems: usize,
}

impl IshikawaReport {
    pub fn problems_in(
        &self,
        category: IshikawaCategory,
    ) -> impl Iterator<Item = &IshikawaProblem> {
        self.problems.iter().filter(move |p| p.category == category)
    }

    /// 计数最多的分类;无异常时为 None
    pub fn dominant(&self) -> Option<&CategoryStat> {
        self.categories
            .iter()
            .filter(|s| s.count > 0)
            .fold(None, |best: Option<&CategoryStat>, stat| match best {
                Some(b) if b.count >= stat.count => Some(b),
                _ => Some(stat),
            })
    }
}

// ==========================================
// IshikawaEngine
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct IshikawaEngine;

impl IshikawaEngine {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, model), fields(entries = model.entry_count()))]
    pub fn compute(&self, model: &WorkflowModel) -> IshikawaReport {
        let problems: Vec<IshikawaProblem> = model
            .entries()
            .filter_map(|(stage, entry)| {
                let incident = entry.incident.as_deref()?;
                Some(IshikawaProblem {
                    stage: stage.name.clone(),
                    workstation: entry.workstation,
                    incident: incident.to_string(),
                    cause: entry.probable_cause.clone(),
                    category: IshikawaCategory::classify(incident),
                    planned_duration: entry.planned_duration,
                    actual_duration: entry.actual_duration,
                })
            })
            .collect();

        let total_problems = problems.len();
        let categories: Vec<CategoryStat> = CATEGORIES_6M
            .iter()
            .map(|&category| {
                let count = problems.iter().filter(|p| p.category == category).count();
                let share_pct = if total_problems == 0 {
                    0.0
                } else {
                    round_one_decimal(count as f64 / total_problems as f64 * 100.0)
                };
                CategoryStat {
                    category,
                    count,
                    share_pct,
                }
            })
            .collect();
        let unclassified = problems
            .iter()
            .filter(|p| p.category == IshikawaCategory::Unclassified)
            .count();

        debug!(total_problems, unclassified, "6M 归因完成");

        IshikawaReport {
            problems,
            categories,
            unclassified,
            total_problems,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operation::OperationRecord;
    use crate::engine::aggregator::aggregate;

    fn fixture() -> WorkflowModel {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2).with_incident("Usure gabarits"),
            OperationRecord::new("Assembly", 2, 3),
            OperationRecord::new("Assembly", 3, 4).with_incident("Incident électrique"),
            OperationRecord::new("Test", 4, 5).with_incident("Erreur placement stickers"),
            OperationRecord::new("Test", 5, 6).with_incident("Retard fournisseur"),
        ];
        aggregate(&ops, &[], &[])
    }

    fn stat(report: &IshikawaReport, category: IshikawaCategory) -> &CategoryStat {
        report
            .categories
            .iter()
            .find(|s| s.category == category)
            .unwrap()
    }

    #[test]
    fn test_classify_mapped_incident() {
        assert_eq!(
            IshikawaCategory::classify("Dérive calibration optique"),
            IshikawaCategory::Mesure
        );
        assert_eq!(
            IshikawaCategory::classify("Défaut adhérence supports"),
            IshikawaCategory::Matiere
        );
        // "Dérive calibration" 与其加长版本各自独立
        assert_eq!(
            IshikawaCategory::classify("Dérive calibration"),
            IshikawaCategory::Mesure
        );
    }

    #[test]
    fn test_classify_unmapped_incident() {
        assert_eq!(
            IshikawaCategory::classify("Retard fournisseur"),
            IshikawaCategory::Unclassified
        );
        // 精确匹配,大小写不同即未命中
        assert_eq!(
            IshikawaCategory::classify("usure gabarits"),
            IshikawaCategory::Unclassified
        );
        assert_eq!(IshikawaCategory::Unclassified.label(), "Non classifié");
    }

    #[test]
    fn test_report_counts_and_shares() {
        let report = IshikawaEngine::new().compute(&fixture());

        // Poste 2 无异常,不计入
        assert_eq!(report.total_problems, 4);
        assert_eq!(report.unclassified, 1);

        let order: Vec<IshikawaCategory> = report.categories.iter().map(|s| s.category).collect();
        assert_eq!(order, CATEGORIES_6M.to_vec());

        assert_eq!(stat(&report, IshikawaCategory::Materiel).count, 2);
        assert_eq!(stat(&report, IshikawaCategory::Materiel).share_pct, 50.0);
        assert_eq!(stat(&report, IshikawaCategory::MainDOeuvre).count, 1);
        assert_eq!(stat(&report, IshikawaCategory::MainDOeuvre).share_pct, 25.0);
        assert_eq!(stat(&report, IshikawaCategory::Mesure).count, 0);
        assert_eq!(stat(&report, IshikawaCategory::Mesure).share_pct, 0.0);

        let dominant = report.dominant().unwrap();
        assert_eq!(dominant.category, IshikawaCategory::Materiel);

        let stages: Vec<&str> = report
            .problems_in(IshikawaCategory::Materiel)
            .map(|p| p.stage.as_str())
            .collect();
        assert_eq!(stages, vec!["Assembly", "Assembly"]);
    }

    #[test]
    fn test_share_rounds_to_one_decimal() {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2).with_incident("Contamination"),
            OperationRecord::new("Assembly", 2, 3).with_incident("Incident manutention"),
            OperationRecord::new("Assembly", 3, 4).with_incident("Perte traçabilité"),
        ];
        let report = IshikawaEngine::new().compute(&aggregate(&ops, &[], &[]));

        assert_eq!(stat(&report, IshikawaCategory::Milieu).share_pct, 33.3);
        assert_eq!(stat(&report, IshikawaCategory::Methode).share_pct, 66.7);
        assert_eq!(report.unclassified, 0);
    }

    #[test]
    fn test_empty_model() {
        let report = IshikawaEngine::new().compute(&aggregate(&[], &[], &[]));

        assert_eq!(report.total_problems, 0);
        assert!(report.categories.iter().all(|s| s.count == 0 && s.share_pct == 0.0));
        assert!(report.dominant().is_none());
    }

    #[test]
    fn test_category_wire_labels() {
        let value = serde_json::to_value(IshikawaCategory::MainDOeuvre).unwrap();
        assert_eq!(value, "Main d'œuvre");
    }
}
