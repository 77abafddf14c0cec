// ==========================================
// AirPlus 工艺流程聚合 - 缺件分析引擎
// ==========================================
// 需求: 工位条目参考号按 ';' 拆分,每出现一次计一件
// 库存: PLM Quantité（缺失按 0 计）
// 缺件 = 需求 - 库存,仅报告 > 0 的参考号
// 参考号索引: 同号多行时后者生效
// ==========================================

use crate::domain::part::PartRecord;
use crate::domain::types::WorkstationNumber;
use crate::domain::workflow::WorkflowModel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// 供应商为空时的分组名
pub const UNKNOWN_SUPPLIER: &str = "Inconnu";

// ==========================================
// Criticality - 零件关键度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criticality {
    Critique,
    Haute,
    Moyenne,
    Faible,
    Other,
}

impl Criticality {
    pub const KNOWN: [Criticality; 4] = [
        Criticality::Critique,
        Criticality::Haute,
        Criticality::Moyenne,
        Criticality::Faible,
    ];

    /// 不区分大小写;未知或缺失 → Other
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("critique") => Criticality::Critique,
            Some("haute") => Criticality::Haute,
            Some("moyenne") => Criticality::Moyenne,
            Some("faible") => Criticality::Faible,
            _ => Criticality::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Criticality::Critique => "Critique",
            Criticality::Haute => "Haute",
            Criticality::Moyenne => "Moyenne",
            Criticality::Faible => "Faible",
            Criticality::Other => "Autre",
        }
    }
}

// ==========================================
// 输出结构
// ==========================================

/// 使用位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartUsage {
    pub stage: String,
    pub workstation: WorkstationNumber,
}

/// 单个缺件参考号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartShortage {
    pub reference: String,
    pub description: Option<String>,
    pub required: u32,
    pub available: f64,
    pub missing: f64,
    pub criticality: Option<String>,
    pub supplier: Option<String>,
    pub lead_time: Option<String>,
    pub unit_cost: Option<f64>,
    pub total_cost: f64,
    pub used_in_stages: Vec<String>,
    pub used_at: Vec<PartUsage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierShortage {
    pub supplier: String,
    pub missing: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalityShortage {
    pub criticality: String,
    pub missing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageReport {
    pub shortages: Vec<PartShortage>,
    pub total_missing: f64,
    pub total_cost: f64,
    pub critical_count: usize,
    pub by_supplier: Vec<SupplierShortage>,
    pub by_criticality: Vec<CriticalityShortage>,
}

/// 拆分复合参考号（"A; B;" → ["A", "B"]）
pub fn split_references(reference: &str) -> impl Iterator<Item = &str> {
    reference.split(';').map(str::trim).filter(|r| !r.is_empty())
}

struct Need {
    required: u32,
    used_in_stages: Vec<String>,
    used_at: Vec<PartUsage>,
}

// ==========================================
// ShortageEngine
// ==========================================
#[derive(Debug, Clone)]
pub struct ShortageEngine {
    supplier_limit: usize,
}

impl Default for ShortageEngine {
    fn default() -> Self {
        Self { supplier_limit: 8 }
    }
}

impl ShortageEngine {
    pub fn new(supplier_limit: usize) -> Self {
        Self { supplier_limit }
    }

    #[instrument(skip(self, model), fields(parts = model.parts.len()))]
    pub fn compute(&self, model: &WorkflowModel) -> ShortageReport {
        let index: HashMap<&str, &PartRecord> = model
            .parts
            .iter()
            .map(|p| (p.reference.as_str(), p))
            .collect();

        // 需求按首次出现顺序累计,仅统计 PLM 中存在的参考号
        let mut needs: IndexMap<&str, Need> = IndexMap::new();
        for (stage, entry) in model.entries() {
            let Some(reference) = entry.reference.as_deref() else {
                continue;
            };
            for part_ref in split_references(reference) {
                let Some(part) = index.get(part_ref) else {
                    continue;
                };
                let need = needs.entry(part.reference.as_str()).or_insert_with(|| Need {
                    required: 0,
                    used_in_stages: Vec::new(),
                    used_at: Vec::new(),
                });
                need.required += 1;
                if !need.used_in_stages.contains(&stage.name) {
                    need.used_in_stages.push(stage.name.clone());
                }
                need.used_at.push(PartUsage {
                    stage: stage.name.clone(),
                    workstation: entry.workstation,
                });
            }
        }

        let mut shortages: Vec<PartShortage> = needs
            .into_iter()
            .filter_map(|(reference, need)| {
                let part = index.get(reference)?;
                let available = part.quantity.unwrap_or(0.0);
                let missing = f64::from(need.required) - available;
                if missing <= 0.0 {
                    return None;
                }
                Some(PartShortage {
                    reference: reference.to_string(),
                    description: part.description.clone(),
                    required: need.required,
                    available,
                    missing,
                    criticality: part.criticality.clone(),
                    supplier: part.supplier.clone(),
                    lead_time: part.lead_time.clone(),
                    unit_cost: part.unit_cost,
                    total_cost: missing * part.unit_cost.unwrap_or(0.0),
                    used_in_stages: need.used_in_stages,
                    used_at: need.used_at,
                })
            })
            .collect();

        shortages.sort_by(|a, b| {
            let ca = Criticality::from_label(a.criticality.as_deref());
            let cb = Criticality::from_label(b.criticality.as_deref());
            ca.cmp(&cb)
                .then_with(|| b.missing.partial_cmp(&a.missing).unwrap_or(Ordering::Equal))
        });

        let total_missing: f64 = shortages.iter().map(|s| s.missing).sum();
        let total_cost: f64 = shortages.iter().map(|s| s.total_cost).sum();
        let critical_count = shortages
            .iter()
            .filter(|s| Criticality::from_label(s.criticality.as_deref()) == Criticality::Critique)
            .count();

        let by_supplier = self.by_supplier(&shortages);
        let by_criticality = by_criticality(&shortages);

        debug!(
            shortages = shortages.len(),
            total_missing, total_cost, "缺件分析完成"
        );

        ShortageReport {
            shortages,
            total_missing,
            total_cost,
            critical_count,
            by_supplier,
            by_criticality,
        }
    }

    /// 供应商汇总: 成本 > 0,成本降序,取前 N
    fn by_supplier(&self, shortages: &[PartShortage]) -> Vec<SupplierShortage> {
        let mut groups: IndexMap<String, SupplierShortage> = IndexMap::new();
        for s in shortages {
            let name = s.supplier.as_deref().unwrap_or(UNKNOWN_SUPPLIER);
            let group = groups
                .entry(name.to_string())
                .or_insert_with(|| SupplierShortage {
                    supplier: name.to_string(),
                    missing: 0.0,
                    cost: 0.0,
                });
            group.missing += s.missing;
            group.cost += s.total_cost;
        }

        let mut list: Vec<SupplierShortage> =
            groups.into_values().filter(|g| g.cost > 0.0).collect();
        list.sort_by(|a, b| b.cost.partial_cmp(&a.cost).unwrap_or(Ordering::Equal));
        list.truncate(self.supplier_limit);
        list
    }
}

/// 关键度汇总: 仅四个已知等级,缺件数 > 0
fn by_criticality(shortages: &[PartShortage]) -> Vec<CriticalityShortage> {
    Criticality::KNOWN
        .iter()
        .filter_map(|level| {
            let missing: f64 = shortages
                .iter()
                .filter(|s| Criticality::from_label(s.criticality.as_deref()) == *level)
                .map(|s| s.missing)
                .sum();
            (missing > 0.0).then(|| CriticalityShortage {
                criticality: level.label().to_string(),
                missing,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operation::OperationRecord;
    use crate::engine::aggregator::aggregate;

    fn model() -> WorkflowModel {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2).with_reference("PN-1; PN-2"),
            OperationRecord::new("Assembly", 2, 3).with_reference("PN-1"),
            OperationRecord::new("Test", 3, 4).with_reference("PN-1;PN-3;"),
            OperationRecord::new("Test", 4, 5).with_reference("PN-404"),
        ];
        let parts = vec![
            PartRecord::new("PN-1")
                .with_quantity(1.0)
                .with_supplier("Safran")
                .with_criticality("Haute")
                .with_unit_cost(100.0),
            PartRecord::new("PN-2")
                .with_quantity(5.0)
                .with_criticality("Critique"),
            PartRecord::new("PN-3")
                .with_criticality("critique")
                .with_unit_cost(10.0),
        ];
        aggregate(&ops, &[], &parts)
    }

    #[test]
    fn test_split_references() {
        let refs: Vec<&str> = split_references(" A ;B;; ").collect();
        assert_eq!(refs, vec!["A", "B"]);
    }

    #[test]
    fn test_shortages_sorted_by_criticality() {
        let report = ShortageEngine::default().compute(&model());

        let refs: Vec<&str> = report.shortages.iter().map(|s| s.reference.as_str()).collect();
        assert_eq!(refs, vec!["PN-3", "PN-1"]);

        let pn1 = &report.shortages[1];
        assert_eq!(pn1.required, 3);
        assert_eq!(pn1.missing, 2.0);
        assert_eq!(pn1.total_cost, 200.0);
        assert_eq!(pn1.used_in_stages, vec!["Assembly".to_string(), "Test".to_string()]);
        assert_eq!(pn1.used_at.len(), 3);

        assert_eq!(report.total_missing, 3.0);
        assert_eq!(report.total_cost, 210.0);
        assert_eq!(report.critical_count, 1);
    }

    #[test]
    fn test_supplier_and_criticality_rollups() {
        let report = ShortageEngine::default().compute(&model());

        assert_eq!(report.by_supplier.len(), 2);
        assert_eq!(report.by_supplier[0].supplier, "Safran");
        assert_eq!(report.by_supplier[0].cost, 200.0);
        assert_eq!(report.by_supplier[1].supplier, UNKNOWN_SUPPLIER);

        let levels: Vec<&str> = report
            .by_criticality
            .iter()
            .map(|c| c.criticality.as_str())
            .collect();
        assert_eq!(levels, vec!["Critique", "Haute"]);
    }

    #[test]
    fn test_last_row_wins_for_reference_index() {
        let ops = vec![OperationRecord::new("Assembly", 1, 2).with_reference("PN-1")];
        let parts = vec![
            PartRecord::new("PN-1").with_quantity(0.0),
            PartRecord::new("PN-1").with_quantity(10.0),
        ];
        let report = ShortageEngine::default().compute(&aggregate(&ops, &[], &parts));

        assert!(report.shortages.is_empty());
    }

    #[test]
    fn test_criticality_from_label() {
        assert_eq!(Criticality::from_label(Some("CRITIQUE")), Criticality::Critique);
        assert_eq!(Criticality::from_label(Some("urgent")), Criticality::Other);
        assert_eq!(Criticality::from_label(None), Criticality::Other);
    }
}
