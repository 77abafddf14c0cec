// ==========================================
// AirPlus 工艺流程聚合 - 流程指标引擎
// ==========================================
// 输入: WorkflowModel（只读）
// 输出: 工位绩效、异常排行、资质分布、全局指标
// 口径: 工时按整分钟计;延误成本 = 向上取整的延误小时 × 工位员工时薪之和
// ==========================================

use crate::domain::staff::StaffRecord;
use crate::domain::types::WorkstationNumber;
use crate::domain::workflow::{WorkflowModel, WorkstationEntry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// 资质为空时的分组名
pub const UNSPECIFIED_QUALIFICATION: &str = "Non spécifié";

// ==========================================
// 输出结构
// ==========================================

/// 单个工位条目的计划/实际对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPerformance {
    pub stage: String,
    pub workstation: WorkstationNumber,
    pub planned_minutes: u32,
    pub actual_minutes: u32,
    /// 超出比例（%）,保留一位小数;提前完成为负
    pub overrun_pct: f64,
}

/// 名称 + 计数（排行/分布通用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalKpis {
    pub entry_count: usize,
    pub incident_count: usize,
    pub incident_rate_pct: f64,
    pub delay_minutes: u64,
    pub delay_hours: u64,
    pub delay_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowKpis {
    pub performance: Vec<EntryPerformance>,
    pub incident_ranking: Vec<RankedCount>,
    pub qualification_breakdown: Vec<RankedCount>,
    pub global: GlobalKpis,
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 计数降序;同值保持首次出现顺序
fn ranked(counts: IndexMap<String, usize>) -> Vec<RankedCount> {
    let mut list: Vec<RankedCount> = counts
        .into_iter()
        .map(|(name, value)| RankedCount { name, value })
        .collect();
    list.sort_by(|a, b| b.value.cmp(&a.value));
    list
}

// ==========================================
// KpiEngine
// ==========================================
#[derive(Debug, Clone)]
pub struct KpiEngine {
    ranking_limit: usize,
}

impl Default for KpiEngine {
    fn default() -> Self {
        Self { ranking_limit: 6 }
    }
}

impl KpiEngine {
    pub fn new(ranking_limit: usize) -> Self {
        Self { ranking_limit }
    }

    #[instrument(skip(self, model), fields(entries = model.entry_count()))]
    pub fn compute(&self, model: &WorkflowModel) -> WorkflowKpis {
        WorkflowKpis {
            performance: self.performance(model),
            incident_ranking: self.incident_ranking(model),
            qualification_breakdown: self.qualification_breakdown(&model.employees),
            global: self.global_kpis(model),
        }
    }

    /// 计划工时 > 0 的条目才有对比意义
    pub fn performance(&self, model: &WorkflowModel) -> Vec<EntryPerformance> {
        model
            .entries()
            .filter_map(|(stage, entry)| {
                let planned = entry.planned_duration.map(|d| d.whole_minutes()).unwrap_or(0);
                if planned == 0 {
                    return None;
                }
                let actual = entry.actual_duration.map(|d| d.whole_minutes()).unwrap_or(0);
                let overrun = (actual as f64 - planned as f64) / planned as f64 * 100.0;
                Some(EntryPerformance {
                    stage: stage.name.clone(),
                    workstation: entry.workstation,
                    planned_minutes: planned,
                    actual_minutes: actual,
                    overrun_pct: round_one_decimal(overrun),
                })
            })
            .collect()
    }

    /// 异常标签出现次数,取前 N
    pub fn incident_ranking(&self, model: &WorkflowModel) -> Vec<RankedCount> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for (_, entry) in model.entries() {
            if let Some(incident) = entry.incident.as_deref() {
                *counts.entry(incident.to_string()).or_default() += 1;
            }
        }
        let mut list = ranked(counts);
        list.truncate(self.ranking_limit);
        list
    }

    /// 全部员工按资质分组（不截断）
    pub fn qualification_breakdown(&self, employees: &[StaffRecord]) -> Vec<RankedCount> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for employee in employees {
            let name = employee
                .qualification
                .as_deref()
                .unwrap_or(UNSPECIFIED_QUALIFICATION);
            *counts.entry(name.to_string()).or_default() += 1;
        }
        ranked(counts)
    }

    pub fn global_kpis(&self, model: &WorkflowModel) -> GlobalKpis {
        // 员工号 → 时薪（同号多行时后者生效）
        let hourly_cost: HashMap<&str, f64> = model
            .employees
            .iter()
            .filter_map(|e| e.hourly_cost.map(|c| (e.employee_id.as_str(), c)))
            .collect();

        let mut entry_count = 0usize;
        let mut incident_count = 0usize;
        let mut delay_minutes = 0u64;
        let mut delay_cost = 0.0f64;

        for (_, entry) in model.entries() {
            entry_count += 1;
            if entry.incident.is_some() {
                incident_count += 1;
            }

            let delay = entry.delay_minutes();
            if delay > 0 {
                delay_minutes += u64::from(delay);
                let billed_hours = (f64::from(delay) / 60.0).ceil();
                delay_cost += billed_hours * station_hourly_cost(entry, &hourly_cost);
            }
        }

        let incident_rate_pct = if entry_count > 0 {
            round_one_decimal(incident_count as f64 / entry_count as f64 * 100.0)
        } else {
            0.0
        };

        GlobalKpis {
            entry_count,
            incident_count,
            incident_rate_pct,
            delay_minutes,
            delay_hours: (delay_minutes as f64 / 60.0).round() as u64,
            delay_cost: delay_cost.round(),
        }
    }
}

fn station_hourly_cost(entry: &WorkstationEntry, hourly_cost: &HashMap<&str, f64>) -> f64 {
    entry
        .employees
        .iter()
        .filter_map(|e| hourly_cost.get(e.employee_id.as_str()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operation::OperationRecord;
    use crate::domain::types::WorkDuration;
    use crate::engine::aggregator::aggregate;

    fn hm(h: u32, m: u32) -> WorkDuration {
        WorkDuration::from_hms(h, m, 0)
    }

    fn fixture() -> WorkflowModel {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2)
                .with_durations(hm(1, 0), hm(1, 30))
                .with_incident("Retard fournisseur"),
            OperationRecord::new("Assembly", 2, 3)
                .with_durations(hm(2, 0), hm(1, 0)),
            OperationRecord::new("Test", 1, 4)
                .with_durations(hm(1, 0), hm(2, 10))
                .with_incident("Panne machine"),
            OperationRecord::new("Test", 3, 5).with_incident("Retard fournisseur"),
        ];
        let staff = vec![
            StaffRecord::new("E1")
                .assigned_to("Poste 1")
                .with_qualification("Mécanicien")
                .with_hourly_cost(40.0),
            StaffRecord::new("E2")
                .assigned_to("Poste 1")
                .with_hourly_cost(35.5),
            StaffRecord::new("E3")
                .assigned_to("Poste 2")
                .with_qualification("Mécanicien"),
        ];
        aggregate(&ops, &staff, &[])
    }

    #[test]
    fn test_global_kpis() {
        let kpis = KpiEngine::default().global_kpis(&fixture());

        assert_eq!(kpis.entry_count, 4);
        assert_eq!(kpis.incident_count, 3);
        assert_eq!(kpis.incident_rate_pct, 75.0);
        // 30 + 70 分钟
        assert_eq!(kpis.delay_minutes, 100);
        assert_eq!(kpis.delay_hours, 2);
        // ceil(0.5h)=1 × 75.5 + ceil(1.17h)=2 × 75.5
        assert_eq!(kpis.delay_cost, 227.0);
    }

    #[test]
    fn test_performance_skips_unplanned_entries() {
        let perf = KpiEngine::default().performance(&fixture());

        assert_eq!(perf.len(), 3);
        assert_eq!(perf[0].overrun_pct, 50.0);
        assert_eq!(perf[1].overrun_pct, -50.0);
        assert_eq!(perf[2].planned_minutes, 60);
        assert_eq!(perf[2].actual_minutes, 130);
    }

    #[test]
    fn test_incident_ranking_limit() {
        let ranking = KpiEngine::new(1).incident_ranking(&fixture());

        assert_eq!(
            ranking,
            vec![RankedCount {
                name: "Retard fournisseur".to_string(),
                value: 2
            }]
        );
    }

    #[test]
    fn test_qualification_breakdown() {
        let breakdown = KpiEngine::default().qualification_breakdown(&fixture().employees);

        assert_eq!(breakdown[0].name, "Mécanicien");
        assert_eq!(breakdown[0].value, 2);
        assert_eq!(breakdown[1].name, UNSPECIFIED_QUALIFICATION);
        assert_eq!(breakdown[1].value, 1);
    }

    #[test]
    fn test_empty_model() {
        let model = aggregate(&[], &[], &[]);
        let kpis = KpiEngine::default().compute(&model);

        assert_eq!(kpis.global.entry_count, 0);
        assert_eq!(kpis.global.incident_rate_pct, 0.0);
        assert!(kpis.performance.is_empty());
    }
}
