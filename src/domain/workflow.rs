// ==========================================
// AirPlus 工艺流程聚合 - 工艺流程模型
// ==========================================
// 结构: 阶段(Stage) → 工位条目(WorkstationEntry) → 员工/零件
// 生命周期: 每次运行构建一次,构建后只读
// 序列化键与展示层约定一致（postes / poste_id / pieces ...）
// ==========================================

use crate::domain::part::{PartRecord, PartRef};
use crate::domain::staff::{StaffRecord, StaffRef};
use crate::domain::types::{WorkDuration, WorkstationNumber};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// WorkstationEntry - 工位条目（一行工序对应一条）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkstationEntry {
    #[serde(rename = "poste_id")]
    pub workstation: WorkstationNumber,

    pub reference: Option<String>,

    #[serde(rename = "temps_prevu")]
    pub planned_duration: Option<WorkDuration>,

    #[serde(rename = "temps_reel")]
    pub actual_duration: Option<WorkDuration>,

    #[serde(rename = "aleas")]
    pub incident: Option<String>,

    #[serde(rename = "cause")]
    pub probable_cause: Option<String>,

    /// 总是存在,无匹配时为空列表
    #[serde(default)]
    pub employees: Vec<StaffRef>,

    /// 无引用与引用未命中在输出中形状一致: 字段省略
    #[serde(rename = "pieces", default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<PartRef>,
}

impl WorkstationEntry {
    pub fn has_part(&self) -> bool {
        !self.parts.is_empty()
    }

    /// 超出计划的分钟数（无超时或工时缺失时为 0）
    pub fn delay_minutes(&self) -> u32 {
        let planned = self.planned_duration.map(|d| d.whole_minutes()).unwrap_or(0);
        let actual = self.actual_duration.map(|d| d.whole_minutes()).unwrap_or(0);
        actual.saturating_sub(planned)
    }
}

// ==========================================
// Stage - 生产阶段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,

    #[serde(rename = "postes")]
    pub entries: Vec<WorkstationEntry>,
}

impl Stage {
    pub fn stage_id(index: usize) -> String {
        format!("stage_{}", index)
    }
}

// ==========================================
// Relationships - 反向索引（员工/零件/阶段 → 工位号）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationships {
    /// 员工号 → 所在工位（去重、升序）
    #[serde(default)]
    pub employee_workstations: BTreeMap<String, Vec<WorkstationNumber>>,

    /// 零件参考号 → 使用工位（去重、升序）
    #[serde(default)]
    pub part_workstations: BTreeMap<String, Vec<WorkstationNumber>>,

    /// 阶段名 → 工位序列（源顺序,保留重复）
    #[serde(default)]
    pub stage_workstations: IndexMap<String, Vec<WorkstationNumber>>,
}

// ==========================================
// WorkflowModel - 聚合结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowModel {
    pub stages: Vec<Stage>,
    pub relationships: Relationships,
    pub employees: Vec<StaffRecord>,
    pub parts: Vec<PartRecord>,
}

impl WorkflowModel {
    pub fn entry_count(&self) -> usize {
        self.stages.iter().map(|s| s.entries.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Stage, &WorkstationEntry)> {
        self.stages
            .iter()
            .flat_map(|stage| stage.entries.iter().map(move |entry| (stage, entry)))
    }

    pub fn stage_by_name(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(planned: Option<WorkDuration>, actual: Option<WorkDuration>) -> WorkstationEntry {
        WorkstationEntry {
            workstation: WorkstationNumber(1),
            reference: None,
            planned_duration: planned,
            actual_duration: actual,
            incident: None,
            probable_cause: None,
            employees: vec![],
            parts: vec![],
        }
    }

    #[test]
    fn test_delay_minutes() {
        let e = entry(
            Some(WorkDuration::from_hms(1, 0, 0)),
            Some(WorkDuration::from_hms(1, 45, 0)),
        );
        assert_eq!(e.delay_minutes(), 45);

        // 提前完成不算负延误
        let e = entry(
            Some(WorkDuration::from_hms(2, 0, 0)),
            Some(WorkDuration::from_hms(1, 0, 0)),
        );
        assert_eq!(e.delay_minutes(), 0);
    }

    #[test]
    fn test_entry_serialization_shape() {
        let e = entry(None, None);
        let value = serde_json::to_value(&e).unwrap();

        assert_eq!(value["poste_id"], 1);
        assert!(value["reference"].is_null());
        assert_eq!(value["employees"], serde_json::json!([]));
        assert!(value.get("pieces").is_none());
    }
}
