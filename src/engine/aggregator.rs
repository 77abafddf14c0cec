// ==========================================
// AirPlus 工艺流程聚合 - 工艺流程聚合引擎
// ==========================================
// 输入: 工序记录 + 员工记录 + 零件记录（均已物化）
// 输出: WorkflowModel（阶段 → 工位条目 → 员工/零件）
// 红线: 每条有效工序行恰好生成一个工位条目,查找未命中不是错误
// ==========================================

use crate::domain::operation::OperationRecord;
use crate::domain::part::{PartRecord, PartRef};
use crate::domain::staff::{StaffRecord, StaffRef};
use crate::domain::types::WorkstationNumber;
use crate::domain::workflow::{Relationships, Stage, WorkflowModel, WorkstationEntry};
use crate::engine::join_key::workstation_key;
use crate::perf::{record_rows, PerfGuard};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

// ==========================================
// StaffIndex - 装配工位键 → 员工
// ==========================================
#[derive(Debug, Default)]
pub struct StaffIndex<'a> {
    by_key: HashMap<&'a str, Vec<&'a StaffRecord>>,
}

impl<'a> StaffIndex<'a> {
    pub fn build(staff: &'a [StaffRecord]) -> Self {
        let mut by_key: HashMap<&'a str, Vec<&'a StaffRecord>> = HashMap::new();
        for record in staff {
            if let Some(key) = record.workstation_assignment.as_deref() {
                by_key.entry(key).or_default().push(record);
            }
        }
        Self { by_key }
    }

    /// 精确文本匹配,源顺序
    pub fn lookup(&self, key: &str) -> &[&'a StaffRecord] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ==========================================
// PartIndex - 参考号 → 零件（保留全部匹配）
// ==========================================
#[derive(Debug, Default)]
pub struct PartIndex<'a> {
    by_reference: HashMap<&'a str, Vec<&'a PartRecord>>,
}

impl<'a> PartIndex<'a> {
    pub fn build(parts: &'a [PartRecord]) -> Self {
        let mut by_reference: HashMap<&'a str, Vec<&'a PartRecord>> = HashMap::new();
        for record in parts {
            by_reference
                .entry(record.reference.as_str())
                .or_default()
                .push(record);
        }
        Self { by_reference }
    }

    pub fn lookup(&self, reference: &str) -> &[&'a PartRecord] {
        self.by_reference
            .get(reference)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// 提取阶段名（首次出现顺序,去重）
pub fn extract_stages(operations: &[OperationRecord]) -> IndexSet<String> {
    operations
        .iter()
        .map(|op| op.stage_name.clone())
        .collect()
}

/// 构建单个工位条目
///
/// - 员工: 工位号格式化为 "Poste <N>" 后精确匹配
/// - 零件: 参考号存在时精确匹配,不存在时跳过
pub fn build_workstation_entry(
    operation: &OperationRecord,
    staff_index: &StaffIndex<'_>,
    part_index: &PartIndex<'_>,
) -> WorkstationEntry {
    let key = workstation_key(operation.workstation);
    let employees: Vec<StaffRef> = staff_index
        .lookup(&key)
        .iter()
        .map(|record| StaffRef::from(*record))
        .collect();

    let parts: Vec<PartRef> = match operation.part_reference.as_deref() {
        Some(reference) => part_index
            .lookup(reference)
            .iter()
            .map(|record| PartRef::from(*record))
            .collect(),
        None => Vec::new(),
    };

    WorkstationEntry {
        workstation: operation.workstation,
        reference: operation.part_reference.clone(),
        planned_duration: operation.planned_duration,
        actual_duration: operation.actual_duration,
        incident: operation.incident.clone(),
        probable_cause: operation.probable_cause.clone(),
        employees,
        parts,
    }
}

// ==========================================
// WorkflowAggregator - 聚合引擎
// ==========================================
#[derive(Debug, Default)]
pub struct WorkflowAggregator;

impl WorkflowAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 聚合三源数据
    ///
    /// 阶段按首次出现顺序,阶段内按源行顺序;重复行各自成条目。
    #[instrument(skip_all, fields(
        operations = operations.len(),
        staff = staff.len(),
        parts = parts.len()
    ))]
    pub fn aggregate(
        &self,
        operations: &[OperationRecord],
        staff: &[StaffRecord],
        parts: &[PartRecord],
    ) -> WorkflowModel {
        let _perf = PerfGuard::new("engine.aggregate");

        let staff_index = StaffIndex::build(staff);
        let part_index = PartIndex::build(parts);

        // 阶段顺序取自 extract_stages,再按阶段序号分桶
        let stage_names = extract_stages(operations);
        let mut buckets: Vec<Vec<&OperationRecord>> = vec![Vec::new(); stage_names.len()];
        for op in operations {
            if let Some(idx) = stage_names.get_index_of(op.stage_name.as_str()) {
                buckets[idx].push(op);
            }
        }

        let stages: Vec<Stage> = stage_names
            .into_iter()
            .zip(buckets)
            .enumerate()
            .map(|(idx, (name, ops))| {
                let entries: Vec<WorkstationEntry> = ops
                    .into_iter()
                    .map(|op| build_workstation_entry(op, &staff_index, &part_index))
                    .collect();
                debug!(stage = %name, entries = entries.len(), "阶段聚合完成");
                Stage {
                    id: Stage::stage_id(idx),
                    name,
                    entries,
                }
            })
            .collect();
        record_rows(operations.len());

        let relationships = build_relationships(&stages);

        let model = WorkflowModel {
            stages,
            relationships,
            employees: staff.to_vec(),
            parts: parts.to_vec(),
        };

        info!(
            stages = model.stages.len(),
            entries = model.entry_count(),
            "工艺流程聚合完成"
        );
        model
    }
}

/// 便捷入口
pub fn aggregate(
    operations: &[OperationRecord],
    staff: &[StaffRecord],
    parts: &[PartRecord],
) -> WorkflowModel {
    WorkflowAggregator::new().aggregate(operations, staff, parts)
}

/// 由已构建的阶段生成反向索引
fn build_relationships(stages: &[Stage]) -> Relationships {
    let mut employee_workstations: BTreeMap<String, Vec<WorkstationNumber>> = BTreeMap::new();
    let mut part_workstations: BTreeMap<String, Vec<WorkstationNumber>> = BTreeMap::new();
    let mut stage_workstations: IndexMap<String, Vec<WorkstationNumber>> = IndexMap::new();

    for stage in stages {
        let sequence = stage_workstations.entry(stage.name.clone()).or_default();
        for entry in &stage.entries {
            sequence.push(entry.workstation);
            for employee in &entry.employees {
                employee_workstations
                    .entry(employee.employee_id.clone())
                    .or_default()
                    .push(entry.workstation);
            }
            for part in &entry.parts {
                part_workstations
                    .entry(part.reference.clone())
                    .or_default()
                    .push(entry.workstation);
            }
        }
    }

    for list in employee_workstations
        .values_mut()
        .chain(part_workstations.values_mut())
    {
        list.sort();
        list.dedup();
    }

    Relationships {
        employee_workstations,
        part_workstations,
        stage_workstations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_fixture() -> Vec<StaffRecord> {
        vec![
            StaffRecord::new("E1")
                .named("Alice", "Martin")
                .with_qualification("Mécanicien")
                .assigned_to("Poste 1"),
            StaffRecord::new("E2")
                .named("Bruno", "Petit")
                .assigned_to("Poste 2"),
            StaffRecord::new("E3")
                .named("Chloé", "Durand")
                .assigned_to("Poste 1"),
        ]
    }

    #[test]
    fn test_extract_stages_first_seen_order() {
        let ops = vec![
            OperationRecord::new("Test", 3, 2),
            OperationRecord::new("Assembly", 1, 3),
            OperationRecord::new("Test", 4, 4),
        ];

        let stages: Vec<String> = extract_stages(&ops).into_iter().collect();
        assert_eq!(stages, vec!["Test".to_string(), "Assembly".to_string()]);
    }

    #[test]
    fn test_aggregate_follows_extracted_stage_order() {
        let ops = vec![
            OperationRecord::new("Test", 3, 2),
            OperationRecord::new("Assembly", 1, 3),
            OperationRecord::new("Test", 4, 4),
            OperationRecord::new("Paint", 5, 5),
        ];

        let model = aggregate(&ops, &[], &[]);

        let expected: Vec<String> = extract_stages(&ops).into_iter().collect();
        let names: Vec<String> = model.stages.iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, expected);
        let test_stage = model.stage_by_name("Test").unwrap();
        assert_eq!(test_stage.id, "stage_0");
        let postes: Vec<u32> = test_stage.entries.iter().map(|e| e.workstation.0).collect();
        assert_eq!(postes, vec![3, 4]);
        assert!(model.stage_by_name("Absent").is_none());
    }

    #[test]
    fn test_assembly_test_scenario() {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2),
            OperationRecord::new("Assembly", 2, 3),
            OperationRecord::new("Test", 3, 4),
        ];
        let staff = staff_fixture();

        let model = aggregate(&ops, &staff, &[]);

        assert_eq!(model.stages.len(), 2);
        assert_eq!(model.stages[0].id, "stage_0");
        assert_eq!(model.stages[0].name, "Assembly");
        assert_eq!(model.stages[0].entries.len(), 2);
        assert_eq!(model.stages[1].id, "stage_1");
        assert_eq!(model.stages[1].name, "Test");

        let first = &model.stages[0].entries[0];
        let ids: Vec<&str> = first.employees.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["E1", "E3"]);

        // Poste 3 在 ERP 中无人 → 空列表
        assert!(model.stages[1].entries[0].employees.is_empty());
    }

    #[test]
    fn test_unmatched_reference_has_no_parts() {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2).with_reference("PN-404"),
            OperationRecord::new("Assembly", 2, 3),
        ];
        let parts = vec![PartRecord::new("PN-100").with_quantity(4.0)];

        let model = aggregate(&ops, &[], &parts);

        let unmatched = &model.stages[0].entries[0];
        let absent = &model.stages[0].entries[1];
        assert_eq!(unmatched.reference.as_deref(), Some("PN-404"));
        assert!(!unmatched.has_part());
        assert!(!absent.has_part());

        let a = serde_json::to_value(unmatched).unwrap();
        let b = serde_json::to_value(absent).unwrap();
        assert!(a.get("pieces").is_none());
        assert!(b.get("pieces").is_none());
    }

    #[test]
    fn test_duplicate_part_rows_all_attached() {
        let ops = vec![OperationRecord::new("Assembly", 1, 2).with_reference("PN-1")];
        let parts = vec![
            PartRecord::new("PN-1").with_supplier("Safran"),
            PartRecord::new("PN-2"),
            PartRecord::new("PN-1").with_supplier("Thales"),
        ];

        let model = aggregate(&ops, &[], &parts);
        let suppliers: Vec<Option<&str>> = model.stages[0].entries[0]
            .parts
            .iter()
            .map(|p| p.supplier.as_deref())
            .collect();
        assert_eq!(suppliers, vec![Some("Safran"), Some("Thales")]);
    }

    #[test]
    fn test_one_entry_per_operation_row() {
        let ops = vec![
            OperationRecord::new("Assembly", 1, 2),
            OperationRecord::new("Assembly", 1, 3),
            OperationRecord::new("Paint", 5, 4),
            OperationRecord::new("Assembly", 2, 5),
        ];

        let model = aggregate(&ops, &staff_fixture(), &[]);

        assert_eq!(model.entry_count(), ops.len());
        let assembly: Vec<u32> = model.stages[0].entries.iter().map(|e| e.workstation.0).collect();
        assert_eq!(assembly, vec![1, 1, 2]);
    }

    #[test]
    fn test_empty_staff_table() {
        let ops = vec![OperationRecord::new("Assembly", 1, 2)];
        let model = aggregate(&ops, &[], &[]);

        assert_eq!(model.entry_count(), 1);
        assert!(model.stages[0].entries[0].employees.is_empty());
        assert!(model.employees.is_empty());
    }

    #[test]
    fn test_relationships() {
        let ops = vec![
            OperationRecord::new("Assembly", 2, 2).with_reference("PN-1"),
            OperationRecord::new("Assembly", 1, 3).with_reference("PN-1"),
            OperationRecord::new("Test", 1, 4),
        ];
        let parts = vec![PartRecord::new("PN-1")];

        let model = aggregate(&ops, &staff_fixture(), &parts);
        let rel = &model.relationships;

        assert_eq!(
            rel.employee_workstations["E1"],
            vec![WorkstationNumber(1)]
        );
        assert_eq!(
            rel.part_workstations["PN-1"],
            vec![WorkstationNumber(1), WorkstationNumber(2)]
        );
        assert_eq!(
            rel.stage_workstations["Assembly"],
            vec![WorkstationNumber(2), WorkstationNumber(1)]
        );
        assert_eq!(
            rel.employee_workstations["E2"],
            vec![WorkstationNumber(2)]
        );
    }
}
