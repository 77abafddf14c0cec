// ==========================================
// AirPlus 工艺流程聚合 - MES 工序记录
// ==========================================
// 来源: MES_Extraction（每行一道工序）
// 用途: 导入层写入,引擎层只读
// ==========================================

use crate::domain::types::{WorkDuration, WorkstationNumber};
use serde::{Deserialize, Serialize};

// ==========================================
// OperationRecord - 工序记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    // ===== 聚合键 =====
    pub stage_name: String,               // 阶段名称（Nom）
    pub workstation: WorkstationNumber,   // 工位号（Poste）

    // ===== 关联键 =====
    pub part_reference: Option<String>,   // 零件参考号（Référence）

    // ===== 工时 =====
    pub planned_duration: Option<WorkDuration>, // 计划工时（Temps Prévu）
    pub actual_duration: Option<WorkDuration>,  // 实际工时（Temps Réel）

    // ===== 异常 =====
    pub incident: Option<String>,         // 工业异常（Aléas Industriels）
    pub probable_cause: Option<String>,   // 潜在原因（Cause Potentielle）

    // 元信息
    pub row_number: usize,                // 原始文件行号（用于 DQ 报告）
}

impl OperationRecord {
    pub fn new(stage_name: impl Into<String>, workstation: u32, row_number: usize) -> Self {
        Self {
            stage_name: stage_name.into(),
            workstation: WorkstationNumber(workstation),
            part_reference: None,
            planned_duration: None,
            actual_duration: None,
            incident: None,
            probable_cause: None,
            row_number,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.part_reference = Some(reference.into());
        self
    }

    pub fn with_durations(mut self, planned: WorkDuration, actual: WorkDuration) -> Self {
        self.planned_duration = Some(planned);
        self.actual_duration = Some(actual);
        self
    }

    pub fn with_incident(mut self, incident: impl Into<String>) -> Self {
        self.incident = Some(incident.into());
        self
    }
}
