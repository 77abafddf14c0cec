// ==========================================
// AirPlus 工艺流程聚合 - ERP 人员记录
// ==========================================
// 来源: ERP_Equipes（每行一名员工）
// 序列化键沿用源列名,供展示层直接读取
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// StaffRecord - 员工完整记录（导出 employees 列表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
    #[serde(rename = "Matricule")]
    pub employee_id: String,

    #[serde(rename = "Prénom")]
    pub first_name: Option<String>,

    #[serde(rename = "Nom")]
    pub last_name: Option<String>,

    #[serde(rename = "Qualification")]
    pub qualification: Option<String>,

    /// 装配工位,格式 "Poste <N>"（与 MES 工位号格式不同）
    #[serde(rename = "Poste de montage")]
    pub workstation_assignment: Option<String>,

    #[serde(rename = "Coût horaire (€)", default)]
    pub hourly_cost: Option<f64>,
}

impl StaffRecord {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            first_name: None,
            last_name: None,
            qualification: None,
            workstation_assignment: None,
            hourly_cost: None,
        }
    }

    pub fn assigned_to(mut self, key: impl Into<String>) -> Self {
        self.workstation_assignment = Some(key.into());
        self
    }

    pub fn named(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self.last_name = Some(last_name.to_string());
        self
    }

    pub fn with_qualification(mut self, qualification: &str) -> Self {
        self.qualification = Some(qualification.to_string());
        self
    }

    pub fn with_hourly_cost(mut self, cost: f64) -> Self {
        self.hourly_cost = Some(cost);
        self
    }
}

// ==========================================
// StaffRef - 工位条目中挂接的员工（仅保留定义字段）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRef {
    #[serde(rename = "Matricule")]
    pub employee_id: String,

    #[serde(rename = "Prénom")]
    pub first_name: Option<String>,

    #[serde(rename = "Nom")]
    pub last_name: Option<String>,

    #[serde(rename = "Qualification")]
    pub qualification: Option<String>,
}

impl From<&StaffRecord> for StaffRef {
    fn from(record: &StaffRecord) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            qualification: record.qualification.clone(),
        }
    }
}
