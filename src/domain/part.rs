// ==========================================
// AirPlus 工艺流程聚合 - PLM 零件记录
// ==========================================
// 来源: PLM_DataSet（物料清单）
// 关联键: Code / Référence ↔ MES Référence
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PartRecord - 零件完整记录（导出 parts 列表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    #[serde(rename = "Code / Référence")]
    pub reference: String,

    #[serde(rename = "Désignation")]
    pub description: Option<String>,

    #[serde(rename = "Quantité")]
    pub quantity: Option<f64>,

    #[serde(rename = "Fournisseur")]
    pub supplier: Option<String>,

    // ===== 补充列（缺列时为 None）=====
    #[serde(rename = "Criticité", default)]
    pub criticality: Option<String>,

    #[serde(rename = "Coût achat pièce (€)", default)]
    pub unit_cost: Option<f64>,

    #[serde(rename = "Délai Approvisionnement", default)]
    pub lead_time: Option<String>,
}

impl PartRecord {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            description: None,
            quantity: None,
            supplier: None,
            criticality: None,
            unit_cost: None,
            lead_time: None,
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_supplier(mut self, supplier: &str) -> Self {
        self.supplier = Some(supplier.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_criticality(mut self, criticality: &str) -> Self {
        self.criticality = Some(criticality.to_string());
        self
    }

    pub fn with_unit_cost(mut self, cost: f64) -> Self {
        self.unit_cost = Some(cost);
        self
    }
}

// ==========================================
// PartRef - 工位条目中挂接的零件（仅保留定义字段）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRef {
    #[serde(rename = "Code / Référence")]
    pub reference: String,

    #[serde(rename = "Désignation")]
    pub description: Option<String>,

    #[serde(rename = "Quantité")]
    pub quantity: Option<f64>,

    #[serde(rename = "Fournisseur")]
    pub supplier: Option<String>,
}

impl From<&PartRecord> for PartRef {
    fn from(record: &PartRecord) -> Self {
        Self {
            reference: record.reference.clone(),
            description: record.description.clone(),
            quantity: record.quantity,
            supplier: record.supplier.clone(),
        }
    }
}
