// ==========================================
// AirPlus 工艺流程聚合 - 源表列定义
// ==========================================
// 列名逐字匹配（含重音符号与空格）
// REQUIRED: 缺任一列即 SchemaError; 其余为补充列,缺列时字段为 None
// ==========================================

/// MES 工序日志
pub mod mes {
    pub const WORKSTATION: &str = "Poste";
    pub const STAGE_NAME: &str = "Nom";
    pub const REFERENCE: &str = "Référence";
    pub const PLANNED_DURATION: &str = "Temps Prévu";
    pub const ACTUAL_DURATION: &str = "Temps Réel";
    pub const INCIDENT: &str = "Aléas Industriels";
    pub const PROBABLE_CAUSE: &str = "Cause Potentielle";

    pub const REQUIRED: &[&str] = &[
        WORKSTATION,
        STAGE_NAME,
        REFERENCE,
        PLANNED_DURATION,
        ACTUAL_DURATION,
        INCIDENT,
        PROBABLE_CAUSE,
    ];
}

/// ERP 人员名册
pub mod erp {
    pub const EMPLOYEE_ID: &str = "Matricule";
    pub const FIRST_NAME: &str = "Prénom";
    pub const LAST_NAME: &str = "Nom";
    pub const QUALIFICATION: &str = "Qualification";
    pub const WORKSTATION_ASSIGNMENT: &str = "Poste de montage";

    // 补充列
    pub const HOURLY_COST: &str = "Coût horaire (€)";

    pub const REQUIRED: &[&str] = &[
        EMPLOYEE_ID,
        FIRST_NAME,
        LAST_NAME,
        QUALIFICATION,
        WORKSTATION_ASSIGNMENT,
    ];
}

/// PLM 物料清单
pub mod plm {
    pub const REFERENCE: &str = "Code / Référence";
    pub const DESCRIPTION: &str = "Désignation";
    pub const QUANTITY: &str = "Quantité";
    pub const SUPPLIER: &str = "Fournisseur";

    // 补充列
    pub const CRITICALITY: &str = "Criticité";
    pub const UNIT_COST: &str = "Coût achat pièce (€)";
    pub const LEAD_TIME: &str = "Délai Approvisionnement";

    pub const REQUIRED: &[&str] = &[REFERENCE, DESCRIPTION, QUANTITY, SUPPLIER];
}

/// 分析结果表（独立产出,全部列可选）
pub mod analysis {
    pub const TOTAL_COST: &str = "Coût total (€)";
    pub const DELAY_HOURS: &str = "Retard (h)";
    pub const WORKSTATION: &str = "Poste";
}
