// ==========================================
// AirPlus 工艺流程聚合 - 工位关联键
// ==========================================
// MES 的工位号是整数,ERP 的装配工位是 "Poste <N>" 文本。
// 两边只通过这里的格式化函数关联,不做其它归一化。
// ==========================================

use crate::domain::types::WorkstationNumber;

const KEY_PREFIX: &str = "Poste";

/// 工位号 → ERP 装配工位键
///
/// 例: 3 → "Poste 3"
pub fn workstation_key(workstation: WorkstationNumber) -> String {
    format!("{} {}", KEY_PREFIX, workstation.0)
}

/// ERP 装配工位键 → 工位号（容忍首尾空白）
///
/// "Poste 3" / "  Poste 3 " → Some(3); 其它格式 → None
pub fn parse_workstation_key(key: &str) -> Option<WorkstationNumber> {
    let rest = key.trim().strip_prefix(KEY_PREFIX)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    rest.trim().parse::<u32>().ok().map(WorkstationNumber)
}
