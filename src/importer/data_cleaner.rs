// ==========================================
// AirPlus 工艺流程聚合 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化
// 红线: 源表中的空值标记只在这里转换为 None,下游不再判断哨兵值
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 视为"缺失"的源值（大小写不敏感）
    ///
    /// 空串与纯空白在 trim 后为空; "nan" 来自 pandas 导出的 CSV;
    /// "#N/A" 来自 Excel 公式错误另存的文本。
    const NULL_MARKERS: &'static [&'static str] = &["nan", "#n/a", "null"];

    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    pub fn is_null_marker(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || Self::NULL_MARKERS
                .iter()
                .any(|m| trimmed.eq_ignore_ascii_case(m))
    }

    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            if self.is_null_marker(v) {
                None
            } else {
                Some(self.clean_text(v))
            }
        })
    }

    /// 数值文本清洗: 去除千分位空格,法式小数逗号转为点
    pub fn clean_number(&self, value: &str) -> String {
        value
            .trim()
            .replace(['\u{a0}', '\u{202f}', ' '], "")
            .replace(',', ".")
    }
}
