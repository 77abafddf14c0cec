// ==========================================
// AirPlus 工艺流程聚合 - 领域类型定义
// ==========================================
// 职责: 工位号、工时等值类型
// 红线: 缺失值一律用 Option 表达,不使用哨兵字符串
// ==========================================

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ==========================================
// 工位号 (Workstation Number)
// ==========================================
// MES 中为纯数字,ERP 中为 "Poste <N>" 格式
// 两者之间的转换见 engine::join_key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkstationNumber(pub u32);

impl WorkstationNumber {
    pub fn value(self) -> u32 {
        self.0
    }

    /// 从单元格文本解析工位号
    ///
    /// 接受整数文本,以及 Excel 数值单元格导出的整值浮点（"3.0"）。
    /// 非数字、负数、带小数部分的值一律返回 None，由调用方报告 DataError。
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<u32>() {
            return Some(Self(n));
        }

        let f = trimmed.parse::<f64>().ok()?;
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
            Some(Self(f as u32))
        } else {
            None
        }
    }
}

impl fmt::Display for WorkstationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkstationNumber {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

// ==========================================
// 工时 (Work Duration)
// ==========================================
// 内部以秒存储; 序列化为 "HH:MM:SS"（小时可超过 24）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WorkDuration {
    seconds: u32,
}

impl WorkDuration {
    const SECONDS_PER_DAY: f64 = 86_400.0;

    pub fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            seconds: hours
                .saturating_mul(3600)
                .saturating_add(minutes.saturating_mul(60))
                .saturating_add(seconds),
        }
    }

    /// 超出 u32 秒数范围时返回 None
    pub fn try_from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        let seconds = hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?;
        Some(Self { seconds })
    }

    /// Excel 时间单元格以"天的小数"存储（0.0625 = 1h30m）
    pub fn from_day_fraction(days: f64) -> Option<Self> {
        if !days.is_finite() || days < 0.0 {
            return None;
        }
        let seconds = (days * Self::SECONDS_PER_DAY).round();
        if seconds > u32::MAX as f64 {
            return None;
        }
        Some(Self {
            seconds: seconds as u32,
        })
    }

    /// 解析工时文本
    ///
    /// 支持格式:
    /// - "HH:MM:SS" / "HH:MM"（小时可 >= 24）
    /// - 数值（Excel 天小数,如 "0.0625"）
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.contains(':') {
            // 24 小时以内走 chrono,超出部分手工拆分
            if let Ok(t) = NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
            {
                return Some(Self::from_seconds(t.num_seconds_from_midnight()));
            }
            return Self::parse_long_clock(trimmed);
        }

        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Self::from_day_fraction)
    }

    fn parse_long_clock(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split(':').collect();
        let (h, m, s) = match parts.as_slice() {
            [h, m] => (*h, *m, "0"),
            [h, m, s] => (*h, *m, *s),
            _ => return None,
        };

        let hours = h.trim().parse::<u32>().ok()?;
        let minutes = m.trim().parse::<u32>().ok()?;
        let seconds = s.trim().parse::<u32>().ok()?;
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        Self::try_from_hms(hours, minutes, seconds)
    }

    pub fn as_seconds(&self) -> u32 {
        self.seconds
    }

    /// 整分钟数（秒数截断）
    pub fn whole_minutes(&self) -> u32 {
        self.seconds / 60
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl Serialize for WorkDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WorkDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WorkDuration::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("无效的工时格式: {}", raw)))
    }
}
