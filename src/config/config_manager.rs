// ==========================================
// AirPlus 工艺流程聚合 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 扁平 JSON 键值文件（{"source.mes_path": "..."}）
// 优先级: 命令行覆写 > 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::workflow_config_trait::{RowErrorPolicy, WorkflowConfigReader};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置键
pub mod config_keys {
    pub const MES_PATH: &str = "source.mes_path";
    pub const ERP_PATH: &str = "source.erp_path";
    pub const PLM_PATH: &str = "source.plm_path";
    pub const ROW_ERROR_POLICY: &str = "import.row_error_policy";
    pub const EXPORT_PATH: &str = "export.output_path";
    pub const ANALYSIS_RESULTS_PATH: &str = "analysis.results_path";
    pub const RANKING_LIMIT: &str = "analysis.ranking_limit";
    pub const WORKFLOW_HTML_PATH: &str = "server.workflow_html_path";
    pub const BIND_ADDR: &str = "server.bind_addr";

    pub const ALL: &[&str] = &[
        MES_PATH,
        ERP_PATH,
        PLM_PATH,
        ROW_ERROR_POLICY,
        EXPORT_PATH,
        ANALYSIS_RESULTS_PATH,
        RANKING_LIMIT,
        WORKFLOW_HTML_PATH,
        BIND_ADDR,
    ];
}

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "AIRPLUS_WORKFLOW_CONFIG";

/// 单项覆写的环境变量前缀（source.mes_path → AIRPLUS_WORKFLOW_SOURCE_MES_PATH）
const ENV_PREFIX: &str = "AIRPLUS_WORKFLOW_";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    FormatError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

fn default_value(key: &str) -> Option<&'static str> {
    use config_keys::*;
    match key {
        MES_PATH => Some("data/MES_Extraction.xlsx"),
        ERP_PATH => Some("data/ERP_Equipes Airplus.xlsx"),
        PLM_PATH => Some("data/PLM_DataSet.xlsx"),
        ROW_ERROR_POLICY => Some("skip"),
        EXPORT_PATH => Some("workflow_data.json"),
        ANALYSIS_RESULTS_PATH => Some("data/AirPlus_Analysis_Results.xlsx"),
        RANKING_LIMIT => Some("6"),
        WORKFLOW_HTML_PATH => Some("react_flow/workflow.html"),
        BIND_ADDR => Some("0.0.0.0:8502"),
        _ => None,
    }
}

fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key.replace('.', "_").to_uppercase())
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    file_values: HashMap<String, String>,
    overrides: HashMap<String, String>,
    origin: Option<PathBuf>,
}

impl ConfigManager {
    /// 从配置文件加载
    ///
    /// 文件不存在时使用默认值,不视为错误。
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在,使用默认配置");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let file_values = Self::parse_flat_json(&raw).map_err(|message| {
            ConfigError::FormatError {
                path: path.display().to_string(),
                message,
            }
        })?;

        debug!(path = %path.display(), keys = file_values.len(), "配置文件已加载");
        Ok(Self {
            file_values,
            overrides: HashMap::new(),
            origin: Some(path.to_path_buf()),
        })
    }

    /// 从默认位置加载（见 get_default_config_path）
    pub fn from_default_location() -> Result<Self, ConfigError> {
        Self::new(get_default_config_path())
    }

    /// 直接以键值构造（测试/嵌入场景）
    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            file_values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            overrides: HashMap::new(),
            origin: None,
        }
    }

    fn parse_flat_json(raw: &str) -> Result<HashMap<String, String>, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let object = value
            .as_object()
            .ok_or_else(|| "顶层必须是 JSON 对象".to_string())?;

        let mut values = HashMap::new();
        for (key, v) in object {
            let text = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                _ => return Err(format!("键 {} 的值必须是标量", key)),
            };
            values.insert(key.clone(), text);
        }
        Ok(values)
    }

    /// 设置运行期覆写（命令行参数）
    pub fn set_override(&mut self, key: &str, value: impl Into<String>) {
        self.overrides.insert(key.to_string(), value.into());
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// 读取配置值（覆写 > 环境变量 > 文件）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 未配置（调用方使用默认值）
    pub fn get_config_value(&self, key: &str) -> Option<String> {
        if let Some(v) = self.overrides.get(key) {
            return Some(v.clone());
        }
        if let Ok(v) = std::env::var(env_var_name(key)) {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        self.file_values.get(key).cloned()
    }

    fn get_config_or_default(&self, key: &str) -> String {
        self.get_config_value(key)
            .or_else(|| default_value(key).map(str::to_string))
            .unwrap_or_default()
    }

    /// 生效配置快照（JSON）
    ///
    /// 用于运行日志,记录本次运行实际使用的配置。
    pub fn get_config_snapshot(&self) -> String {
        let snapshot: BTreeMap<&str, String> = config_keys::ALL
            .iter()
            .map(|key| (*key, self.get_config_or_default(key)))
            .collect();
        serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string())
    }
}

impl WorkflowConfigReader for ConfigManager {
    fn mes_path(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::MES_PATH))
    }

    fn erp_path(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::ERP_PATH))
    }

    fn plm_path(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::PLM_PATH))
    }

    fn row_error_policy(&self) -> Result<RowErrorPolicy, ConfigError> {
        self.get_config_or_default(config_keys::ROW_ERROR_POLICY)
            .parse()
    }

    fn export_path(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::EXPORT_PATH))
    }

    fn analysis_results_path(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::ANALYSIS_RESULTS_PATH))
    }

    fn ranking_limit(&self) -> Result<usize, ConfigError> {
        let raw = self.get_config_or_default(config_keys::RANKING_LIMIT);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidValue {
                key: config_keys::RANKING_LIMIT.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            })
    }

    fn workflow_html_path(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(config_keys::WORKFLOW_HTML_PATH))
    }

    fn bind_addr(&self) -> String {
        self.get_config_or_default(config_keys::BIND_ADDR)
    }
}

/// 默认配置文件路径
///
/// 顺序: 环境变量 AIRPLUS_WORKFLOW_CONFIG → 用户配置目录 → 当前目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let local = PathBuf::from("./airplus_workflow.json");
    if local.exists() {
        return local;
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("airplus-workflow").join("config.json"),
        None => local,
    }
}
