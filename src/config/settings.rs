// ==========================================
// 梳棉机保养跟踪系统 - 系统配置
// ==========================================
// 格式: TOML 文件; 缺失文件按默认值启动
// 默认路径: 平台数据目录下 carding-mts/
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置解析失败: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 系统配置
///
/// metadata_columns 与 delimiters 在这里集中配置后
/// 传入对账引擎, 引擎内不再散落字面量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV 表存储目录
    pub data_dir: PathBuf,

    /// 保养计划表固定名
    pub plan_table: String,

    /// 记录表名前缀 (表名 = 前缀 + 机台号)
    pub card_table_prefix: String,

    /// 元数据列集 (不参与"已做项目"推导)
    pub metadata_columns: Vec<String>,

    /// 复合项目串分隔符集
    pub delimiters: String,

    /// 用户注册表文件
    pub users_file: PathBuf,

    /// 会话文件
    pub session_file: PathBuf,

    /// 会话有效期 (小时)
    pub session_lifetime_hours: i64,

    /// 远程同步地址 (None 即不同步)
    pub remote_url: Option<String>,

    /// 界面语言
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = default_base_dir();
        Self {
            data_dir: base.join("tables"),
            plan_table: "Service_Plan".to_string(),
            card_table_prefix: "Card".to_string(),
            metadata_columns: crate::engine::reconciler::DEFAULT_METADATA_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            delimiters: "+,\n;".to_string(),
            users_file: base.join("users.json"),
            session_file: base.join("sessions.json"),
            session_lifetime_hours: 8,
            remote_url: None,
            locale: "zh-CN".to_string(),
        }
    }
}

impl AppConfig {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        default_base_dir().join("config.toml")
    }

    /// 装载配置; 文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "配置文件不存在, 使用默认配置");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 从默认路径装载
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&Self::default_path())
    }

    /// 写回配置文件
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// 分隔符集 (字符序列)
    pub fn delimiter_chars(&self) -> Vec<char> {
        self.delimiters.chars().collect()
    }

    /// 机台号 -> 记录表名
    pub fn card_table_name(&self, card_no: &str) -> String {
        format!("{}{}", self.card_table_prefix, card_no.trim())
    }
}

/// 平台数据目录下的应用目录
fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carding-mts")
}
