// ==========================================
// 梳棉机保养跟踪系统 - 应用层
// ==========================================
// 职责: 装配共享状态, 支撑 CLI 入口
// ==========================================

pub mod state;

use std::path::PathBuf;

pub use state::AppState;

use crate::config::settings::AppConfig;

/// 默认配置文件路径
pub fn get_default_config_path() -> PathBuf {
    AppConfig::default_path()
}
