// ==========================================
// 梳棉机保养跟踪系统 - 领域类型定义
// ==========================================
// 视图模式对应查询页面的五个档位选择
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 视图模式 (View Mode)
// ==========================================
// 决定按当前吨数选取哪些保养档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    CurrentOnly, // 仅当前档位
    AllLower,    // 所有更低档位
    AllHigher,   // 所有更高档位
    CustomRange, // 自定义吨数范围
    All,         // 全部档位
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::CurrentOnly => write!(f, "CURRENT_ONLY"),
            ViewMode::AllLower => write!(f, "ALL_LOWER"),
            ViewMode::AllHigher => write!(f, "ALL_HIGHER"),
            ViewMode::CustomRange => write!(f, "CUSTOM_RANGE"),
            ViewMode::All => write!(f, "ALL"),
        }
    }
}

impl ViewMode {
    /// 从命令行/配置字符串解析视图模式
    ///
    /// 接受大小写不敏感的 current/lower/higher/custom/all
    pub fn parse(value: &str) -> Option<ViewMode> {
        match value.trim().to_lowercase().as_str() {
            "current" | "current_only" => Some(ViewMode::CurrentOnly),
            "lower" | "all_lower" => Some(ViewMode::AllLower),
            "higher" | "all_higher" => Some(ViewMode::AllHigher),
            "custom" | "custom_range" => Some(ViewMode::CustomRange),
            "all" => Some(ViewMode::All),
            _ => None,
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// 权限模型: 两级, 编辑操作仅限 Admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,  // 管理员, 可编辑记录
    Viewer, // 查询用户, 只读
}

impl UserRole {
    /// 是否具备编辑权限
    pub fn is_privileged(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Viewer => write!(f, "VIEWER"),
        }
    }
}
