// ==========================================
// 梳棉机保养跟踪系统 - 身份层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 身份层错误类型
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("用户不存在: {0}")]
    UserNotFound(String),

    #[error("用户名或口令错误")]
    InvalidCredentials,

    #[error("用户已存在: {0}")]
    UserAlreadyExists(String),

    #[error("没有活动会话")]
    SessionNotFound,

    #[error("会话已过期 (user: {0})")]
    SessionExpired(String),

    #[error("当前用户无编辑权限")]
    NotPrivileged,

    #[error("会话文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("会话文件解析失败: {0}")]
    Serde(#[from] serde_json::Error),
}

/// 身份层结果类型
pub type AuthResult<T> = Result<T, AuthError>;
