// ==========================================
// 梳棉机保养跟踪系统 - API 层错误类型
// ==========================================
// 职责: 把存储/身份层错误转换为面向用户的错误
// 区分: 结构性缺失 (MissingTable) 是错误;
//       合法空结果在响应体内表达, 不走错误通道
// ==========================================

use thiserror::Error;

use crate::auth::error::AuthError;
use crate::store::error::StoreError;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 输入校验 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ===== 结构性缺失 =====
    #[error("缺少数据表: {0}")]
    MissingTable(String),

    // ===== 权限/会话 =====
    #[error("未登录")]
    NotAuthenticated,

    #[error("当前用户无编辑权限 (user: {0})")]
    PermissionDenied(String),

    #[error("会话已过期 (user: {0})")]
    SessionExpired(String),

    // ===== 底层透传 =====
    #[error("存储错误: {0}")]
    Store(String),

    #[error("身份错误: {0}")]
    Auth(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingTable(name) => ApiError::MissingTable(name),
            other => ApiError::Store(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SessionNotFound => ApiError::NotAuthenticated,
            AuthError::SessionExpired(user) => ApiError::SessionExpired(user),
            AuthError::NotPrivileged => ApiError::PermissionDenied("-".to_string()),
            other => ApiError::Auth(other.to_string()),
        }
    }
}

/// API 层结果类型
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_maps_to_dedicated_variant() {
        let err: ApiError = StoreError::MissingTable("Card9".to_string()).into();
        assert!(matches!(err, ApiError::MissingTable(name) if name == "Card9"));
    }

    #[test]
    fn test_session_errors_map() {
        let err: ApiError = AuthError::SessionNotFound.into();
        assert!(matches!(err, ApiError::NotAuthenticated));

        let err: ApiError = AuthError::SessionExpired("ahmed".to_string()).into();
        assert!(matches!(err, ApiError::SessionExpired(user) if user == "ahmed"));
    }
}
