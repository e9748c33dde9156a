// ==========================================
// 梳棉机保养跟踪系统 - 身份提供者
// ==========================================
// 对账核心与编辑接口只通过这三个只读问题
// 了解调用者身份, 不触碰会话文件
// ==========================================

use chrono::{DateTime, Utc};

use crate::auth::session::SessionStore;

/// 身份提供者契约
pub trait IdentityProvider: Send + Sync {
    /// 当前登录用户名 (未登录/已过期 -> None)
    fn current_user(&self) -> Option<String>;

    /// 当前用户是否具备编辑权限
    fn is_privileged(&self) -> bool;

    /// 当前会话过期时间
    fn session_expires_at(&self) -> Option<DateTime<Utc>>;
}

/// 基于会话存储的身份提供者
pub struct SessionIdentityProvider {
    store: SessionStore,
}

impl SessionIdentityProvider {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

impl IdentityProvider for SessionIdentityProvider {
    fn current_user(&self) -> Option<String> {
        self.store.current_session().map(|s| s.user)
    }

    fn is_privileged(&self) -> bool {
        self.store
            .current_session()
            .map(|s| s.role.is_privileged())
            .unwrap_or(false)
    }

    fn session_expires_at(&self) -> Option<DateTime<Utc>> {
        self.store.current_session().map(|s| s.expires_at)
    }
}

/// 固定身份提供者 (测试与无人值守脚本用)
pub struct StaticIdentityProvider {
    user: Option<String>,
    privileged: bool,
}

impl StaticIdentityProvider {
    pub fn new(user: Option<String>, privileged: bool) -> Self {
        Self { user, privileged }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn session_expires_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}
