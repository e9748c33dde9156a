// ==========================================
// 梳棉机保养跟踪系统 - 会话存储
// ==========================================
// 存储: JSON 文件 (会话列表 + 当前令牌)
// 令牌: UUID v4; 过期: UTC 时间戳, 访问时惰性清理
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::user_registry::UserRegistry;
use crate::domain::types::UserRole;

/// 单个会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub user: String,
    pub role: UserRole,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// 会话文件的磁盘布局
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    sessions: Vec<Session>,
    /// 本机当前登录令牌 (CLI 单用户现场的便利字段)
    current: Option<Uuid>,
}

/// 会话存储
pub struct SessionStore {
    path: PathBuf,
    lifetime: Duration,
}

impl SessionStore {
    /// # 参数
    /// - path: 会话 JSON 文件路径
    /// - lifetime_hours: 会话有效期 (小时)
    pub fn new(path: impl Into<PathBuf>, lifetime_hours: i64) -> Self {
        Self {
            path: path.into(),
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件不存在或损坏按空会话集处理
    ///
    /// 会话是便利状态, 文件损坏的代价只是重新登录,
    /// 这里不把解析失败升级为错误
    fn load_file(&self) -> SessionFile {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "会话文件损坏, 已重置");
                SessionFile::default()
            }),
            Err(_) => SessionFile::default(),
        }
    }

    fn save_file(&self, file: &SessionFile) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(file)?)?;
        Ok(())
    }

    /// 登录: 校验口令, 签发会话并设为当前
    pub fn login(
        &self,
        registry: &UserRegistry,
        name: &str,
        password: &str,
    ) -> AuthResult<Session> {
        let user = registry.verify(name, password)?;

        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            user: user.name.clone(),
            role: user.role,
            issued_at: now,
            expires_at: now + self.lifetime,
        };

        let mut file = self.load_file();
        file.sessions.retain(|s| !s.is_expired(now));
        file.sessions.push(session.clone());
        file.current = Some(session.token);
        self.save_file(&file)?;

        tracing::info!(user = %session.user, expires_at = %session.expires_at, "登录成功");
        Ok(session)
    }

    /// 注销当前会话
    pub fn logout(&self) -> AuthResult<()> {
        let mut file = self.load_file();
        if let Some(token) = file.current.take() {
            file.sessions.retain(|s| s.token != token);
        }
        self.save_file(&file)
    }

    /// 按令牌解析会话
    ///
    /// # 返回
    /// - Err(SessionNotFound): 令牌不存在
    /// - Err(SessionExpired): 令牌存在但已过期 (同时被清理)
    pub fn resolve(&self, token: Uuid) -> AuthResult<Session> {
        let now = Utc::now();
        let mut file = self.load_file();

        let session = file
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned()
            .ok_or(AuthError::SessionNotFound)?;

        if session.is_expired(now) {
            file.sessions.retain(|s| !s.is_expired(now));
            if file.current == Some(token) {
                file.current = None;
            }
            self.save_file(&file)?;
            return Err(AuthError::SessionExpired(session.user));
        }

        Ok(session)
    }

    /// 当前有效会话 (无/过期 -> None)
    pub fn current_session(&self) -> Option<Session> {
        let token = self.load_file().current?;
        self.resolve(token).ok()
    }

    /// 清理全部过期会话, 返回清理条数
    pub fn purge_expired(&self) -> AuthResult<usize> {
        let now = Utc::now();
        let mut file = self.load_file();
        let before = file.sessions.len();
        file.sessions.retain(|s| !s.is_expired(now));
        if let Some(token) = file.current {
            if !file.sessions.iter().any(|s| s.token == token) {
                file.current = None;
            }
        }
        self.save_file(&file)?;
        Ok(before - file.sessions.len())
    }
}
