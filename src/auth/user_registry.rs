// ==========================================
// 梳棉机保养跟踪系统 - 用户注册表
// ==========================================
// 存储: JSON 文件; 口令仅存 SHA-256 摘要
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::auth::error::{AuthError, AuthResult};
use crate::domain::types::UserRole;

/// 用户记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub password_sha256: String,
    pub role: UserRole,
}

/// 用户注册表
pub struct UserRegistry {
    path: PathBuf,
    users: Vec<UserRecord>,
}

impl UserRegistry {
    /// 从 JSON 文件装载注册表
    ///
    /// 文件不存在按空注册表处理 (首次启动)
    pub fn load(path: impl Into<PathBuf>) -> AuthResult<Self> {
        let path = path.into();
        let users = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        Ok(Self { path, users })
    }

    /// 写回 JSON 文件
    pub fn save(&self) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.users)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// 新增用户 (重名报错)
    pub fn add_user(&mut self, name: &str, password: &str, role: UserRole) -> AuthResult<()> {
        if self.users.iter().any(|u| u.name == name) {
            return Err(AuthError::UserAlreadyExists(name.to_string()));
        }
        self.users.push(UserRecord {
            name: name.to_string(),
            password_sha256: digest(password),
            role,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.name == name)
    }

    /// 校验用户名与口令
    ///
    /// # 返回
    /// - Ok: 命中的用户记录
    /// - Err(InvalidCredentials): 用户不存在或口令不符
    ///   (两种情况不区分, 避免泄露用户是否存在)
    pub fn verify(&self, name: &str, password: &str) -> AuthResult<&UserRecord> {
        self.users
            .iter()
            .find(|u| u.name == name && u.password_sha256 == digest(password))
            .ok_or(AuthError::InvalidCredentials)
    }
}

/// 口令 SHA-256 摘要 (十六进制小写)
fn digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
