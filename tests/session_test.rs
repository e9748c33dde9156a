// ==========================================
// 身份层集成测试
// ==========================================
// 职责: 用户注册表持久化 + 会话生命周期 +
//       身份提供者三个只读问题
// ==========================================

use carding_mts::auth::identity::{IdentityProvider, SessionIdentityProvider};
use carding_mts::auth::session::SessionStore;
use carding_mts::auth::user_registry::UserRegistry;
use carding_mts::domain::types::UserRole;

// ==========================================
// 测试辅助函数
// ==========================================

fn create_registry(dir: &std::path::Path) -> UserRegistry {
    let mut registry = UserRegistry::load(dir.join("users.json")).unwrap();
    registry.add_user("admin1", "secret", UserRole::Admin).unwrap();
    registry.add_user("viewer1", "secret", UserRole::Viewer).unwrap();
    registry.save().unwrap();
    registry
}

#[test]
fn test_registry_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    create_registry(dir.path());

    let reloaded = UserRegistry::load(dir.path().join("users.json")).unwrap();
    assert_eq!(reloaded.user_count(), 2);
    assert!(reloaded.verify("admin1", "secret").is_ok());
    assert!(reloaded.verify("admin1", "wrong").is_err());
}

#[test]
fn test_identity_provider_for_admin_session() {
    let dir = tempfile::tempdir().unwrap();
    let registry = create_registry(dir.path());
    let store = SessionStore::new(dir.path().join("sessions.json"), 8);

    store.login(&registry, "admin1", "secret").unwrap();

    let identity = SessionIdentityProvider::new(SessionStore::new(
        dir.path().join("sessions.json"),
        8,
    ));
    assert_eq!(identity.current_user(), Some("admin1".to_string()));
    assert!(identity.is_privileged());
    assert!(identity.session_expires_at().is_some());
}

#[test]
fn test_identity_provider_for_viewer_session() {
    let dir = tempfile::tempdir().unwrap();
    let registry = create_registry(dir.path());
    let store = SessionStore::new(dir.path().join("sessions.json"), 8);

    store.login(&registry, "viewer1", "secret").unwrap();

    let identity = SessionIdentityProvider::new(store);
    assert_eq!(identity.current_user(), Some("viewer1".to_string()));
    assert!(!identity.is_privileged());
}

#[test]
fn test_identity_provider_without_session() {
    let dir = tempfile::tempdir().unwrap();
    let identity = SessionIdentityProvider::new(SessionStore::new(
        dir.path().join("sessions.json"),
        8,
    ));

    assert_eq!(identity.current_user(), None);
    assert!(!identity.is_privileged());
    assert_eq!(identity.session_expires_at(), None);
}

#[test]
fn test_expired_session_yields_no_identity() {
    let dir = tempfile::tempdir().unwrap();
    let registry = create_registry(dir.path());
    // 负有效期: 签发即过期
    let store = SessionStore::new(dir.path().join("sessions.json"), -1);

    store.login(&registry, "admin1", "secret").unwrap();

    let identity = SessionIdentityProvider::new(store);
    assert_eq!(identity.current_user(), None);
    assert!(!identity.is_privileged());
}

#[test]
fn test_logout_revokes_identity() {
    let dir = tempfile::tempdir().unwrap();
    let registry = create_registry(dir.path());
    let store = SessionStore::new(dir.path().join("sessions.json"), 8);

    store.login(&registry, "admin1", "secret").unwrap();
    store.logout().unwrap();

    let identity = SessionIdentityProvider::new(store);
    assert_eq!(identity.current_user(), None);
}

#[test]
fn test_purge_expired_counts() {
    let dir = tempfile::tempdir().unwrap();
    let registry = create_registry(dir.path());

    // 登录时也会顺手清理过期会话, 这里只留下最后一个
    let expired_store = SessionStore::new(dir.path().join("sessions.json"), -1);
    expired_store.login(&registry, "admin1", "secret").unwrap();
    expired_store.login(&registry, "viewer1", "secret").unwrap();

    let store = SessionStore::new(dir.path().join("sessions.json"), 8);
    let purged = store.purge_expired().unwrap();
    assert_eq!(purged, 1);
    assert!(store.current_session().is_none());
}
