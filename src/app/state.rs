// ==========================================
// 梳棉机保养跟踪系统 - 应用状态
// ==========================================
// 职责: 按配置装配存储、身份、同步与 API 实例
// ==========================================

use std::sync::Arc;

use crate::api::{EditApi, LookupApi};
use crate::auth::error::AuthResult;
use crate::auth::identity::SessionIdentityProvider;
use crate::auth::session::SessionStore;
use crate::auth::user_registry::UserRegistry;
use crate::config::settings::AppConfig;
use crate::store::csv_store::CsvTableStore;
use crate::store::table_store_trait::TableStore;
use crate::sync::remote::{HttpRemoteSync, NoopRemoteSync, RemoteSync};

/// 应用状态
///
/// 持有全部 API 实例与共享资源
pub struct AppState {
    /// 系统配置
    pub config: AppConfig,

    /// 表存储
    pub store: Arc<dyn TableStore>,

    /// 远程同步
    pub sync: Arc<dyn RemoteSync>,

    /// 查询 API
    pub lookup_api: Arc<LookupApi>,

    /// 编辑 API
    pub edit_api: Arc<EditApi>,
}

impl AppState {
    /// 按配置装配应用状态
    pub fn new(config: AppConfig) -> Self {
        crate::i18n::set_locale(&config.locale);

        let store: Arc<dyn TableStore> =
            Arc::new(CsvTableStore::new(config.data_dir.clone()));

        let sync: Arc<dyn RemoteSync> = match &config.remote_url {
            Some(url) => Arc::new(HttpRemoteSync::new(url.clone(), config.data_dir.clone())),
            None => Arc::new(NoopRemoteSync),
        };

        let identity = Arc::new(SessionIdentityProvider::new(Self::build_session_store(
            &config,
        )));

        let lookup_api = Arc::new(LookupApi::new(Arc::clone(&store), &config));
        let edit_api = Arc::new(EditApi::new(
            Arc::clone(&store),
            identity,
            Arc::clone(&sync),
            &config,
        ));

        Self {
            config,
            store,
            sync,
            lookup_api,
            edit_api,
        }
    }

    fn build_session_store(config: &AppConfig) -> SessionStore {
        SessionStore::new(config.session_file.clone(), config.session_lifetime_hours)
    }

    /// 会话存储句柄 (路径 + 有效期, 可随手构造)
    pub fn session_store(&self) -> SessionStore {
        Self::build_session_store(&self.config)
    }

    /// 装载用户注册表
    pub fn user_registry(&self) -> AuthResult<UserRegistry> {
        UserRegistry::load(self.config.users_file.clone())
    }
}
