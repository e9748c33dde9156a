// ==========================================
// 梳棉机保养跟踪系统 - 远程副本同步
// ==========================================
// 现场数据目录是共享工作簿的本地副本; 同步器按
// 表名逐文件拉取/上传, 不做合并, 后写覆盖
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// 同步错误类型
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("远程返回异常状态: {url} -> {status}")]
    BadStatus { url: String, status: u16 },

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;

/// 远程同步契约
///
/// 两个操作都返回触达的文件数; 调用方通常通过
/// spawn_refresh / spawn_publish 以 fire-and-forget
/// 方式使用, 失败只落日志
#[async_trait]
pub trait RemoteSync: Send + Sync {
    /// 拉取远程副本覆盖本地
    async fn refresh(&self) -> SyncResult<usize>;

    /// 发布本地副本到远程
    async fn publish(&self) -> SyncResult<usize>;
}

/// HTTP 远程同步
///
/// 远程端按 `<base_url>/<表名>.csv` 提供各表;
/// refresh 以本地已有的表名为准逐个拉取
pub struct HttpRemoteSync {
    base_url: String,
    data_dir: PathBuf,
    client: reqwest::Client,
}

impl HttpRemoteSync {
    pub fn new(base_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            data_dir: data_dir.into(),
            client: reqwest::Client::new(),
        }
    }

    /// 本地数据目录下的 CSV 文件名 (按名排序)
    fn local_csv_names(&self) -> SyncResult<Vec<String>> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = std::fs::read_dir(&self.data_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl RemoteSync for HttpRemoteSync {
    async fn refresh(&self) -> SyncResult<usize> {
        let mut updated = 0;
        for name in self.local_csv_names()? {
            let url = format!("{}/{}", self.base_url, name);
            let response = self.client.get(&url).send().await?;

            if !response.status().is_success() {
                // 远程缺某张表不致命, 记录后继续
                tracing::warn!(url = %url, status = %response.status(), "拉取失败, 跳过");
                continue;
            }

            let bytes = response.bytes().await?;
            std::fs::write(self.data_dir.join(&name), &bytes)?;
            updated += 1;
        }

        tracing::info!(updated, "远程副本拉取完成");
        Ok(updated)
    }

    async fn publish(&self) -> SyncResult<usize> {
        let mut published = 0;
        for name in self.local_csv_names()? {
            let url = format!("{}/{}", self.base_url, name);
            let bytes = std::fs::read(self.data_dir.join(&name))?;
            let response = self.client.put(&url).body(bytes).send().await?;

            if !response.status().is_success() {
                return Err(SyncError::BadStatus {
                    url,
                    status: response.status().as_u16(),
                });
            }
            published += 1;
        }

        tracing::info!(published, "本地副本发布完成");
        Ok(published)
    }
}

/// 空实现 (未配置远程时使用)
pub struct NoopRemoteSync;

#[async_trait]
impl RemoteSync for NoopRemoteSync {
    async fn refresh(&self) -> SyncResult<usize> {
        tracing::debug!("未配置远程同步, refresh 跳过");
        Ok(0)
    }

    async fn publish(&self) -> SyncResult<usize> {
        tracing::debug!("未配置远程同步, publish 跳过");
        Ok(0)
    }
}

/// fire-and-forget 发布: 失败只落日志, 不向调用方传播
///
/// 不在 tokio 运行时内 (同步测试等) 时直接跳过
pub fn spawn_publish(sync: Arc<dyn RemoteSync>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = sync.publish().await {
                    tracing::warn!(error = %e, "后台发布失败");
                }
            });
        }
        Err(_) => tracing::debug!("无 tokio 运行时, 后台发布跳过"),
    }
}

/// fire-and-forget 拉取: 失败只落日志, 不向调用方传播
///
/// 不在 tokio 运行时内 (同步测试等) 时直接跳过
pub fn spawn_refresh(sync: Arc<dyn RemoteSync>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(e) = sync.refresh().await {
                    tracing::warn!(error = %e, "后台拉取失败");
                }
            });
        }
        Err(_) => tracing::debug!("无 tokio 运行时, 后台拉取跳过"),
    }
}
