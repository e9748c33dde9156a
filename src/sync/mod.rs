// ==========================================
// 梳棉机保养跟踪系统 - 同步层
// ==========================================
// 职责: 本地数据副本与远程共享副本的拉取/发布
// 红线: fire-and-forget, 失败只记日志, 永不影响
//       查询结果; 对账核心不依赖同步成功
// ==========================================

pub mod remote;

pub use remote::{
    spawn_publish, spawn_refresh, HttpRemoteSync, NoopRemoteSync, RemoteSync, SyncError,
};
