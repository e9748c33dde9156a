// ==========================================
// 梳棉机保养跟踪系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV 表存储 + CLI
// 系统定位: 保养查询与对账工具 (查询只读, 编辑需授权)
// 车间: Bail Yarn 纺纱准备车间
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 保养对账核心
pub mod engine;

// 表存储层 - 工作簿加载/持久化
pub mod store;

// 身份层 - 用户/会话
pub mod auth;

// 同步层 - 远程副本
pub mod sync;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配与入口支撑
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{UserRole, ViewMode};

// 领域实体
pub use domain::{ReconciliationRecord, ServiceEvent, ServiceTier, TierEventDetail};

// 引擎
pub use engine::{ReconcileError, Reconciler, Normalizer};

// 表存储
pub use store::{CsvTableStore, StoreError, Table, TableStore, Workbook};

// API
pub use api::{EditApi, LookupApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "梳棉机保养跟踪系统";
