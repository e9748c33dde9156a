// ==========================================
// 梳棉机保养跟踪系统 - 领域层
// ==========================================
// 职责: 定义核心实体与类型, 不做 I/O
// ==========================================

pub mod reconciliation;
pub mod service_event;
pub mod service_plan;
pub mod types;

pub use reconciliation::{ReconciliationRecord, TierEventDetail};
pub use service_event::ServiceEvent;
pub use service_plan::ServiceTier;
