// ==========================================
// 梳棉机保养跟踪系统 - 引擎层
// ==========================================
// 职责: 保养对账核心 (名称规范化 + 档位对账)
// 红线: 无状态、无副作用、无 I/O; 结果完全由
//       传入的计划/记录快照与查询参数决定
// ==========================================

pub mod error;
pub mod normalizer;
pub mod reconciler;

// 重导出核心引擎
pub use error::ReconcileError;
pub use normalizer::Normalizer;
pub use reconciler::Reconciler;
