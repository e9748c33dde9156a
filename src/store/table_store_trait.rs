// ==========================================
// 梳棉机保养跟踪系统 - 表存储契约
// ==========================================
// 对账核心只依赖这两个操作:
// "加载全部命名表" / "持久化全部命名表"
// ==========================================

use crate::store::error::StoreResult;
use crate::store::table::Workbook;

/// 表存储契约
///
/// 实现方保证 load_all 返回的是一次性快照,
/// 调用方持有期间不会被存储端修改
pub trait TableStore: Send + Sync {
    /// 加载全部命名表
    fn load_all(&self) -> StoreResult<Workbook>;

    /// 持久化全部命名表
    fn save_all(&self, workbook: &Workbook) -> StoreResult<()>;
}
