// ==========================================
// 梳棉机保养跟踪系统 - 字段映射器
// ==========================================
// 职责: 把命名表的原始行映射为领域实体
// 列约定: 沿用记录表的历史列名拼写 (Tones / Servised by)
// ==========================================
// 宽松策略: 吨数区间列缺失或不可解析一律按 0 处理,
// 单元格级坏数据不中断整表映射
// ==========================================

use crate::domain::{ServiceEvent, ServiceTier};
use crate::store::cleaner::DataCleaner;
use crate::store::table::Table;

// ==========================================
// 列约定
// ==========================================

/// 区间下界列
pub const COL_MIN_TONS: &str = "Min_Tones";

/// 区间上界列
pub const COL_MAX_TONS: &str = "Max_Tones";

/// 计划表应做项目列
pub const COL_SERVICE: &str = "Service";

/// 记录表日期列
pub const COL_DATE: &str = "Date";

/// 记录表累计吨数列
pub const COL_TONS: &str = "Tones";

/// 记录表保养人列
pub const COL_TECHNICIAN: &str = "Servised by";

/// 记录表备注列
pub const COL_NOTES: &str = "Other";

// ==========================================
// 映射函数
// ==========================================

/// 计划表 -> 保养档位序列 (保持行序)
///
/// 完全空白的行跳过; 区间列缺失/坏值按 0 处理
pub fn map_service_tiers(table: &Table) -> Vec<ServiceTier> {
    let cleaner = DataCleaner;

    (0..table.row_count())
        .filter(|&row| !is_blank_row(table, row))
        .map(|row| {
            let min_tons = bound_or_zero(&cleaner, table, row, COL_MIN_TONS);
            let max_tons = bound_or_zero(&cleaner, table, row, COL_MAX_TONS);
            let required_services = table
                .cell(row, COL_SERVICE)
                .map(str::trim)
                .unwrap_or("")
                .to_string();

            ServiceTier::new(min_tons, max_tons, required_services)
        })
        .collect()
}

/// 记录表 -> 保养记录序列 (保持行序)
///
/// 每行保留全部列的原始快照, 元数据过滤由对账引擎完成
pub fn map_service_events(table: &Table) -> Vec<ServiceEvent> {
    let cleaner = DataCleaner;

    (0..table.row_count())
        .filter(|&row| !is_blank_row(table, row))
        .map(|row| ServiceEvent {
            min_tons: bound_or_zero(&cleaner, table, row, COL_MIN_TONS),
            max_tons: bound_or_zero(&cleaner, table, row, COL_MAX_TONS),
            date: table
                .cell(row, COL_DATE)
                .and_then(|v| cleaner.parse_date_lenient(v)),
            tons_at_event: table.cell(row, COL_TONS).and_then(|v| cleaner.parse_tons(v)),
            technician: cleaner
                .normalize_null(table.cell(row, COL_TECHNICIAN).map(str::to_string)),
            notes: cleaner.normalize_null(table.cell(row, COL_NOTES).map(str::to_string)),
            columns: table.row_pairs(row),
        })
        .collect()
}

/// 区间列取值: 缺列、空值、坏值一律 0
///
/// 真正缺失的边界与记成 0 的边界因此无法区分,
/// 属于沿用的历史行为
fn bound_or_zero(cleaner: &DataCleaner, table: &Table, row: usize, column: &str) -> f64 {
    table
        .cell(row, column)
        .and_then(|v| cleaner.parse_tons(v))
        .unwrap_or(0.0)
}

/// 整行是否全部空白
fn is_blank_row(table: &Table, row: usize) -> bool {
    match table.rows.get(row) {
        Some(cells) => cells.iter().all(|c| c.trim().is_empty()),
        None => true,
    }
}
