// ==========================================
// 梳棉机保养跟踪系统 - 保养记录实体
// ==========================================
// 每台机的记录表 (Card<N>) 一行对应一次保养,
// 覆盖某个吨数区间; 除元数据列之外的每一列都是
// 一个保养项目标记列, 非空即视为"已做"
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 保养记录 (记录表的一行)
///
/// columns 保存该行全部列的 (列名, 原始单元格) 快照, 按表内列序;
/// 元数据列的过滤属于对账规则, 由 Reconciler 按其元数据列集完成,
/// 这里不做取舍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEvent {
    /// 记录覆盖的吨数下界 (缺失列按 0 处理)
    pub min_tons: f64,

    /// 记录覆盖的吨数上界 (缺失列按 0 处理)
    pub max_tons: f64,

    /// 保养日期 (宽松解析; 解析失败为 None)
    pub date: Option<NaiveDate>,

    /// 保养时机台累计吨数 (非数值为 None)
    pub tons_at_event: Option<f64>,

    /// 保养人
    pub technician: Option<String>,

    /// 备注
    pub notes: Option<String>,

    /// 全部列的原始快照 (列名, 单元格文本), 保持表内列序
    pub columns: Vec<(String, String)>,
}

impl ServiceEvent {
    /// 按列名取原始单元格 (列名已在装载时去除首尾空白)
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}
