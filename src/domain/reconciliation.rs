// ==========================================
// 梳棉机保养跟踪系统 - 对账结果实体
// ==========================================
// Reconciler 的输出: 每个适用档位一条记录,
// 以及可选的逐条历史明细 (richer variant)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 档位对账记录
///
/// 不变量:
/// - done_services 中的每一项都是某条重叠记录里非空的列名 (去重, 排序)
/// - outstanding_services 是 required_services 中规范名不在
///   done 规范名集合中的项, 保持原始出现顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    /// 档位下界 (回显计划表)
    pub tier_min_tons: f64,

    /// 档位上界 (回显计划表)
    pub tier_max_tons: f64,

    /// 应做项目 (按计划表文本出现顺序拆分)
    pub required_services: Vec<String>,

    /// 已做项目 (重叠记录中非空列名的并集, 去重后排序)
    pub done_services: Vec<String>,

    /// 未做项目 (required 顺序)
    pub outstanding_services: Vec<String>,

    /// 最近保养日期 (重叠记录中可解析日期的最大值)
    pub last_service_date: Option<NaiveDate>,

    /// 最近保养吨数 (重叠记录 Tones 列数值最大值)
    pub last_tons: Option<f64>,

    /// 最近一次保养的保养人 (取日期最大的记录)
    pub last_technician: Option<String>,

    /// 最近一次保养的备注 (取日期最大的记录)
    pub last_notes: Option<String>,

    /// 重叠记录条数 (0 表示占位记录, 全部项目未做)
    pub matching_events: usize,
}

impl ReconciliationRecord {
    /// 是否所有应做项目均已完成
    pub fn is_fully_serviced(&self) -> bool {
        self.outstanding_services.is_empty()
    }
}

/// 档位内单条历史明细 (需要逐条历史时使用)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierEventDetail {
    /// 所属档位下界
    pub tier_min_tons: f64,

    /// 所属档位上界
    pub tier_max_tons: f64,

    /// 记录覆盖的吨数区间
    pub event_min_tons: f64,
    pub event_max_tons: f64,

    /// 记录日期
    pub date: Option<NaiveDate>,

    /// 记录时累计吨数
    pub tons_at_event: Option<f64>,

    /// 保养人
    pub technician: Option<String>,

    /// 备注
    pub notes: Option<String>,

    /// 该条记录中非空的项目列 (表内列序)
    pub performed: Vec<String>,
}
