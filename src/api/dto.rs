// ==========================================
// 梳棉机保养跟踪系统 - API 层 DTO
// ==========================================
// 响应行是摊平的字符串表, 缺失值用 "-" 哨兵,
// 展示层 (CLI/网页) 可直接逐行渲染
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::ViewMode;
use crate::domain::{ReconciliationRecord, TierEventDetail};

/// 缺失值哨兵
pub const DASH: &str = "-";

// ==========================================
// 查询
// ==========================================

/// 机台保养状态查询请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMachineStatusRequest {
    /// 机台号 (记录表名 = 前缀 + 机台号)
    pub card_no: String,

    /// 当前累计吨数
    pub current_tons: f64,

    /// 视图模式
    pub mode: ViewMode,

    /// 自定义吨数范围 (仅 CustomRange 模式使用)
    pub custom_range: Option<(f64, f64)>,

    /// 是否附带逐条历史明细
    pub include_history: bool,
}

/// 对账结果行 (每个适用档位一行)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    /// 档位区间, 如 "1000 - 2000"
    pub tier_range: String,

    /// 应做项目 (原顺序, " + " 连接)
    pub required: String,

    /// 已做项目 (去重排序, " + " 连接; 空为 "-")
    pub done: String,

    /// 未做项目 (应做顺序, " + " 连接; 空为 "-")
    pub outstanding: String,

    /// 最近保养日期 (dd/mm/YYYY; 缺失为 "-")
    pub last_date: String,

    /// 最近保养吨数 (缺失为 "-")
    pub last_tons: String,

    /// 最近保养人 (缺失为 "-")
    pub technician: String,

    /// 备注 (缺失为 "-")
    pub notes: String,

    /// 应做项目是否全部完成
    pub fully_serviced: bool,
}

impl ReconciliationRow {
    /// 由对账记录摊平成展示行
    pub fn from_record(record: &ReconciliationRecord) -> Self {
        Self {
            tier_range: format!("{} - {}", record.tier_min_tons, record.tier_max_tons),
            required: join_or_dash(&record.required_services),
            done: join_or_dash(&record.done_services),
            outstanding: join_or_dash(&record.outstanding_services),
            last_date: record
                .last_service_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| DASH.to_string()),
            last_tons: record
                .last_tons
                .map(|t| t.to_string())
                .unwrap_or_else(|| DASH.to_string()),
            technician: record
                .last_technician
                .clone()
                .unwrap_or_else(|| DASH.to_string()),
            notes: record.last_notes.clone().unwrap_or_else(|| DASH.to_string()),
            fully_serviced: record.is_fully_serviced(),
        }
    }
}

/// 历史明细行 (每条重叠记录一行)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// 所属档位区间
    pub tier_range: String,

    /// 记录覆盖的吨数区间
    pub event_range: String,

    /// 记录日期
    pub date: String,

    /// 记录时累计吨数
    pub tons: String,

    /// 该条记录完成的项目
    pub performed: String,

    /// 保养人
    pub technician: String,

    /// 备注
    pub notes: String,
}

impl HistoryRow {
    pub fn from_detail(detail: &TierEventDetail) -> Self {
        Self {
            tier_range: format!("{} - {}", detail.tier_min_tons, detail.tier_max_tons),
            event_range: format!("{} - {}", detail.event_min_tons, detail.event_max_tons),
            date: detail
                .date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| DASH.to_string()),
            tons: detail
                .tons_at_event
                .map(|t| t.to_string())
                .unwrap_or_else(|| DASH.to_string()),
            performed: join_or_dash(&detail.performed),
            technician: detail.technician.clone().unwrap_or_else(|| DASH.to_string()),
            notes: detail.notes.clone().unwrap_or_else(|| DASH.to_string()),
        }
    }
}

/// 机台保养状态查询响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineStatusResponse {
    pub card_no: String,
    pub current_tons: f64,
    pub mode: ViewMode,

    /// 对账结果行, 保持计划表行序
    pub rows: Vec<ReconciliationRow>,

    /// 逐条历史明细 (请求未开启时为空)
    pub history: Vec<HistoryRow>,

    /// 空结果等提示信息 (已本地化)
    pub message: Option<String>,
}

// ==========================================
// 编辑
// ==========================================

/// 追加保养记录请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendEventRequest {
    pub card_no: String,
    pub min_tons: f64,
    pub max_tons: f64,

    /// 日期原文 (dd/mm/YYYY, 原样写入单元格)
    pub date: Option<String>,

    /// 记录时累计吨数
    pub tons_at_event: Option<f64>,

    pub technician: Option<String>,
    pub notes: Option<String>,

    /// 本次完成的项目列名 (单元格记 "x")
    pub performed: Vec<String>,
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        DASH.to_string()
    } else {
        items.join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_row_from_record_with_sentinels() {
        let record = ReconciliationRecord {
            tier_min_tons: 0.0,
            tier_max_tons: 500.0,
            required_services: vec!["Grease".to_string()],
            done_services: vec![],
            outstanding_services: vec!["Grease".to_string()],
            last_service_date: None,
            last_tons: None,
            last_technician: None,
            last_notes: None,
            matching_events: 0,
        };

        let row = ReconciliationRow::from_record(&record);
        assert_eq!(row.tier_range, "0 - 500");
        assert_eq!(row.done, "-");
        assert_eq!(row.outstanding, "Grease");
        assert_eq!(row.last_date, "-");
        assert_eq!(row.last_tons, "-");
        assert!(!row.fully_serviced);
    }

    #[test]
    fn test_row_date_formatting() {
        let record = ReconciliationRecord {
            tier_min_tons: 1000.0,
            tier_max_tons: 2000.0,
            required_services: vec!["Oil".to_string()],
            done_services: vec!["Oil".to_string()],
            outstanding_services: vec![],
            last_service_date: NaiveDate::from_ymd_opt(2025, 3, 14),
            last_tons: Some(1500.0),
            last_technician: Some("Ahmed".to_string()),
            last_notes: None,
            matching_events: 1,
        };

        let row = ReconciliationRow::from_record(&record);
        assert_eq!(row.last_date, "14/03/2025");
        assert_eq!(row.last_tons, "1500");
        assert_eq!(row.technician, "Ahmed");
        assert!(row.fully_serviced);
    }
}
