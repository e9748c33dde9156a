// ==========================================
// 梳棉机保养跟踪系统 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 宽松日期与吨数解析
// 策略: 单元格级坏数据就地吸收 (返回 None),
//       不中断整表装载
// ==========================================

use chrono::NaiveDate;

/// 宽松日期格式表, 日在前优先
///
/// 旧数据同时出现过 `/`、`-` 分隔与带时间的导出格式
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d/%m/%y",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
];

pub struct DataCleaner;

impl DataCleaner {
    /// 去除首尾空白
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 空串标准化为 None
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 宽松解析吨数
    ///
    /// # 规则
    /// - 去空白后按 f64 解析; 解析失败返回 None (不报错)
    pub fn parse_tons(&self, value: &str) -> Option<f64> {
        value.trim().parse::<f64>().ok()
    }

    /// 宽松解析日期 (日在前)
    ///
    /// # 规则
    /// - `\` 统一替换为 `/` (手工录入常见笔误)
    /// - 带时间的导出值只取日期部分
    /// - 逐个尝试格式表; 全部失败返回 None
    pub fn parse_date_lenient(&self, value: &str) -> Option<NaiveDate> {
        let normalized = value.trim().replace('\\', "/");
        if normalized.is_empty() {
            return None;
        }

        // "14/03/2025 00:00:00" -> "14/03/2025"
        let date_part = normalized
            .split_whitespace()
            .next()
            .unwrap_or(normalized.as_str());

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
    }
}
