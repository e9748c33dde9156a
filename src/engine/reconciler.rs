// ==========================================
// 梳棉机保养跟踪系统 - 保养对账引擎
// ==========================================
// 职责: 按当前吨数选取适用档位, 用吨数区间重叠
//       匹配历史记录, 推导已做/未做项目拆分
// 红线: 纯函数, 不持有跨调用状态; 每次查询都从
//       传入的计划/记录快照重新推导
// ==========================================
// 匹配语义: "已做"判定只做规范名精确相等 (项目
// 名 vs 记录表列名), 不做模糊/子串匹配
// ==========================================

use std::collections::{BTreeSet, HashSet};

use crate::domain::types::ViewMode;
use crate::domain::{ReconciliationRecord, ServiceEvent, ServiceTier, TierEventDetail};
use crate::engine::error::ReconcileError;
use crate::engine::normalizer::Normalizer;

/// 默认元数据列集 (沿用记录表的历史列名拼写)
///
/// 这些列携带区间/日期/人员等元信息, 不参与"已做项目"推导
pub const DEFAULT_METADATA_COLUMNS: &[&str] = &[
    "Min_Tones",
    "Max_Tones",
    "Date",
    "Tones",
    "Other",
    "Servised by",
    "card",
    "card No",
    "Card No",
];

/// 保养对账引擎
///
/// metadata_columns 以显式配置传入 (存规范化形式),
/// 不在匹配循环里硬编码字面列表
pub struct Reconciler {
    normalizer: Normalizer,
    metadata_columns: HashSet<String>,
}

impl Default for Reconciler {
    fn default() -> Self {
        let columns: Vec<String> = DEFAULT_METADATA_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::new(Normalizer::default(), &columns)
    }
}

impl Reconciler {
    /// 创建对账引擎
    ///
    /// # 参数
    /// - normalizer: 名称规范化器 (分隔符集在其内配置)
    /// - metadata_columns: 元数据列名 (任意拼写, 内部按规范名比较)
    pub fn new(normalizer: Normalizer, metadata_columns: &[String]) -> Self {
        let metadata_columns = metadata_columns
            .iter()
            .map(|c| normalizer.normalize_name(c))
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            normalizer,
            metadata_columns,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// 列是否属于元数据列 (按规范名)
    fn is_metadata(&self, column: &str) -> bool {
        self.metadata_columns
            .contains(&self.normalizer.normalize_name(column))
    }

    /// 单元格是否为空白
    ///
    /// # 规则
    /// - 去空白小写后为 "" / "nan" / "none" 即空白
    ///   (历史数据由电子表格导出, NaN 以字面量落进单元格)
    fn is_blank_value(value: &str) -> bool {
        matches!(value.trim().to_lowercase().as_str(), "" | "nan" | "none")
    }

    // ==========================================
    // 选档
    // ==========================================

    /// 按视图模式选取适用档位
    ///
    /// # 规则
    /// | 模式         | 条件                                  |
    /// |--------------|---------------------------------------|
    /// | CurrentOnly  | min <= current <= max                 |
    /// | AllLower     | max <= current                        |
    /// | AllHigher    | min >= current                        |
    /// | CustomRange  | min >= low && max <= high             |
    /// | All          | 不过滤                                |
    ///
    /// 命中多个档位时保持计划表行序, 不重排
    pub fn select_applicable_tiers<'a>(
        &self,
        plan: &'a [ServiceTier],
        current_tons: f64,
        mode: ViewMode,
        custom_range: Option<(f64, f64)>,
    ) -> Result<Vec<&'a ServiceTier>, ReconcileError> {
        let selected: Vec<&ServiceTier> = match mode {
            ViewMode::CurrentOnly => plan
                .iter()
                .filter(|t| t.min_tons <= current_tons && current_tons <= t.max_tons)
                .collect(),
            ViewMode::AllLower => plan.iter().filter(|t| t.max_tons <= current_tons).collect(),
            ViewMode::AllHigher => plan.iter().filter(|t| t.min_tons >= current_tons).collect(),
            ViewMode::CustomRange => {
                let (low, high) = custom_range.ok_or(ReconcileError::MissingCustomRange)?;
                plan.iter()
                    .filter(|t| t.min_tons >= low && t.max_tons <= high)
                    .collect()
            }
            ViewMode::All => plan.iter().collect(),
        };
        Ok(selected)
    }

    // ==========================================
    // 对账
    // ==========================================

    /// 完整对账: 选档 + 逐档位对账
    ///
    /// # 返回
    /// - Ok: 每个适用档位一条记录, 保持计划表行序
    /// - Err(EmptyResult): 无档位命中 (合法空结果)
    pub fn reconcile(
        &self,
        plan: &[ServiceTier],
        events: &[ServiceEvent],
        current_tons: f64,
        mode: ViewMode,
        custom_range: Option<(f64, f64)>,
    ) -> Result<Vec<ReconciliationRecord>, ReconcileError> {
        let applicable = self.select_applicable_tiers(plan, current_tons, mode, custom_range)?;
        if applicable.is_empty() {
            return Err(ReconcileError::EmptyResult);
        }

        tracing::debug!(
            tiers = applicable.len(),
            events = events.len(),
            current_tons,
            %mode,
            "开始对账"
        );

        Ok(applicable
            .into_iter()
            .map(|tier| self.reconcile_tier(tier, events))
            .collect())
    }

    /// 单档位对账
    ///
    /// # 规则
    /// 1. 拆分应做项目并求规范名
    /// 2. 过滤与档位区间重叠的记录 (双侧闭区间)
    /// 3. 汇总重叠记录中非元数据、非空白的列名 -> 已做集合
    /// 4. 未做 = 应做中规范名不在已做规范名集合的项
    /// 5. 无重叠记录时输出占位记录, 全部应做项均未做
    /// 6. 最近日期/吨数取重叠记录中的最大可解析值
    pub fn reconcile_tier(
        &self,
        tier: &ServiceTier,
        events: &[ServiceEvent],
    ) -> ReconciliationRecord {
        let required = self.normalizer.split_service_list(&tier.required_services);

        let matching: Vec<&ServiceEvent> = events
            .iter()
            .filter(|e| tier.overlaps(e.min_tons, e.max_tons))
            .collect();

        // 已做列名并集 (BTreeSet: 去重 + 排序)
        let mut done_raw: BTreeSet<String> = BTreeSet::new();
        for event in &matching {
            for (name, value) in &event.columns {
                if self.is_metadata(name) || Self::is_blank_value(value) {
                    continue;
                }
                done_raw.insert(name.clone());
            }
        }

        let done_norm: HashSet<String> = done_raw
            .iter()
            .map(|name| self.normalizer.normalize_name(name))
            .collect();

        // 未做: 只认规范名精确相等, 保持应做项出现顺序
        let outstanding: Vec<String> = required
            .iter()
            .filter(|s| !done_norm.contains(&self.normalizer.normalize_name(s)))
            .cloned()
            .collect();

        let last_service_date = matching.iter().filter_map(|e| e.date).max();
        let last_tons = matching
            .iter()
            .filter_map(|e| e.tons_at_event)
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            });

        // 日期最大的记录提供保养人/备注; 全部无日期时不取
        let last_event = matching
            .iter()
            .filter(|e| e.date.is_some())
            .max_by_key(|e| e.date);

        ReconciliationRecord {
            tier_min_tons: tier.min_tons,
            tier_max_tons: tier.max_tons,
            required_services: required,
            done_services: done_raw.into_iter().collect(),
            outstanding_services: outstanding,
            last_service_date,
            last_tons,
            last_technician: last_event.and_then(|e| e.technician.clone()),
            last_notes: last_event.and_then(|e| e.notes.clone()),
            matching_events: matching.len(),
        }
    }

    /// 档位内逐条历史明细 (richer variant)
    ///
    /// 每条重叠记录一行, 携带该记录自身的已做列;
    /// 行序与记录表一致
    pub fn tier_event_details(
        &self,
        tier: &ServiceTier,
        events: &[ServiceEvent],
    ) -> Vec<TierEventDetail> {
        events
            .iter()
            .filter(|e| tier.overlaps(e.min_tons, e.max_tons))
            .map(|event| {
                let performed = event
                    .columns
                    .iter()
                    .filter(|(name, value)| {
                        !self.is_metadata(name) && !Self::is_blank_value(value)
                    })
                    .map(|(name, _)| name.clone())
                    .collect();

                TierEventDetail {
                    tier_min_tons: tier.min_tons,
                    tier_max_tons: tier.max_tons,
                    event_min_tons: event.min_tons,
                    event_max_tons: event.max_tons,
                    date: event.date,
                    tons_at_event: event.tons_at_event,
                    technician: event.technician.clone(),
                    notes: event.notes.clone(),
                    performed,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(
        min_tons: f64,
        max_tons: f64,
        date: Option<NaiveDate>,
        tons: Option<f64>,
        flags: &[(&str, &str)],
    ) -> ServiceEvent {
        let mut columns = vec![
            ("Min_Tones".to_string(), format!("{}", min_tons)),
            ("Max_Tones".to_string(), format!("{}", max_tons)),
        ];
        for (name, value) in flags {
            columns.push((name.to_string(), value.to_string()));
        }
        ServiceEvent {
            min_tons,
            max_tons,
            date,
            tons_at_event: tons,
            technician: None,
            notes: None,
            columns,
        }
    }

    #[test]
    fn test_select_current_only() {
        let r = Reconciler::default();
        let plan = vec![
            ServiceTier::new(0.0, 1000.0, "A"),
            ServiceTier::new(1000.0, 2000.0, "B"),
        ];
        let hit = r
            .select_applicable_tiers(&plan, 1000.0, ViewMode::CurrentOnly, None)
            .unwrap();
        // 边界含端点: 1000 同时落在两个档位
        assert_eq!(hit.len(), 2);
    }

    #[test]
    fn test_select_all_lower_excludes_partial() {
        let r = Reconciler::default();
        let plan = vec![
            ServiceTier::new(0.0, 1000.0, "A"),
            ServiceTier::new(1000.0, 2000.0, "B"),
            ServiceTier::new(2000.0, 3000.0, "C"),
        ];
        let hit = r
            .select_applicable_tiers(&plan, 1500.0, ViewMode::AllLower, None)
            .unwrap();
        // max_tons <= 1500 只有 (0,1000)
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].max_tons, 1000.0);
    }

    #[test]
    fn test_select_custom_range_requires_bounds() {
        let r = Reconciler::default();
        let plan = vec![ServiceTier::new(0.0, 1000.0, "A")];
        let err = r
            .select_applicable_tiers(&plan, 500.0, ViewMode::CustomRange, None)
            .unwrap_err();
        assert_eq!(err, ReconcileError::MissingCustomRange);

        let hit = r
            .select_applicable_tiers(&plan, 500.0, ViewMode::CustomRange, Some((0.0, 1500.0)))
            .unwrap();
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn test_reconcile_tier_done_and_outstanding() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(1000.0, 2000.0, "Oil+Filter");
        let events = vec![event(
            1200.0,
            1800.0,
            None,
            None,
            &[("Oil", "x"), ("Filter", "")],
        )];

        let record = r.reconcile_tier(&tier, &events);
        assert_eq!(record.done_services, vec!["Oil"]);
        assert_eq!(record.outstanding_services, vec!["Filter"]);
        assert_eq!(record.matching_events, 1);
    }

    #[test]
    fn test_reconcile_tier_union_across_events() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(1000.0, 2000.0, "Oil+Filter+Grease");
        let events = vec![
            event(1000.0, 1500.0, None, None, &[("Oil", "x")]),
            event(1500.0, 2000.0, None, None, &[("Filter", "ok")]),
        ];

        let record = r.reconcile_tier(&tier, &events);
        // 两条记录各标了不同项目, 已做为并集
        assert_eq!(record.done_services, vec!["Filter", "Oil"]);
        assert_eq!(record.outstanding_services, vec!["Grease"]);
    }

    #[test]
    fn test_reconcile_tier_no_events_placeholder() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(0.0, 500.0, "Grease");
        let record = r.reconcile_tier(&tier, &[]);

        assert_eq!(record.matching_events, 0);
        assert!(record.done_services.is_empty());
        assert_eq!(record.outstanding_services, vec!["Grease"]);
        assert_eq!(record.last_service_date, None);
        assert_eq!(record.last_tons, None);
    }

    #[test]
    fn test_blank_values_nan_none() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(0.0, 100.0, "Oil+Filter+Belt");
        let events = vec![event(
            0.0,
            100.0,
            None,
            None,
            &[("Oil", "nan"), ("Filter", " NONE "), ("Belt", "done")],
        )];

        let record = r.reconcile_tier(&tier, &events);
        assert_eq!(record.done_services, vec!["Belt"]);
        assert_eq!(record.outstanding_services, vec!["Oil", "Filter"]);
    }

    #[test]
    fn test_done_matching_is_name_equality_not_fuzzy() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(0.0, 100.0, "Oil Change");
        // 列名只是 "Oil", 规范名不等于 "oil change" -> 不算已做
        let events = vec![event(0.0, 100.0, None, None, &[("Oil", "x")])];

        let record = r.reconcile_tier(&tier, &events);
        assert_eq!(record.outstanding_services, vec!["Oil Change"]);
    }

    #[test]
    fn test_metadata_columns_excluded() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(0.0, 100.0, "Oil");
        let events = vec![event(
            0.0,
            100.0,
            None,
            None,
            &[("Other", "remark"), ("Servised by", "Ahmed"), ("Oil", "x")],
        )];

        let record = r.reconcile_tier(&tier, &events);
        assert_eq!(record.done_services, vec!["Oil"]);
    }

    #[test]
    fn test_last_date_and_tons_max() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(0.0, 100.0, "Oil");
        let events = vec![
            event(
                0.0,
                50.0,
                NaiveDate::from_ymd_opt(2025, 1, 10),
                Some(40.0),
                &[("Oil", "x")],
            ),
            event(
                50.0,
                100.0,
                NaiveDate::from_ymd_opt(2025, 3, 2),
                Some(90.0),
                &[],
            ),
            // 日期解析失败的记录 (date=None) 不参与最大值
            event(0.0, 100.0, None, Some(999.0), &[]),
        ];

        let record = r.reconcile_tier(&tier, &events);
        assert_eq!(record.last_service_date, NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(record.last_tons, Some(999.0));
    }

    #[test]
    fn test_reconcile_empty_result() {
        let r = Reconciler::default();
        let plan = vec![ServiceTier::new(0.0, 100.0, "Oil")];
        let err = r
            .reconcile(&plan, &[], 500.0, ViewMode::CurrentOnly, None)
            .unwrap_err();
        assert_eq!(err, ReconcileError::EmptyResult);
    }

    #[test]
    fn test_required_partition_property() {
        // outstanding ∪ done ⊇ required (规范名集合), 且两者在
        // required 范围内不相交
        let r = Reconciler::default();
        let tier = ServiceTier::new(0.0, 100.0, "Oil+Filter, Belt ;Grease");
        let events = vec![event(0.0, 100.0, None, None, &[("Oil", "x"), ("Belt", "y")])];

        let record = r.reconcile_tier(&tier, &events);
        let norm = |s: &String| r.normalizer().normalize_name(s);
        let done: std::collections::HashSet<String> =
            record.done_services.iter().map(norm).collect();
        let outstanding: std::collections::HashSet<String> =
            record.outstanding_services.iter().map(norm).collect();

        for required in &record.required_services {
            let n = norm(required);
            assert!(done.contains(&n) ^ outstanding.contains(&n));
        }
    }

    #[test]
    fn test_tier_event_details_rows() {
        let r = Reconciler::default();
        let tier = ServiceTier::new(0.0, 100.0, "Oil+Filter");
        let events = vec![
            event(0.0, 50.0, None, Some(30.0), &[("Oil", "x")]),
            event(200.0, 300.0, None, None, &[("Filter", "x")]),
        ];

        let details = r.tier_event_details(&tier, &events);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].performed, vec!["Oil"]);
        assert_eq!(details[0].tons_at_event, Some(30.0));
    }
}
