// ==========================================
// 梳棉机保养跟踪系统 - 查询 API
// ==========================================
// 职责: 机台保养状态查询; 装载快照 -> 映射 ->
//       对账 -> 摊平为有序行表
// 快照语义: 一次查询固定使用一份 load_all 快照,
//           查询期间的并发编辑互不可见
// ==========================================

use std::sync::Arc;

use crate::api::dto::{
    CheckMachineStatusRequest, HistoryRow, MachineStatusResponse, ReconciliationRow,
};
use crate::api::error::{ApiError, ApiResult};
use crate::config::settings::AppConfig;
use crate::domain::types::ViewMode;
use crate::engine::{Normalizer, ReconcileError, Reconciler};
use crate::i18n;
use crate::store::table::Workbook;
use crate::store::table_store_trait::TableStore;
use crate::store::mapper;

/// 查询 API
pub struct LookupApi {
    store: Arc<dyn TableStore>,
    reconciler: Reconciler,
    plan_table: String,
    card_table_prefix: String,
}

impl LookupApi {
    /// 按配置装配查询 API
    ///
    /// 分隔符集与元数据列集都来自配置, 引擎内不再有字面量
    pub fn new(store: Arc<dyn TableStore>, config: &AppConfig) -> Self {
        let normalizer = Normalizer::with_delimiters(config.delimiter_chars());
        let reconciler = Reconciler::new(normalizer, &config.metadata_columns);
        Self {
            store,
            reconciler,
            plan_table: config.plan_table.clone(),
            card_table_prefix: config.card_table_prefix.clone(),
        }
    }

    fn card_table_name(&self, card_no: &str) -> String {
        format!("{}{}", self.card_table_prefix, card_no.trim())
    }

    /// 机台保养状态查询
    ///
    /// # 返回
    /// - Ok: 有序对账行表; 选档为空时 rows 为空且
    ///   message 携带本地化提示 (合法空结果, 非错误)
    /// - Err(MissingTable): 计划表或该机台记录表缺失
    pub fn check_machine_status(
        &self,
        request: &CheckMachineStatusRequest,
    ) -> ApiResult<MachineStatusResponse> {
        let workbook = self.store.load_all()?;
        self.check_with_snapshot(&workbook, request)
    }

    /// 在给定快照上执行查询 (快照由调用方保证只读)
    pub fn check_with_snapshot(
        &self,
        workbook: &Workbook,
        request: &CheckMachineStatusRequest,
    ) -> ApiResult<MachineStatusResponse> {
        self.validate(request)?;

        let plan_table = workbook.get_required(&self.plan_table)?;
        let card_table = workbook.get_required(&self.card_table_name(&request.card_no))?;

        let tiers = mapper::map_service_tiers(plan_table);
        let events = mapper::map_service_events(card_table);

        tracing::info!(
            card_no = %request.card_no,
            current_tons = request.current_tons,
            mode = %request.mode,
            tiers = tiers.len(),
            events = events.len(),
            "执行保养状态查询"
        );

        let records = match self.reconciler.reconcile(
            &tiers,
            &events,
            request.current_tons,
            request.mode,
            request.custom_range,
        ) {
            Ok(records) => records,
            Err(ReconcileError::EmptyResult) => {
                // 合法空结果: 空行表 + 提示
                return Ok(MachineStatusResponse {
                    card_no: request.card_no.clone(),
                    current_tons: request.current_tons,
                    mode: request.mode,
                    rows: Vec::new(),
                    history: Vec::new(),
                    message: Some(i18n::t("lookup.no_matching_tiers")),
                });
            }
            Err(ReconcileError::MissingCustomRange) => {
                return Err(ApiError::InvalidInput(
                    "自定义范围模式需要提供吨数范围".to_string(),
                ));
            }
        };

        let rows: Vec<ReconciliationRow> =
            records.iter().map(ReconciliationRow::from_record).collect();

        // 逐条历史明细 (richer variant, 按请求开启)
        let history = if request.include_history {
            let applicable = self
                .reconciler
                .select_applicable_tiers(
                    &tiers,
                    request.current_tons,
                    request.mode,
                    request.custom_range,
                )
                .unwrap_or_default();
            applicable
                .iter()
                .flat_map(|tier| self.reconciler.tier_event_details(tier, &events))
                .map(|detail| HistoryRow::from_detail(&detail))
                .collect()
        } else {
            Vec::new()
        };

        let message = if records.iter().all(|r| r.matching_events == 0) {
            Some(i18n::t("lookup.no_events"))
        } else {
            None
        };

        Ok(MachineStatusResponse {
            card_no: request.card_no.clone(),
            current_tons: request.current_tons,
            mode: request.mode,
            rows,
            history,
            message,
        })
    }

    /// 列出存在记录表的机台号 (按表名前缀识别)
    pub fn list_cards(&self) -> ApiResult<Vec<String>> {
        let workbook = self.store.load_all()?;
        Ok(workbook
            .names()
            .iter()
            .filter_map(|name| name.strip_prefix(self.card_table_prefix.as_str()))
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn validate(&self, request: &CheckMachineStatusRequest) -> ApiResult<()> {
        if request.card_no.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台号不能为空".to_string()));
        }
        if request.current_tons < 0.0 {
            return Err(ApiError::InvalidInput("当前吨数不能为负".to_string()));
        }
        if request.mode == ViewMode::CustomRange {
            match request.custom_range {
                Some((low, high)) if low > high => {
                    return Err(ApiError::InvalidInput(
                        "自定义范围下界不能大于上界".to_string(),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
