// ==========================================
// 梳棉机保养跟踪系统 - 编辑 API
// ==========================================
// 职责: 记录表的受控修改 (追加记录/改单元格)
// 权限: 仅限具备编辑权限的已登录用户
// 持久化: 每次修改整表落盘, 随后后台发布远程副本
// ==========================================

use std::sync::Arc;

use crate::api::dto::AppendEventRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::auth::identity::IdentityProvider;
use crate::config::settings::AppConfig;
use crate::store::mapper::{
    COL_DATE, COL_MAX_TONS, COL_MIN_TONS, COL_NOTES, COL_TECHNICIAN, COL_TONS,
};
use crate::store::table::Table;
use crate::store::table_store_trait::TableStore;
use crate::sync::remote::{spawn_publish, RemoteSync};

/// 编辑 API
pub struct EditApi {
    store: Arc<dyn TableStore>,
    identity: Arc<dyn IdentityProvider>,
    sync: Arc<dyn RemoteSync>,
    card_table_prefix: String,
}

impl EditApi {
    pub fn new(
        store: Arc<dyn TableStore>,
        identity: Arc<dyn IdentityProvider>,
        sync: Arc<dyn RemoteSync>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            identity,
            sync,
            card_table_prefix: config.card_table_prefix.clone(),
        }
    }

    fn card_table_name(&self, card_no: &str) -> String {
        format!("{}{}", self.card_table_prefix, card_no.trim())
    }

    /// 编辑权限检查
    fn ensure_privileged(&self) -> ApiResult<()> {
        let user = self
            .identity
            .current_user()
            .ok_or(ApiError::NotAuthenticated)?;
        if !self.identity.is_privileged() {
            return Err(ApiError::PermissionDenied(user));
        }
        Ok(())
    }

    /// 追加一条保养记录
    ///
    /// 记录表不存在时按默认列新建; 本次完成的项目列
    /// 不存在时追加列 (老行补空), 单元格记 "x"
    pub fn append_event(&self, request: &AppendEventRequest) -> ApiResult<()> {
        self.ensure_privileged()?;

        if request.card_no.trim().is_empty() {
            return Err(ApiError::InvalidInput("机台号不能为空".to_string()));
        }
        if request.min_tons > request.max_tons {
            return Err(ApiError::InvalidInput(
                "区间下界不能大于上界".to_string(),
            ));
        }

        let table_name = self.card_table_name(&request.card_no);
        let mut workbook = self.store.load_all()?;

        if workbook.get(&table_name).is_none() {
            workbook.insert(Table::new(
                table_name.clone(),
                vec![
                    COL_MIN_TONS.to_string(),
                    COL_MAX_TONS.to_string(),
                    COL_DATE.to_string(),
                    COL_TONS.to_string(),
                    COL_TECHNICIAN.to_string(),
                    COL_NOTES.to_string(),
                ],
            ));
            tracing::info!(table = %table_name, "记录表不存在, 已新建");
        }
        let Some(table) = workbook.get_mut(&table_name) else {
            return Err(ApiError::MissingTable(table_name));
        };

        for column in &request.performed {
            table.ensure_column(column);
        }

        let mut row = vec![String::new(); table.columns.len()];
        set_cell(table, &mut row, COL_MIN_TONS, request.min_tons.to_string());
        set_cell(table, &mut row, COL_MAX_TONS, request.max_tons.to_string());
        if let Some(date) = &request.date {
            set_cell(table, &mut row, COL_DATE, date.clone());
        }
        if let Some(tons) = request.tons_at_event {
            set_cell(table, &mut row, COL_TONS, tons.to_string());
        }
        if let Some(technician) = &request.technician {
            set_cell(table, &mut row, COL_TECHNICIAN, technician.clone());
        }
        if let Some(notes) = &request.notes {
            set_cell(table, &mut row, COL_NOTES, notes.clone());
        }
        for column in &request.performed {
            set_cell(table, &mut row, column, "x".to_string());
        }
        table.push_row(row);

        self.store.save_all(&workbook)?;
        tracing::info!(table = %table_name, "保养记录已追加");

        // 后台发布, 失败不影响本次编辑结果
        spawn_publish(Arc::clone(&self.sync));
        Ok(())
    }

    /// 修改记录表单个单元格
    ///
    /// # 参数
    /// - row: 数据行号 (0 起, 不含表头)
    pub fn update_cell(
        &self,
        card_no: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> ApiResult<()> {
        self.ensure_privileged()?;

        let table_name = self.card_table_name(card_no);
        let mut workbook = self.store.load_all()?;
        let table = workbook
            .get_mut(&table_name)
            .ok_or_else(|| ApiError::MissingTable(table_name.clone()))?;

        if row >= table.row_count() {
            return Err(ApiError::InvalidInput(format!(
                "行号越界: {} (共 {} 行)",
                row,
                table.row_count()
            )));
        }

        let col_idx = table.ensure_column(column);
        table.rows[row][col_idx] = value.to_string();

        self.store.save_all(&workbook)?;
        tracing::info!(table = %table_name, row, column, "单元格已更新");

        spawn_publish(Arc::clone(&self.sync));
        Ok(())
    }
}

/// 按列名写入行缓冲 (列必然已存在)
fn set_cell(table: &Table, row: &mut Vec<String>, column: &str, value: String) {
    if let Some(idx) = table.column_index(column) {
        if idx >= row.len() {
            row.resize(idx + 1, String::new());
        }
        row[idx] = value;
    }
}
