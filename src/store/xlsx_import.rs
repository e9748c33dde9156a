// ==========================================
// 梳棉机保养跟踪系统 - 旧 Excel 工作簿导入
// ==========================================
// 现场旧数据是单个 Excel 工作簿 (每台机一个
// sheet + 计划 sheet); 导入即把每个 sheet 读成
// 一张命名表, 之后统一落到 CSV 表存储
// ==========================================

use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};

use crate::store::error::{StoreError, StoreResult};
use crate::store::table::{Table, Workbook};

pub struct XlsxImporter;

impl XlsxImporter {
    /// 导入 Excel 工作簿为命名表集合
    ///
    /// # 规则
    /// - 每个 sheet -> 一张同名表
    /// - 第一行为表头 (去空白), 其余为数据行
    /// - 完全空白的行跳过
    /// - 无数据行的 sheet 读成空表 (表头为空)
    pub fn import<P: AsRef<Path>>(&self, file_path: P) -> StoreResult<Workbook> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(StoreError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件
        let mut workbook_file: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| StoreError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook_file.sheet_names().to_owned();
        if sheet_names.is_empty() {
            return Err(StoreError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        let mut workbook = Workbook::new();
        for sheet_name in sheet_names {
            let range = workbook_file
                .worksheet_range(&sheet_name)
                .map_err(|e| StoreError::ExcelParseError(e.to_string()))?;

            let mut rows = range.rows();

            // 表头 (第一行)
            let columns: Vec<String> = match rows.next() {
                Some(header_row) => header_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect(),
                None => Vec::new(),
            };

            let mut table = Table::new(sheet_name.clone(), columns);
            for data_row in rows {
                let cells: Vec<String> = data_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect();

                // 跳过完全空白的行
                if cells.iter().all(|v| v.is_empty()) {
                    continue;
                }
                table.push_row(cells);
            }

            tracing::debug!(sheet = %sheet_name, rows = table.row_count(), "已导入工作表");
            workbook.insert(table);
        }

        tracing::info!(
            tables = workbook.len(),
            file = %path.display(),
            "Excel 工作簿导入完成"
        );
        Ok(workbook)
    }
}
