// ==========================================
// 梳棉机保养跟踪系统 - 命名表抽象
// ==========================================
// Table: 去空白表头 + 字符串单元格行, 保持列序
// Workbook: 命名表的有序集合 (对账的只读快照)
// ==========================================

use serde::{Deserialize, Serialize};

use crate::store::error::{StoreError, StoreResult};

/// 单张数据表
///
/// 单元格一律以字符串承载, 类型化解析 (日期/吨数)
/// 放到映射层按需进行; 行长度与表头对齐 (短行补空)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// 表名 (计划表固定名或 Card<N>)
    pub name: String,

    /// 表头 (装载时已去除首尾空白)
    pub columns: Vec<String>,

    /// 数据行
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// 创建空表, 表头去除首尾空白
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.trim().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// 追加一行, 长度与表头对齐 (超长截断, 不足补空)
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    /// 列名定位 (精确匹配去空白后的表头)
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// 取单元格 (行号越界或列不存在为 None)
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col_idx = self.column_index(column)?;
        self.rows.get(row)?.get(col_idx).map(String::as_str)
    }

    /// 某行的 (列名, 单元格) 对, 按表内列序
    pub fn row_pairs(&self, row: usize) -> Vec<(String, String)> {
        match self.rows.get(row) {
            Some(cells) => self
                .columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// 确保某列存在, 返回列下标 (不存在则追加并给所有行补空)
    pub fn ensure_column(&mut self, column: &str) -> usize {
        if let Some(idx) = self.column_index(column) {
            return idx;
        }
        self.columns.push(column.trim().to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.columns.len() - 1
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 命名表集合
///
/// 保持插入顺序; 同名表后插者覆盖
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    tables: Vec<Table>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换同名表
    pub fn insert(&mut self, table: Table) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    /// 取必需表, 缺失即 MissingTable (对当次查询致命)
    pub fn get_required(&self, name: &str) -> StoreResult<&Table> {
        self.get(name)
            .ok_or_else(|| StoreError::MissingTable(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new(
            "Card5",
            vec![" Min_Tones ".to_string(), "Oil".to_string()],
        );
        table.push_row(vec!["100".to_string(), "x".to_string()]);
        table.push_row(vec!["200".to_string()]);
        table
    }

    #[test]
    fn test_headers_trimmed_and_rows_padded() {
        let table = sample_table();
        assert_eq!(table.columns, vec!["Min_Tones", "Oil"]);
        assert_eq!(table.cell(1, "Oil"), Some(""));
    }

    #[test]
    fn test_cell_and_row_pairs() {
        let table = sample_table();
        assert_eq!(table.cell(0, "Min_Tones"), Some("100"));
        assert_eq!(table.cell(0, "Missing"), None);
        assert_eq!(
            table.row_pairs(0),
            vec![
                ("Min_Tones".to_string(), "100".to_string()),
                ("Oil".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_ensure_column_backfills() {
        let mut table = sample_table();
        let idx = table.ensure_column("Filter");
        assert_eq!(idx, 2);
        assert_eq!(table.cell(0, "Filter"), Some(""));
        // 已存在的列直接返回下标
        assert_eq!(table.ensure_column("Oil"), 1);
    }

    #[test]
    fn test_workbook_insert_replace_and_required() {
        let mut workbook = Workbook::new();
        workbook.insert(sample_table());
        workbook.insert(Table::new("Service_Plan", vec!["Service".to_string()]));
        assert_eq!(workbook.len(), 2);

        // 同名覆盖
        workbook.insert(Table::new("Card5", vec!["Date".to_string()]));
        assert_eq!(workbook.len(), 2);
        assert_eq!(workbook.get("Card5").unwrap().columns, vec!["Date"]);

        assert!(workbook.get_required("Service_Plan").is_ok());
        let err = workbook.get_required("Card9").unwrap_err();
        assert!(matches!(err, StoreError::MissingTable(name) if name == "Card9"));
    }
}
