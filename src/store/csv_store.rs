// ==========================================
// 梳棉机保养跟踪系统 - CSV 表存储
// ==========================================
// 布局: 数据目录下每表一个 <表名>.csv
// 读写: csv 库, flexible 模式容忍行长度不一致
// ==========================================

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::store::error::{StoreError, StoreResult};
use crate::store::table::{Table, Workbook};
use crate::store::table_store_trait::TableStore;

/// CSV 目录表存储
pub struct CsvTableStore {
    dir: PathBuf,
}

impl CsvTableStore {
    /// # 参数
    /// - dir: 数据目录, 目录内每个 .csv 文件是一张命名表
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 读取单个 CSV 文件为命名表
    fn load_table(&self, path: &Path, name: &str) -> StoreResult<Table> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| StoreError::CsvParseError {
                table: name.to_string(),
                message: e.to_string(),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut table = Table::new(name, columns);
        for result in reader.records() {
            let record = result.map_err(|e| StoreError::CsvParseError {
                table: name.to_string(),
                message: e.to_string(),
            })?;
            let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }
            table.push_row(cells);
        }

        Ok(table)
    }
}

impl TableStore for CsvTableStore {
    /// 加载数据目录下全部命名表
    ///
    /// 文件按名字排序装载, 保证快照的表序稳定
    fn load_all(&self) -> StoreResult<Workbook> {
        if !self.dir.exists() {
            return Err(StoreError::DataDirNotFound(
                self.dir.display().to_string(),
            ));
        }

        let mut csv_paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .collect();
        csv_paths.sort();

        let mut workbook = Workbook::new();
        for path in csv_paths {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            if name.is_empty() {
                continue;
            }

            let table = self.load_table(&path, &name)?;
            tracing::debug!(table = %name, rows = table.row_count(), "已装载数据表");
            workbook.insert(table);
        }

        tracing::info!(tables = workbook.len(), dir = %self.dir.display(), "表存储加载完成");
        Ok(workbook)
    }

    /// 把全部命名表写回数据目录 (整表覆盖)
    fn save_all(&self, workbook: &Workbook) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;

        for table in workbook.tables() {
            let path = self.dir.join(format!("{}.csv", table.name));
            let mut writer = WriterBuilder::new()
                .flexible(true)
                .from_path(&path)
                .map_err(|e| StoreError::CsvWriteError {
                    table: table.name.clone(),
                    message: e.to_string(),
                })?;

            writer
                .write_record(&table.columns)
                .and_then(|_| {
                    for row in &table.rows {
                        writer.write_record(row)?;
                    }
                    writer.flush()?;
                    Ok(())
                })
                .map_err(|e| StoreError::CsvWriteError {
                    table: table.name.clone(),
                    message: e.to_string(),
                })?;
        }

        tracing::info!(tables = workbook.len(), dir = %self.dir.display(), "表存储持久化完成");
        Ok(())
    }
}
