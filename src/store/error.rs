// ==========================================
// 梳棉机保养跟踪系统 - 表存储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================
// 传播策略: 结构性缺失 (表/文件不存在) 对当次查询
// 是致命错误, 立即上报; 单元格级数据质量问题在
// 装载/映射时就地吸收, 不经过这里
// ==========================================

use thiserror::Error;

/// 表存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 结构性缺失 =====
    #[error("缺少数据表: {0}")]
    MissingTable(String),

    #[error("数据目录不存在: {0}")]
    DataDirNotFound(String),

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls）")]
    UnsupportedFormat(String),

    // ===== 解析/读写 =====
    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败 (表 {table}): {message}")]
    CsvParseError { table: String, message: String },

    #[error("CSV 写入失败 (表 {table}): {message}")]
    CsvWriteError { table: String, message: String },

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 表存储结果类型
pub type StoreResult<T> = Result<T, StoreError>;
