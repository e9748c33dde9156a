// ==========================================
// 梳棉机保养跟踪系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 对账错误类型
///
/// EmptyResult 是合法的空结果, 调用方应渲染为提示信息
/// 而不是失败; 与存储层的"表缺失"严格区分
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// 选档结果为空 (有效查询, 无档位命中)
    #[error("没有匹配的保养档位")]
    EmptyResult,

    /// 自定义范围模式未提供范围参数
    #[error("自定义范围模式缺少吨数范围参数")]
    MissingCustomRange,
}
