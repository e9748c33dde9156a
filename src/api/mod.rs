// ==========================================
// 梳棉机保养跟踪系统 - API 层
// ==========================================
// 职责: 面向展示层的业务接口; 把对账结果摊平成
//       可直接渲染的有序行表
// ==========================================

pub mod dto;
pub mod edit_api;
pub mod error;
pub mod lookup_api;

pub use dto::{
    AppendEventRequest, CheckMachineStatusRequest, HistoryRow, MachineStatusResponse,
    ReconciliationRow,
};
pub use edit_api::EditApi;
pub use error::{ApiError, ApiResult};
pub use lookup_api::LookupApi;
