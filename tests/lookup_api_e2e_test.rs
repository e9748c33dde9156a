// ==========================================
// 查询 API 端到端测试
// ==========================================
// 职责: CSV 表存储 -> LookupApi 全链路验证,
//       覆盖对账行表、空结果提示与结构性缺失
// ==========================================

use std::sync::Arc;

use carding_mts::api::dto::CheckMachineStatusRequest;
use carding_mts::api::error::ApiError;
use carding_mts::api::lookup_api::LookupApi;
use carding_mts::config::settings::AppConfig;
use carding_mts::domain::types::ViewMode;
use carding_mts::store::csv_store::CsvTableStore;
use carding_mts::store::table::{Table, Workbook};
use carding_mts::store::table_store_trait::TableStore;

// ==========================================
// 测试辅助函数
// ==========================================

/// 在临时目录准备数据并装配 LookupApi
fn setup_api(dir: &std::path::Path) -> LookupApi {
    let mut plan = Table::new(
        "Service_Plan",
        vec![
            "Min_Tones".to_string(),
            "Max_Tones".to_string(),
            "Service".to_string(),
        ],
    );
    plan.push_row(vec![
        "0".to_string(),
        "500".to_string(),
        "Grease".to_string(),
    ]);
    plan.push_row(vec![
        "1000".to_string(),
        "2000".to_string(),
        "Oil+Filter".to_string(),
    ]);

    let mut card = Table::new(
        "Card5",
        vec![
            "Min_Tones".to_string(),
            "Max_Tones".to_string(),
            "Date".to_string(),
            "Tones".to_string(),
            "Servised by".to_string(),
            "Other".to_string(),
            "Oil".to_string(),
            "Filter".to_string(),
        ],
    );
    card.push_row(vec![
        "1200".to_string(),
        "1800".to_string(),
        "14/03/2025".to_string(),
        "1500".to_string(),
        "Ahmed".to_string(),
        "".to_string(),
        "x".to_string(),
        "".to_string(),
    ]);

    let mut workbook = Workbook::new();
    workbook.insert(plan);
    workbook.insert(card);

    let store = CsvTableStore::new(dir);
    store.save_all(&workbook).unwrap();

    let mut config = AppConfig::default();
    config.data_dir = dir.to_path_buf();
    LookupApi::new(Arc::new(CsvTableStore::new(dir)), &config)
}

fn request(card_no: &str, tons: f64, mode: ViewMode) -> CheckMachineStatusRequest {
    CheckMachineStatusRequest {
        card_no: card_no.to_string(),
        current_tons: tons,
        mode,
        custom_range: None,
        include_history: false,
    }
}

// ==========================================
// 场景
// ==========================================

#[test]
fn test_lookup_done_outstanding_rows() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    let response = api
        .check_machine_status(&request("5", 1500.0, ViewMode::CurrentOnly))
        .unwrap();

    assert_eq!(response.rows.len(), 1);
    let row = &response.rows[0];
    assert_eq!(row.tier_range, "1000 - 2000");
    assert_eq!(row.required, "Oil + Filter");
    assert_eq!(row.done, "Oil");
    assert_eq!(row.outstanding, "Filter");
    assert_eq!(row.last_date, "14/03/2025");
    assert_eq!(row.last_tons, "1500");
    assert_eq!(row.technician, "Ahmed");
    assert_eq!(row.notes, "-");
    assert!(!row.fully_serviced);
    assert!(response.message.is_none());
}

#[test]
fn test_lookup_empty_result_is_message_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    // 600t 不落在任何档位: 合法空结果
    let response = api
        .check_machine_status(&request("5", 600.0, ViewMode::CurrentOnly))
        .unwrap();

    assert!(response.rows.is_empty());
    assert!(response.message.is_some());
}

#[test]
fn test_lookup_placeholder_row_when_no_events_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    // (0,500) 档位没有任何重叠记录: 行保留, 全部未做, "-" 哨兵
    let response = api
        .check_machine_status(&request("5", 100.0, ViewMode::CurrentOnly))
        .unwrap();

    assert_eq!(response.rows.len(), 1);
    let row = &response.rows[0];
    assert_eq!(row.done, "-");
    assert_eq!(row.outstanding, "Grease");
    assert_eq!(row.last_date, "-");
    assert_eq!(row.last_tons, "-");
}

#[test]
fn test_lookup_missing_card_table() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    let err = api
        .check_machine_status(&request("99", 100.0, ViewMode::All))
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingTable(name) if name == "Card99"));
}

#[test]
fn test_lookup_custom_range_requires_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    let mut req = request("5", 0.0, ViewMode::CustomRange);
    let err = api.check_machine_status(&req).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    req.custom_range = Some((0.0, 3000.0));
    let response = api.check_machine_status(&req).unwrap();
    assert_eq!(response.rows.len(), 2);
}

#[test]
fn test_lookup_invalid_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    let err = api
        .check_machine_status(&request("  ", 100.0, ViewMode::All))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api
        .check_machine_status(&request("5", -1.0, ViewMode::All))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_lookup_history_rows() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    let mut req = request("5", 1500.0, ViewMode::CurrentOnly);
    req.include_history = true;

    let response = api.check_machine_status(&req).unwrap();
    assert_eq!(response.history.len(), 1);
    let detail = &response.history[0];
    assert_eq!(detail.event_range, "1200 - 1800");
    assert_eq!(detail.performed, "Oil");
    assert_eq!(detail.technician, "Ahmed");
}

#[test]
fn test_list_cards_by_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let api = setup_api(dir.path());

    let cards = api.list_cards().unwrap();
    assert_eq!(cards, vec!["5"]);
}
