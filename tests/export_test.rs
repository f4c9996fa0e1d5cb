//! Excel/JSON出力の統合テスト
//!
//! 書き出したファイルを読み戻してシート構成と行数を確認

use bid_rate_common::export::excel_core::{COMPARISON_SHEET, RATE_SHEET, WARNING_SHEET};
use bid_rate_common::{
    align, combine, generate_candidates, AnalysisFailure, AnnouncementAnalysis, FailureCategory,
    ReconcileInputs, TopBidder,
};
use bid_rate_rust::analyzer::BatchReport;
use bid_rate_rust::export::{export_excel, export_json, resolve_excel_path};
use calamine::{open_workbook, Data, Reader, Xlsx};
use tempfile::tempdir;

fn analysis(id: &str, rates: &[f64], bidders: &[(f64, &str)]) -> AnnouncementAnalysis {
    let candidates = generate_candidates(rates).unwrap();
    let result = combine(id, &candidates, bidders.iter().copied());
    AnnouncementAnalysis {
        result,
        top_bidder: TopBidder::Unavailable,
        inputs: ReconcileInputs {
            lower_bound_rate: 87.745,
            a_value: 0.0,
            base_price: 1_000_000.0,
        },
        price_record_count: rates.len(),
        candidate_count: candidates.len(),
        bid_count: bidders.len(),
    }
}

fn report(failures: Vec<AnalysisFailure>) -> BatchReport {
    let results = vec![
        analysis("20240100001", &[98.0, 99.0, 100.0, 101.0, 102.0], &[(100.3, "갑건설")]),
        analysis("20240100002", &[104.0, 105.0, 106.0, 107.0], &[(100.3, "병건설")]),
    ];
    let per_announcement: Vec<_> = results.iter().map(|a| a.result.clone()).collect();
    BatchReport {
        comparison: align(&per_announcement),
        results,
        failures,
        cache_hits: 0,
    }
}

/// Excel出力（失敗なし）
#[test]
fn test_excel_export_without_failures() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("out").join("result.xlsx");

    let path = export_excel(&report(Vec::new()), &output).expect("Excel生成失敗");
    assert_eq!(path, output);
    assert!(path.exists());

    let mut workbook: Xlsx<_> = open_workbook(&path).expect("Excel読み込み失敗");
    assert_eq!(workbook.sheet_names(), vec![RATE_SHEET, COMPARISON_SHEET]);

    let rates = workbook.worksheet_range(RATE_SHEET).unwrap();
    // 見出し + (5候補 + 1業者) + (1候補 + 1業者)
    assert_eq!(rates.height(), 1 + 6 + 2);
    assert_eq!(rates.get_value((0, 0)), Some(&Data::String("announcementId".into())));
    assert_eq!(rates.get_value((0, 1)), Some(&Data::String("rate".into())));
    assert_eq!(rates.get_value((0, 2)), Some(&Data::String("companyLabel".into())));
    assert_eq!(rates.get_value((1, 0)), Some(&Data::String("20240100001".into())));
    assert_eq!(rates.get_value((1, 1)), Some(&Data::Float(99.5)));
    assert_eq!(rates.get_value((1, 2)), Some(&Data::String("1조합".into())));

    let comparison = workbook.worksheet_range(COMPARISON_SHEET).unwrap();
    // 見出し + 5 + 1 + 共通の100.3
    assert_eq!(comparison.height(), 1 + 7);
    assert_eq!(comparison.get_value((0, 1)), Some(&Data::String("20240100001".into())));
    assert_eq!(comparison.get_value((0, 2)), Some(&Data::String("20240100002".into())));
}

/// 失敗があるときだけ警告シートを作る
#[test]
fn test_excel_export_with_failures() {
    let dir = tempdir().expect("Failed to create temp dir");
    let failures = vec![AnalysisFailure {
        announcement_id: "20240100003".into(),
        category: FailureCategory::Transport,
        message: "HTTP 500".into(),
    }];

    let path = export_excel(&report(failures), &dir.path().join("result.xlsx")).unwrap();
    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert!(workbook.sheet_names().iter().any(|s| s == WARNING_SHEET));

    let warnings = workbook.worksheet_range(WARNING_SHEET).unwrap();
    assert_eq!(warnings.height(), 2);
    assert_eq!(warnings.get_value((1, 0)), Some(&Data::String("20240100003".into())));
}

/// ディレクトリ指定時は既定ファイル名
#[test]
fn test_resolve_excel_path_for_directory() {
    let dir = tempdir().expect("Failed to create temp dir");

    let resolved = resolve_excel_path(dir.path());
    assert_eq!(resolved.parent(), Some(dir.path()));
    let name = resolved.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("통합_사정율분석_"));
    assert!(name.ends_with(".xlsx"));

    let explicit = dir.path().join("a.xlsx");
    assert_eq!(resolve_excel_path(&explicit), explicit);
}

/// JSON出力
#[test]
fn test_json_export() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("result.json");

    export_json(&report(Vec::new()), &path).expect("JSON出力失敗");

    let text = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["comparison"]["announcementIds"][1], "20240100002");
    assert_eq!(json["results"][0]["topBidder"]["status"], "unavailable");
    assert!(json["generatedAt"].is_string());
}
