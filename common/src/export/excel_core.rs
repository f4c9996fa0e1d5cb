//! Excel生成（共通ライブラリ）
//!
//! シート構成:
//! - 사정율: announcementId, rate, companyLabel（全公告の全行）
//! - 비교표: rate をキーにした公告別の横並び
//! - 경고: 解析に失敗した公告

use crate::types::{AnalysisFailure, AnnouncementResult, UnifiedComparisonTable};
use rust_xlsxwriter::*;

pub const RATE_SHEET: &str = "사정율";
pub const COMPARISON_SHEET: &str = "비교표";
pub const WARNING_SHEET: &str = "경고";

/// 出力対象
pub struct WorkbookContent<'a> {
    pub results: &'a [AnnouncementResult],
    pub comparison: &'a UnifiedComparisonTable,
    pub failures: &'a [AnalysisFailure],
}

/// Excelをバッファに生成
pub fn generate_excel_buffer(content: &WorkbookContent<'_>) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));
    let rate_format = Format::new().set_num_format("0.00000");

    // 사정율
    let sheet = workbook.add_worksheet();
    sheet.set_name(RATE_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    for (col, header) in ["announcementId", "rate", "companyLabel"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }
    let mut row: u32 = 1;
    for result in content.results {
        for rate_row in &result.rows {
            sheet.write_string(row, 0, &rate_row.announcement_id)
                .map_err(|e| format!("公告番号書き込みエラー: {}", e))?;
            sheet.write_number_with_format(row, 1, rate_row.rate, &rate_format)
                .map_err(|e| format!("査定率書き込みエラー: {}", e))?;
            sheet.write_string(row, 2, &rate_row.company_label)
                .map_err(|e| format!("業者名書き込みエラー: {}", e))?;
            row += 1;
        }
    }
    sheet.set_column_width(0, 16)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    sheet.set_column_width(2, 28)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    sheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    // 비교표
    let sheet = workbook.add_worksheet();
    sheet.set_name(COMPARISON_SHEET)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    sheet.write_string_with_format(0, 0, "rate", &header_format)
        .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    for (i, id) in content.comparison.announcement_ids.iter().enumerate() {
        sheet.write_string_with_format(0, (i + 1) as u16, id, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
        sheet.set_column_width((i + 1) as u16, 22)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }
    for (r, unified) in content.comparison.rows.iter().enumerate() {
        let row = (r + 1) as u32;
        sheet.write_number_with_format(row, 0, unified.rate, &rate_format)
            .map_err(|e| format!("査定率書き込みエラー: {}", e))?;
        for (i, label) in unified.labels.iter().enumerate() {
            if let Some(label) = label {
                sheet.write_string(row, (i + 1) as u16, label)
                    .map_err(|e| format!("業者名書き込みエラー: {}", e))?;
            }
        }
    }
    sheet.set_freeze_panes(1, 1)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    // 경고
    if !content.failures.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(WARNING_SHEET)
            .map_err(|e| format!("シート名設定エラー: {}", e))?;
        for (col, header) in ["announcementId", "category", "message"].iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &header_format)
                .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
        }
        for (r, failure) in content.failures.iter().enumerate() {
            let row = (r + 1) as u32;
            sheet.write_string(row, 0, &failure.announcement_id)
                .map_err(|e| format!("公告番号書き込みエラー: {}", e))?;
            sheet.write_string(row, 1, failure.category.to_string())
                .map_err(|e| format!("分類書き込みエラー: {}", e))?;
            sheet.write_string(row, 2, &failure.message)
                .map_err(|e| format!("メッセージ書き込みエラー: {}", e))?;
        }
        sheet.set_column_width(2, 60)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
