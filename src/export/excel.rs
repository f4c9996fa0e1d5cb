//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに書き出す。

use crate::analyzer::BatchReport;
use crate::error::{BidRateError, Result};
use bid_rate_common::export::excel_core::{generate_excel_buffer, WorkbookContent};
use std::path::Path;

pub fn generate_excel(report: &BatchReport, output_path: &Path) -> Result<()> {
    let results = report.announcement_results();
    let content = WorkbookContent {
        results: &results,
        comparison: &report.comparison,
        failures: &report.failures,
    };
    let buffer = generate_excel_buffer(&content).map_err(BidRateError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;
    Ok(())
}
