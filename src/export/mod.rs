pub mod excel;

use crate::analyzer::BatchReport;
use crate::error::Result;
use bid_rate_common::{AnalysisFailure, AnnouncementAnalysis, UnifiedComparisonTable};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON出力の構造
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    generated_at: String,
    results: &'a [AnnouncementAnalysis],
    failures: &'a [AnalysisFailure],
    comparison: &'a UnifiedComparisonTable,
}

/// 既定のExcelファイル名（통합_사정율분석_YYYYMMDD_HHMMSS.xlsx）
pub fn default_excel_path(output_dir: &Path) -> PathBuf {
    let now = chrono::Local::now().format("%Y%m%d_%H%M%S");
    output_dir.join(format!("통합_사정율분석_{}.xlsx", now))
}

/// 出力先がディレクトリ（または拡張子なし）なら既定名を付ける
pub fn resolve_excel_path(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        default_excel_path(output)
    } else {
        output.to_path_buf()
    }
}

pub fn export_excel(report: &BatchReport, output: &Path) -> Result<PathBuf> {
    let path = resolve_excel_path(output);
    excel::generate_excel(report, &path)?;
    Ok(path)
}

pub fn export_json(report: &BatchReport, output: &Path) -> Result<()> {
    let doc = JsonExport {
        generated_at: chrono::Local::now().to_rfc3339(),
        results: &report.results,
        failures: &report.failures,
        comparison: &report.comparison,
    };
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(output, json)?;
    Ok(())
}
