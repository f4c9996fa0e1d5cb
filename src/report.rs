//! 端末表示
//!
//! 公告ごとの1順位業者と結合テーブル、比較表、警告一覧を文字列にする。

use bid_rate_common::{AnalysisFailure, AnnouncementAnalysis, TopBidder, UnifiedComparisonTable};
use std::fmt::Write;

/// 1順位業者の行に付ける印
pub const TOP_BIDDER_MARK: &str = "✨";

/// 1順位業者の表示行
pub fn top_bidder_line(analysis: &AnnouncementAnalysis) -> String {
    let id = analysis.announcement_id();
    match &analysis.top_bidder {
        TopBidder::Resolved { name, rate } => {
            format!("公告番号 {}: {} (査定率: {:.5}%)", id, name, rate)
        }
        TopBidder::OutOfRange { name } => {
            format!("公告番号 {}: {} (査定率: 範囲外)", id, name)
        }
        TopBidder::Unavailable => format!("公告番号 {}: 開札結果なし", id),
    }
}

/// 公告1件の結合テーブル
pub fn render_announcement(analysis: &AnnouncementAnalysis) -> String {
    let mut out = String::new();
    let top_name = analysis.top_bidder.name();

    let _ = writeln!(out, "{}", top_bidder_line(analysis));
    let _ = writeln!(out, "{:>12}  業者名", "rate");
    for row in &analysis.result.rows {
        let mark = if Some(row.company_label.as_str()) == top_name {
            format!("{} ", TOP_BIDDER_MARK)
        } else {
            String::new()
        };
        let _ = writeln!(out, "{:>12.5}  {}{}", row.rate, mark, row.company_label);
    }
    out
}

/// 比較表
pub fn render_comparison(table: &UnifiedComparisonTable) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>12}", "rate");
    for id in &table.announcement_ids {
        let _ = write!(out, "  {:<20}", id);
    }
    out.push('\n');

    for row in &table.rows {
        let _ = write!(out, "{:>12.5}", row.rate);
        for label in &row.labels {
            let _ = write!(out, "  {:<20}", label.as_deref().unwrap_or("-"));
        }
        out.push('\n');
    }
    out
}

/// 警告一覧
pub fn render_failures(failures: &[AnalysisFailure]) -> String {
    let mut out = String::new();
    for f in failures {
        let _ = writeln!(out, "⚠️ 公告番号 {} [{}] {}", f.announcement_id, f.category, f.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bid_rate_common::{
        AnnouncementResult, FailureCategory, RateRow, RateSource, ReconcileInputs, UnifiedRow,
    };

    fn analysis(top_bidder: TopBidder) -> AnnouncementAnalysis {
        let row = |rate: f64, label: &str, source| RateRow {
            rate,
            company_label: label.to_string(),
            announcement_id: "20240100001".to_string(),
            source,
        };
        AnnouncementAnalysis {
            result: AnnouncementResult {
                announcement_id: "20240100001".to_string(),
                rows: vec![
                    row(99.5, "1조합", RateSource::Combination),
                    row(100.3, "갑건설", RateSource::Bidder),
                ],
            },
            top_bidder,
            inputs: ReconcileInputs::default(),
            price_record_count: 4,
            candidate_count: 1,
            bid_count: 1,
        }
    }

    #[test]
    fn test_top_bidder_line_variants() {
        let resolved = analysis(TopBidder::Resolved { name: "갑건설".into(), rate: 100.3 });
        assert_eq!(top_bidder_line(&resolved), "公告番号 20240100001: 갑건설 (査定率: 100.30000%)");

        let out = analysis(TopBidder::OutOfRange { name: "을건설".into() });
        assert!(top_bidder_line(&out).contains("範囲外"));

        let none = analysis(TopBidder::Unavailable);
        assert!(top_bidder_line(&none).contains("開札結果なし"));
    }

    #[test]
    fn test_render_marks_top_bidder() {
        let text = render_announcement(&analysis(TopBidder::Resolved { name: "갑건설".into(), rate: 100.3 }));
        assert!(text.contains("✨ 갑건설"));
        assert!(!text.contains("✨ 1조합"));
    }

    #[test]
    fn test_render_comparison_empty_cells() {
        let table = UnifiedComparisonTable {
            announcement_ids: vec!["A".into(), "B".into()],
            rows: vec![UnifiedRow { rate: 100.0, labels: vec![Some("x".into()), None] }],
        };
        let text = render_comparison(&table);
        assert!(text.contains("100.00000"));
        assert!(text.contains(" - "));
    }

    #[test]
    fn test_render_failures() {
        let text = render_failures(&[AnalysisFailure {
            announcement_id: "1".into(),
            category: FailureCategory::Transport,
            message: "HTTP 500".into(),
        }]);
        assert!(text.contains("[通信エラー]"));
    }
}
