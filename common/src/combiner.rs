//! 公告単位の結合
//!
//! 組合せ候補と業者の査定率を1つのテーブルにまとめる。
//! 両者が同じ率でも別行として残す。

use crate::types::{round_rate, AnnouncementResult, CandidateRate, RateRow, RateSource};

/// 組合せ行の表示ラベル
pub fn combination_label(candidate: &CandidateRate) -> String {
    format!("{}조합", candidate.label())
}

/// 候補と業者の行を rate 昇順で結合する
///
/// 同率の場合は組合せ行が先、各ソース内は入力順を保つ。
pub fn combine<'a, I>(announcement_id: &str, candidates: &[CandidateRate], bidders: I) -> AnnouncementResult
where
    I: IntoIterator<Item = (f64, &'a str)>,
{
    let mut rows: Vec<RateRow> = candidates
        .iter()
        .map(|c| RateRow {
            rate: round_rate(c.rate),
            company_label: combination_label(c),
            announcement_id: announcement_id.to_string(),
            source: RateSource::Combination,
        })
        .collect();

    rows.extend(bidders.into_iter().map(|(rate, name)| RateRow {
        rate: round_rate(rate),
        company_label: name.to_string(),
        announcement_id: announcement_id.to_string(),
        source: RateSource::Bidder,
    }));

    rows.sort_by(|a, b| a.rate.total_cmp(&b.rate));

    AnnouncementResult {
        announcement_id: announcement_id.to_string(),
        rows,
    }
}
