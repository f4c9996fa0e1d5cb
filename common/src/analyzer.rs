//! 解析ロジック（取得済みデータ → 公告単位の結果）
//!
//! 4種の取得結果から抽出・組合せ・換算・結合までを通しで行う。
//! 通信は含まない純粋な変換。

use crate::combination::generate_candidates;
use crate::combiner::combine;
use crate::error::Result;
use crate::extract::{
    extract_a_value, extract_bid_records, extract_lower_bound_rate, extract_price_records,
    select_base_price, BasePricePolicy,
};
use crate::reconciler::reconcile_bids;
use crate::types::{AnnouncementAnalysis, ReconcileInputs};
use serde_json::Value;

/// 公告1件分の取得結果（レスポンスJSONそのまま）
#[derive(Debug, Clone, Default)]
pub struct FetchedRecords {
    /// 取得A: 複数予価明細
    pub price_detail: Value,
    /// 取得B: 落札下限率
    pub lower_bound: Value,
    /// 取得C: 基礎金額内訳（A値）
    pub cost_breakdown: Value,
    /// 取得D: 開札結果
    pub bid_results: Value,
}

/// 公告1件を解析
pub fn analyze_records(
    announcement_id: &str,
    fetched: &FetchedRecords,
    policy: &BasePricePolicy,
) -> Result<AnnouncementAnalysis> {
    let price_records = extract_price_records(&fetched.price_detail, policy)?;
    let base_rates: Vec<f64> = price_records.iter().map(|r| r.rate()).collect();
    let candidates = generate_candidates(&base_rates)?;

    let inputs = ReconcileInputs {
        lower_bound_rate: extract_lower_bound_rate(&fetched.lower_bound)?,
        a_value: extract_a_value(&fetched.cost_breakdown),
        base_price: select_base_price(&price_records, policy)?,
    };

    let bids = extract_bid_records(&fetched.bid_results)?;
    let reconciled = reconcile_bids(&bids, &inputs);

    tracing::debug!(
        announcement_id,
        candidates = candidates.len(),
        bids = bids.len(),
        retained = reconciled.retained.len(),
        "公告解析完了"
    );

    let result = combine(announcement_id, &candidates, reconciled.retained_rates());

    Ok(AnnouncementAnalysis {
        result,
        top_bidder: reconciled.top_bidder,
        inputs,
        price_record_count: price_records.len(),
        candidate_count: candidates.len(),
        bid_count: bids.len(),
    })
}
