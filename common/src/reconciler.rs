//! 入札金額の査定率換算
//!
//! 換算式:
//! `(((入札金額 − A) × 100 / 下限率) + A) × 100 / 基礎金額`
//!
//! 後処理（この順で適用）:
//! 1. 算出不能・重複（小数5桁で同値）を除外。先着優先
//! 2. [90, 110] の範囲外を除外
//! 3. 残った率を小数5桁に丸める

use crate::types::{round_rate, BidRecord, RateKey, ReconcileInputs, ReconciledBid, TopBidder};
use std::collections::HashSet;

/// 表示範囲の下限 (%)
pub const MIN_DISPLAY_RATE: f64 = 90.0;
/// 表示範囲の上限 (%)
pub const MAX_DISPLAY_RATE: f64 = 110.0;

/// 入札金額1件を査定率に換算。下限率または基礎金額が0なら `None`
pub fn reconcile_rate(bid_amount: f64, inputs: &ReconcileInputs) -> Option<f64> {
    if inputs.lower_bound_rate == 0.0 || inputs.base_price == 0.0 {
        return None;
    }
    let a = inputs.a_value;
    let rate = (((bid_amount - a) * 100.0 / inputs.lower_bound_rate) + a) * 100.0 / inputs.base_price;
    rate.is_finite().then_some(rate)
}

/// 範囲判定（両端を含む）
pub fn in_display_range(rate: f64) -> bool {
    (MIN_DISPLAY_RATE..=MAX_DISPLAY_RATE).contains(&rate)
}

/// 換算と後処理の結果
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledBids {
    /// 後処理前（開示順、算出不能を含む）
    pub all: Vec<ReconciledBid>,
    /// 後処理後（開示順、rateは丸め済み）
    pub retained: Vec<ReconciledBid>,
    pub top_bidder: TopBidder,
}

impl ReconciledBids {
    /// (rate, 業者名) の組を返す
    pub fn retained_rates(&self) -> impl Iterator<Item = (f64, &str)> {
        self.retained
            .iter()
            .filter_map(|b| b.rate.map(|r| (r, b.bidder_name.as_str())))
    }
}

/// 公告1件分の入札を換算・絞り込みし、1順位業者を判定する
pub fn reconcile_bids(bids: &[BidRecord], inputs: &ReconcileInputs) -> ReconciledBids {
    let all: Vec<ReconciledBid> = bids
        .iter()
        .map(|b| ReconciledBid {
            bidder_name: b.bidder_name.clone(),
            bid_amount: b.bid_amount,
            rate: reconcile_rate(b.bid_amount, inputs),
        })
        .collect();

    let mut seen = HashSet::new();
    let retained: Vec<ReconciledBid> = all
        .iter()
        .filter_map(|b| {
            let rate = b.rate?;
            if !seen.insert(RateKey::from_rate(rate)) {
                tracing::debug!(bidder = %b.bidder_name, rate, "重複する査定率を除外");
                return None;
            }
            if !in_display_range(rate) {
                return None;
            }
            Some(ReconciledBid {
                rate: Some(round_rate(rate)),
                ..b.clone()
            })
        })
        .collect();

    let top_bidder = classify_top_bidder(&all, &retained);

    ReconciledBids {
        all,
        retained,
        top_bidder,
    }
}

/// 開示順で先頭の業者を後処理後のリストから名前で引く
fn classify_top_bidder(all: &[ReconciledBid], retained: &[ReconciledBid]) -> TopBidder {
    let Some(first) = all.first() else {
        return TopBidder::Unavailable;
    };

    match retained
        .iter()
        .find(|b| b.bidder_name == first.bidder_name)
        .and_then(|b| b.rate)
    {
        Some(rate) => TopBidder::Resolved {
            name: first.bidder_name.clone(),
            rate,
        },
        None => TopBidder::OutOfRange {
            name: first.bidder_name.clone(),
        },
    }
}
