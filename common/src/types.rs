//! 解析結果の型定義
//!
//! CLIとエンジンで共有される型:
//! - RawPriceRecord / BidRecord: 取得データから抽出した入力
//! - CandidateRate / ReconciledBid: 組合せ・業者ごとの査定率
//! - AnnouncementResult / AnnouncementAnalysis: 公告単位の結果
//! - UnifiedComparisonTable: 複数公告の横並び比較表

use crate::error::FailureCategory;
use serde::{Deserialize, Serialize};

/// 査定率の小数桁数
pub const RATE_DECIMALS: i32 = 5;

const RATE_SCALE: f64 = 100_000.0;

/// 査定率を小数5桁に丸める
pub fn round_rate(rate: f64) -> f64 {
    (rate * RATE_SCALE).round() / RATE_SCALE
}

/// 小数5桁単位の整数キー（同一率の突合せ用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RateKey(i64);

impl RateKey {
    pub fn from_rate(rate: f64) -> Self {
        RateKey((rate * RATE_SCALE).round() as i64)
    }

    pub fn rate(self) -> f64 {
        self.0 as f64 / RATE_SCALE
    }
}

/// 複数予価の1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceRecord {
    /// 基礎金額 (bssamt)
    pub base_amount: f64,
    /// 予備価格 (bsisPlnprc)
    pub basic_planned_price: f64,
    #[serde(default)]
    pub price_kind_code: Option<String>,
}

impl RawPriceRecord {
    pub fn rate(&self) -> f64 {
        self.basic_planned_price / self.base_amount * 100.0
    }
}

/// 4件組合せ1つの平均率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRate {
    pub rate: f64,
    /// ソート後の順位（1始まり）
    pub combination_index: usize,
}

impl CandidateRate {
    pub fn label(&self) -> String {
        self.combination_index.to_string()
    }
}

/// 開札結果の1社
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRecord {
    pub bidder_name: String,
    pub bid_amount: f64,
}

/// 査定率換算後の入札。`rate == None` は算出不能
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledBid {
    pub bidder_name: String,
    pub bid_amount: f64,
    pub rate: Option<f64>,
}

/// 換算式の入力値
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileInputs {
    /// 落札下限率 (%)
    pub lower_bound_rate: f64,
    /// A値
    pub a_value: f64,
    /// 基準となる基礎金額
    pub base_price: f64,
}

/// 行の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateSource {
    Combination,
    Bidder,
}

/// 公告別テーブルの1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRow {
    pub rate: f64,
    pub company_label: String,
    pub announcement_id: String,
    pub source: RateSource,
}

/// 公告単位の結合テーブル（rate昇順）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResult {
    pub announcement_id: String,
    pub rows: Vec<RateRow>,
}

impl AnnouncementResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 1順位業者の判定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TopBidder {
    /// 範囲内の査定率あり
    Resolved { name: String, rate: f64 },
    /// 開札結果にはあるが範囲外で除外
    OutOfRange { name: String },
    /// 開札結果なし
    Unavailable,
}

impl TopBidder {
    pub fn name(&self) -> Option<&str> {
        match self {
            TopBidder::Resolved { name, .. } | TopBidder::OutOfRange { name } => Some(name),
            TopBidder::Unavailable => None,
        }
    }

    pub fn rate(&self) -> Option<f64> {
        match self {
            TopBidder::Resolved { rate, .. } => Some(*rate),
            _ => None,
        }
    }
}

/// 公告1件の解析結果（キャッシュ単位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementAnalysis {
    pub result: AnnouncementResult,
    pub top_bidder: TopBidder,
    pub inputs: ReconcileInputs,
    pub price_record_count: usize,
    pub candidate_count: usize,
    /// 抽出済み（金額が数値の）入札件数
    pub bid_count: usize,
}

impl AnnouncementAnalysis {
    pub fn announcement_id(&self) -> &str {
        &self.result.announcement_id
    }
}

/// 比較表の1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedRow {
    pub rate: f64,
    /// announcement_ids と同じ順序
    pub labels: Vec<Option<String>>,
}

/// 複数公告をrateで外部結合した比較表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedComparisonTable {
    pub announcement_ids: Vec<String>,
    pub rows: Vec<UnifiedRow>,
}

/// 解析に失敗した公告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisFailure {
    pub announcement_id: String,
    pub category: FailureCategory,
    pub message: String,
}
