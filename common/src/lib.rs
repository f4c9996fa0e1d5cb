//! Bid Rate Common Library
//!
//! 査定率（사정율）解析エンジン。通信を含まない純粋な処理のみ。
//!
//! 処理の流れ:
//! 取得データ → extract → combination / reconciler → combiner → aligner

pub mod types;
pub mod error;
pub mod extract;
pub mod combination;
pub mod reconciler;
pub mod combiner;
pub mod aligner;
pub mod analyzer;
pub mod export;

pub use types::{
    round_rate, AnalysisFailure, AnnouncementAnalysis, AnnouncementResult, BidRecord,
    CandidateRate, RateKey, RateRow, RateSource, RawPriceRecord, ReconcileInputs, ReconciledBid,
    TopBidder, UnifiedComparisonTable, UnifiedRow,
};
pub use error::{Error, FailureCategory, Result};
pub use extract::{normalize_items, BasePricePolicy};
pub use combination::generate_candidates;
pub use reconciler::{reconcile_bids, reconcile_rate, ReconciledBids};
pub use combiner::combine;
pub use aligner::align;
pub use analyzer::{analyze_records, FetchedRecords};
