//! 複数公告の一括解析
//!
//! 公告ごとに独立して解析し、失敗は公告単位で記録する。
//! 1件の失敗でバッチ全体を止めない。

use super::analyze_announcement;
use super::cache::ResultCache;
use crate::error::{BidRateError, Result};
use crate::fetcher::RecordSource;
use bid_rate_common::{
    align, AnalysisFailure, AnnouncementAnalysis, AnnouncementResult, BasePricePolicy,
    UnifiedComparisonTable,
};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use regex::Regex;

/// 1回に受け付ける公告数の上限
pub const MAX_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 同時に解析する公告数
    pub workers: usize,
    pub policy: BasePricePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            policy: BasePricePolicy::default(),
        }
    }
}

/// 一括解析の結果
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// 1行以上の結果が出た公告（入力順）
    pub results: Vec<AnnouncementAnalysis>,
    /// 失敗した公告（入力順）
    pub failures: Vec<AnalysisFailure>,
    pub comparison: UnifiedComparisonTable,
    pub cache_hits: usize,
}

impl BatchReport {
    /// 全公告を同じ原因で失敗扱いにする（取得元を作れなかった場合など）
    pub fn all_failed(announcement_ids: &[String], error: &BidRateError) -> Self {
        Self {
            failures: announcement_ids
                .iter()
                .map(|id| failure(id, error))
                .collect(),
            ..Self::default()
        }
    }

    pub fn announcement_results(&self) -> Vec<AnnouncementResult> {
        self.results.iter().map(|a| a.result.clone()).collect()
    }
}

fn failure(announcement_id: &str, error: &BidRateError) -> AnalysisFailure {
    AnalysisFailure {
        announcement_id: announcement_id.to_string(),
        category: error.category(),
        message: error.to_string(),
    }
}

/// 入力テキストから公告番号を取り出す（改行・カンマ・空白区切り）
///
/// 件数は重複を除く前の入力数で判定し、重複は先着のみ残す。
pub fn parse_announcement_ids(input: &str) -> Result<Vec<String>> {
    let tokens: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() || tokens.len() > MAX_BATCH_SIZE {
        return Err(BidRateError::InvalidBatchSize(tokens.len()));
    }

    let mut ids: Vec<String> = Vec::new();
    for token in tokens {
        if ids.iter().any(|id| id == token) {
            tracing::debug!(announcement_id = token, "重複する公告番号を除外");
            continue;
        }
        ids.push(token.to_string());
    }
    Ok(ids)
}

/// 公告番号の件数チェック（1〜10件）
pub fn validate_batch(announcement_ids: &[String]) -> Result<()> {
    if announcement_ids.is_empty() || announcement_ids.len() > MAX_BATCH_SIZE {
        return Err(BidRateError::InvalidBatchSize(announcement_ids.len()));
    }
    Ok(())
}

/// 公告番号の形式チェック（数字、任意で "-次数"）
pub fn validate_announcement_id(announcement_id: &str) -> Result<()> {
    lazy_static::lazy_static! {
        static ref ANNOUNCEMENT_ID_RE: Regex = Regex::new(r"^\d+(-\d{2,3})?$").unwrap();
    }

    if ANNOUNCEMENT_ID_RE.is_match(announcement_id) {
        Ok(())
    } else {
        Err(BidRateError::InvalidAnnouncementId(announcement_id.to_string()))
    }
}

/// 一括解析
///
/// - 件数が範囲外ならバッチ全体をエラーにする
/// - キャッシュにある公告は取得しない
/// - 残りは `workers` 件ずつ並行に解析する
pub async fn run_batch<S: RecordSource>(
    source: &S,
    announcement_ids: &[String],
    cache: &mut ResultCache,
    options: &BatchOptions,
    progress: &ProgressBar,
) -> Result<BatchReport> {
    validate_batch(announcement_ids)?;

    let mut outcomes: Vec<Option<Result<AnnouncementAnalysis>>> =
        announcement_ids.iter().map(|_| None).collect();
    let mut pending = Vec::new();
    let mut cache_hits = 0;

    for (i, id) in announcement_ids.iter().enumerate() {
        match cache.get(id, &options.policy) {
            Some(hit) => {
                tracing::debug!(announcement_id = %id, "キャッシュヒット");
                outcomes[i] = Some(Ok(hit.clone()));
                cache_hits += 1;
                progress.inc(1);
            }
            None => pending.push((i, id.as_str())),
        }
    }

    let policy = &options.policy;
    let fresh: Vec<(usize, Result<AnnouncementAnalysis>)> = stream::iter(pending)
        .map(|(i, id)| async move {
            progress.set_message(id.to_string());
            let outcome = analyze_announcement(source, id, policy).await;
            progress.inc(1);
            (i, outcome)
        })
        .buffer_unordered(options.workers.max(1))
        .collect()
        .await;

    for (i, outcome) in fresh {
        if let Ok(analysis) = &outcome {
            cache.insert(announcement_ids[i].clone(), policy, analysis.clone());
        }
        outcomes[i] = Some(outcome);
    }

    let mut report = BatchReport {
        cache_hits,
        ..BatchReport::default()
    };

    for (id, outcome) in announcement_ids.iter().zip(outcomes) {
        match outcome {
            Some(Ok(analysis)) => {
                if analysis.result.is_empty() {
                    tracing::info!(announcement_id = %id, "結果0行");
                } else {
                    report.results.push(analysis);
                }
            }
            Some(Err(e)) => {
                tracing::warn!(announcement_id = %id, category = %e.category(), "解析失敗: {}", e);
                report.failures.push(failure(id, &e));
            }
            None => {}
        }
    }

    report.comparison = align(&report.announcement_results());
    tracing::info!(
        results = report.results.len(),
        failures = report.failures.len(),
        cache_hits,
        "一括解析完了"
    );

    Ok(report)
}
