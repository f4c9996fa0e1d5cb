pub mod batch;
pub mod cache;

pub use batch::{
    parse_announcement_ids, run_batch, validate_announcement_id, validate_batch, BatchOptions,
    BatchReport, MAX_BATCH_SIZE,
};
pub use cache::ResultCache;

use crate::error::Result;
use crate::fetcher::{fetch_all, RecordSource};
use bid_rate_common::{analyze_records, AnnouncementAnalysis, BasePricePolicy};

/// 公告1件を取得から解析まで実行
pub async fn analyze_announcement<S: RecordSource>(
    source: &S,
    announcement_id: &str,
    policy: &BasePricePolicy,
) -> Result<AnnouncementAnalysis> {
    validate_announcement_id(announcement_id)?;
    let fetched = fetch_all(source, announcement_id).await?;
    Ok(analyze_records(announcement_id, &fetched, policy)?)
}
