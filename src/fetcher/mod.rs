//! 公告データ取得
//!
//! 4種のデータセットを同じ公告番号で取得する。
//! `RecordSource` を実装すれば取得元を差し替えられる（テストでは固定JSON）。

mod data_go_kr;

pub use data_go_kr::DataGoKrClient;

use crate::error::{BidRateError, Result};
use bid_rate_common::FetchedRecords;
use serde_json::Value;

/// 取得対象のデータセット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// A: 複数予価明細
    PriceDetail,
    /// B: 落札下限率
    LowerBound,
    /// C: 基礎金額内訳（A値）
    CostBreakdown,
    /// D: 開札結果
    BidResults,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::PriceDetail,
        Dataset::LowerBound,
        Dataset::CostBreakdown,
        Dataset::BidResults,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::PriceDetail => "複数予価",
            Dataset::LowerBound => "落札下限率",
            Dataset::CostBreakdown => "A値",
            Dataset::BidResults => "開札結果",
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// データ取得元
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    /// データセット1つ分のレスポンスJSONを取得
    async fn fetch(&self, dataset: Dataset, announcement_id: &str) -> Result<Value>;
}

/// 4種を同時に取得して結合
pub async fn fetch_all<S: RecordSource>(source: &S, announcement_id: &str) -> Result<FetchedRecords> {
    let (price_detail, lower_bound, cost_breakdown, bid_results) = tokio::join!(
        source.fetch(Dataset::PriceDetail, announcement_id),
        source.fetch(Dataset::LowerBound, announcement_id),
        source.fetch(Dataset::CostBreakdown, announcement_id),
        source.fetch(Dataset::BidResults, announcement_id),
    );

    Ok(FetchedRecords {
        price_detail: price_detail?,
        lower_bound: lower_bound?,
        cost_breakdown: cost_breakdown?,
        bid_results: bid_results?,
    })
}

/// レスポンス本文をJSONとして解釈し、ヘッダーの結果コードを確認する
///
/// 結果コード "00" 以外（サービスキー未登録など）は通信エラー扱い。
pub fn parse_payload(dataset: Dataset, body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body).map_err(|e| BidRateError::MalformedPayload {
        dataset: dataset.to_string(),
        message: format!("{} ({})", e, snippet(body)),
    })?;

    let header = value.get("response").and_then(|r| r.get("header"));
    if let Some(code) = header.and_then(|h| h.get("resultCode")).and_then(Value::as_str) {
        if code != "00" {
            let message = header
                .and_then(|h| h.get("resultMsg"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(BidRateError::ApiResult {
                dataset: dataset.to_string(),
                code: code.to_string(),
                message,
            });
        }
    }

    Ok(value)
}

fn snippet(body: &str) -> String {
    body.chars().take(80).collect::<String>().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bid_rate_common::FailureCategory;

    #[test]
    fn test_parse_payload_ok() {
        let body = r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL SERVICE."},"body":{"items":[]}}}"#;
        let value = parse_payload(Dataset::PriceDetail, body).unwrap();
        assert!(value["response"]["body"]["items"].is_array());
    }

    #[test]
    fn test_parse_payload_xml_error_body() {
        let body = "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg></cmmMsgHeader></OpenAPI_ServiceResponse>";
        let err = parse_payload(Dataset::BidResults, body).unwrap_err();
        assert!(matches!(err, BidRateError::MalformedPayload { .. }));
        assert_eq!(err.category(), FailureCategory::Transport);
    }

    #[test]
    fn test_parse_payload_result_code() {
        let body = r#"{"response":{"header":{"resultCode":"30","resultMsg":"SERVICE_KEY_IS_NOT_REGISTERED_ERROR"}}}"#;
        let err = parse_payload(Dataset::LowerBound, body).unwrap_err();
        match err {
            BidRateError::ApiResult { code, message, .. } => {
                assert_eq!(code, "30");
                assert!(message.contains("SERVICE_KEY"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
