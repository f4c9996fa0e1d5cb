//! 公共データポータル（apis.data.go.kr）クライアント
//!
//! 全データセットを `type=json` で取得する。
//! サービスキーはデコード済みの値を設定する（クエリ送信時にエンコードされる）。

use super::{parse_payload, Dataset, RecordSource};
use crate::config::Config;
use crate::error::{BidRateError, Result};
use serde_json::Value;
use std::time::Duration;

/// 接続確立のタイムアウト上限（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;
/// 開札結果の取得件数
const BID_RESULT_ROWS: &str = "999";

pub struct DataGoKrClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl DataGoKrClient {
    pub fn new(config: &Config) -> Result<Self> {
        let service_key = config.get_service_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(CONNECT_TIMEOUT_SECS)))
            .user_agent(concat!("bid-rate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BidRateError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }
}

/// "20240123456-01" → ("20240123456", "01")。次数なしは "00"
pub fn split_announcement_id(announcement_id: &str) -> (&str, &str) {
    match announcement_id.split_once('-') {
        Some((no, ord)) => (no, ord),
        None => (announcement_id, "00"),
    }
}

/// データセットごとのパスとクエリ
fn endpoint<'a>(dataset: Dataset, notice_no: &'a str, notice_ord: &'a str) -> (&'static str, Vec<(&'static str, &'a str)>) {
    match dataset {
        Dataset::PriceDetail => (
            "as/ScsbidInfoService/getOpengResultListInfoCnstwkPreparPcDetail",
            vec![
                ("inqryDiv", "2"),
                ("bidNtceNo", notice_no),
                ("bidNtceOrd", notice_ord),
                ("pageNo", "1"),
                ("numOfRows", "15"),
            ],
        ),
        Dataset::LowerBound => (
            "ad/BidPublicInfoService/getBidPblancListInfoCnstwk",
            vec![
                ("inqryDiv", "2"),
                ("bidNtceNo", notice_no),
                ("pageNo", "1"),
                ("numOfRows", "10"),
            ],
        ),
        Dataset::CostBreakdown => (
            "ad/BidPublicInfoService/getBidPblancListInfoCnstwkBsisAmount",
            vec![
                ("inqryDiv", "2"),
                ("bidNtceNo", notice_no),
                ("pageNo", "1"),
                ("numOfRows", "10"),
            ],
        ),
        Dataset::BidResults => (
            "as/ScsbidInfoService/getOpengResultListInfoOpengCompt",
            vec![
                ("bidNtceNo", notice_no),
                ("pageNo", "1"),
                ("numOfRows", BID_RESULT_ROWS),
            ],
        ),
    }
}

impl RecordSource for DataGoKrClient {
    async fn fetch(&self, dataset: Dataset, announcement_id: &str) -> Result<Value> {
        let (notice_no, notice_ord) = split_announcement_id(announcement_id);
        let (path, mut query) = endpoint(dataset, notice_no, notice_ord);
        query.push(("type", "json"));
        query.push(("ServiceKey", self.service_key.as_str()));

        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%dataset, announcement_id, %url, "API呼び出し");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| BidRateError::Transport {
                dataset: dataset.to_string(),
                message: if e.is_timeout() {
                    format!("タイムアウト: {}", e)
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BidRateError::HttpStatus {
                dataset: dataset.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| BidRateError::Transport {
            dataset: dataset.to_string(),
            message: format!("本文の読み込みに失敗: {}", e),
        })?;

        parse_payload(dataset, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_announcement_id() {
        assert_eq!(split_announcement_id("20240123456"), ("20240123456", "00"));
        assert_eq!(split_announcement_id("20240123456-01"), ("20240123456", "01"));
    }

    #[test]
    fn test_endpoint_queries() {
        let (path, query) = endpoint(Dataset::PriceDetail, "20240123456", "00");
        assert!(path.ends_with("getOpengResultListInfoCnstwkPreparPcDetail"));
        assert!(query.contains(&("bidNtceOrd", "00")));

        let (path, query) = endpoint(Dataset::BidResults, "20240123456", "00");
        assert!(path.ends_with("getOpengResultListInfoOpengCompt"));
        assert!(query.contains(&("numOfRows", "999")));
    }

    #[test]
    fn test_client_requires_service_key() {
        if std::env::var(crate::config::SERVICE_KEY_ENV).is_ok() {
            return;
        }
        let config = Config::default();
        assert!(matches!(
            DataGoKrClient::new(&config),
            Err(BidRateError::MissingServiceKey)
        ));
    }
}
