//! 取得データの抽出・検証
//!
//! data.go.kr のレスポンスは `response.body.items` の形が一定しない:
//! - 配列
//! - 単一オブジェクト
//! - `{"item": [...]}` / `{"item": {...}}`（XML由来のラッパー）
//! - 空文字列 / null（0件）
//!
//! ここで必ず `Vec<Record>` に揃え、以降の処理では形を分岐しない。

use crate::error::{Error, Result};
use crate::types::{BidRecord, RawPriceRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 1レコード
pub type Record = Map<String, Value>;

/// グループ名（エラー表示用）
pub mod groups {
    pub const PRICE_DETAIL: &str = "preliminary price detail";
    pub const LOWER_BOUND: &str = "lower bound rate";
    pub const COST_BREAKDOWN: &str = "cost breakdown";
    pub const BID_RESULTS: &str = "bid opening results";
}

/// 項目名
pub mod fields {
    pub const BASE_AMOUNT: &str = "bssamt";
    pub const BASIC_PLANNED_PRICE: &str = "bsisPlnprc";
    pub const LOWER_BOUND_RATE: &str = "sucsfbidLwltRate";
    pub const BID_AMOUNT: &str = "bidprcAmt";
    pub const BIDDER_NAME: &str = "prcbdrNm";

    /// A値を構成する費目
    pub const COST_COMPONENTS: &[&str] = &[
        "sftyMngcst",            // 安全管理費
        "sftyChckMngcst",        // 安全点検費
        "rtrfundNon",            // 退職金（返還対象外）
        "mrfnHealthInsrprm",     // 健康保険料
        "npnInsrprm",            // 年金保険料
        "odsnLngtrmrcprInsrprm", // 長期療養保険料
        "qltyMngcst",            // 品質管理費
    ];
}

/// 基礎金額を採るレコードの選び方
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePricePolicy {
    /// 種別コードを持つ項目名
    pub kind_field: Option<String>,
    /// 基準とする種別コード
    pub kind_code: Option<String>,
}

/// 種別コードが一致しない場合に使う添字
pub const FALLBACK_BASE_PRICE_INDEX: usize = 1;

/// `items` の形を `Vec<Record>` に揃える
pub fn normalize_items(items: &Value) -> Vec<Record> {
    match items {
        Value::Array(values) => values
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect(),
        Value::Object(map) => match map.get("item") {
            Some(inner) => normalize_items(inner),
            None if map.is_empty() => Vec::new(),
            None => vec![map.clone()],
        },
        _ => Vec::new(),
    }
}

/// `response.body` を取り出す。無ければ `MissingData`
fn body<'a>(response: &'a Value, group: &str) -> Result<&'a Value> {
    response
        .get("response")
        .and_then(|r| r.get("body"))
        .filter(|b| b.is_object())
        .ok_or_else(|| Error::missing(group))
}

/// 0件を許すレコード列
pub fn records(response: &Value, group: &str) -> Result<Vec<Record>> {
    let body = body(response, group)?;
    Ok(body.get("items").map(normalize_items).unwrap_or_default())
}

/// 1件以上必須のレコード列
pub fn required_records(response: &Value, group: &str) -> Result<Vec<Record>> {
    let records = records(response, group)?;
    if records.is_empty() {
        return Err(Error::missing(group));
    }
    Ok(records)
}

/// 数値変換。数値・数値文字列（前後空白、桁区切りのカンマ可）を受け付ける
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// 必須の数値項目
pub fn required_number(record: &Record, field: &str) -> Result<f64> {
    let value = record
        .get(field)
        .ok_or_else(|| Error::missing(field))?;
    coerce_number(value).ok_or_else(|| Error::malformed(field, display_value(value)))
}

/// 任意の数値項目。無い・数値でない場合は0
pub fn optional_number(record: &Record, field: &str) -> f64 {
    record.get(field).and_then(coerce_number).unwrap_or(0.0)
}

fn text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}

/// 複数予価の明細を抽出（取得A）
pub fn extract_price_records(response: &Value, policy: &BasePricePolicy) -> Result<Vec<RawPriceRecord>> {
    required_records(response, groups::PRICE_DETAIL)?
        .iter()
        .map(|record| {
            let base_amount = required_number(record, fields::BASE_AMOUNT)?;
            if base_amount <= 0.0 {
                return Err(Error::malformed(fields::BASE_AMOUNT, base_amount.to_string()));
            }
            let basic_planned_price = required_number(record, fields::BASIC_PLANNED_PRICE)?;
            if basic_planned_price <= 0.0 {
                return Err(Error::malformed(
                    fields::BASIC_PLANNED_PRICE,
                    basic_planned_price.to_string(),
                ));
            }
            let price_kind_code = policy
                .kind_field
                .as_deref()
                .and_then(|field| text(record, field));
            Ok(RawPriceRecord {
                base_amount,
                basic_planned_price,
                price_kind_code,
            })
        })
        .collect()
}

/// 基準となる基礎金額を選ぶ
///
/// 1. 種別コードが一致する最初のレコード
/// 2. 添字 `FALLBACK_BASE_PRICE_INDEX` のレコード
/// 3. 1件しかなければ先頭
pub fn select_base_price(records: &[RawPriceRecord], policy: &BasePricePolicy) -> Result<f64> {
    if let Some(code) = policy.kind_code.as_deref() {
        if let Some(record) = records
            .iter()
            .find(|r| r.price_kind_code.as_deref() == Some(code))
        {
            return Ok(record.base_amount);
        }
        tracing::debug!(code, "種別コード一致なし、添字で選択");
    }

    records
        .get(FALLBACK_BASE_PRICE_INDEX)
        .or_else(|| records.first())
        .map(|r| r.base_amount)
        .ok_or_else(|| Error::missing(groups::PRICE_DETAIL))
}

/// 落札下限率を抽出（取得B）
pub fn extract_lower_bound_rate(response: &Value) -> Result<f64> {
    let records = required_records(response, groups::LOWER_BOUND)?;
    required_number(&records[0], fields::LOWER_BOUND_RATE)
}

/// A値を算出（取得C）。データが無くても0として続行する
pub fn extract_a_value(response: &Value) -> f64 {
    let records = match records(response, groups::COST_BREAKDOWN) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("A値データなし、0として扱う: {}", e);
            return 0.0;
        }
    };
    let Some(first) = records.first() else {
        tracing::warn!("A値データ0件、0として扱う");
        return 0.0;
    };
    fields::COST_COMPONENTS
        .iter()
        .map(|field| optional_number(first, field))
        .sum()
}

/// 開札結果を抽出（取得D）
///
/// 金額が数値でないレコードは除外する。0件は正常。
pub fn extract_bid_records(response: &Value) -> Result<Vec<BidRecord>> {
    let records = records(response, groups::BID_RESULTS)?;
    Ok(records
        .iter()
        .filter_map(|record| {
            let bidder_name = text(record, fields::BIDDER_NAME).unwrap_or_default();
            match record.get(fields::BID_AMOUNT).and_then(coerce_number) {
                Some(bid_amount) => Some(BidRecord {
                    bidder_name,
                    bid_amount,
                }),
                None => {
                    tracing::debug!(bidder = %bidder_name, "入札金額が数値でないため除外");
                    None
                }
            }
        })
        .collect())
}
