//! エラー型定義

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// エンジン共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// 4件組合せに必要な件数が揃っていない
    #[error("Insufficient data: {required} records required, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// 必須グループが存在しない、または空
    #[error("Missing data: {0}")]
    MissingData(String),

    /// 必須項目が数値に変換できない
    #[error("Malformed field '{field}': {value}")]
    MalformedField { field: String, value: String },
}

impl Error {
    pub fn missing(group: impl Into<String>) -> Self {
        Error::MissingData(group.into())
    }

    pub fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        Error::MalformedField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// バッチ報告用の分類
    pub fn category(&self) -> FailureCategory {
        match self {
            Error::InsufficientData { .. } | Error::MissingData(_) => FailureCategory::MissingData,
            Error::MalformedField { .. } => FailureCategory::MalformedField,
        }
    }
}

/// 公告単位の失敗分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureCategory {
    MissingData,
    MalformedField,
    Transport,
    Configuration,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCategory::MissingData => write!(f, "データなし"),
            FailureCategory::MalformedField => write!(f, "項目不正"),
            FailureCategory::Transport => write!(f, "通信エラー"),
            FailureCategory::Configuration => write!(f, "設定エラー"),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
