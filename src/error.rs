use bid_rate_common::FailureCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BidRateError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("サービスキーが設定されていません。`bid-rate config --set-service-key YOUR_KEY` または環境変数 DATA_GO_KR_SERVICE_KEY で設定してください")]
    MissingServiceKey,

    #[error("公告番号は1件から10件までです（入力: {0}件）")]
    InvalidBatchSize(usize),

    #[error("公告番号が不正: {0}")]
    InvalidAnnouncementId(String),

    #[error("{0}")]
    Engine(#[from] bid_rate_common::Error),

    #[error("API呼び出しエラー ({dataset}): {message}")]
    Transport { dataset: String, message: String },

    #[error("API呼び出し失敗 ({dataset}): HTTP {status}")]
    HttpStatus { dataset: String, status: u16 },

    #[error("APIエラー応答 ({dataset}): {code} {message}")]
    ApiResult { dataset: String, code: String, message: String },

    #[error("APIレスポンスのパースに失敗 ({dataset}): {message}")]
    MalformedPayload { dataset: String, message: String },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),
}

impl BidRateError {
    /// 公告単位の失敗分類
    pub fn category(&self) -> FailureCategory {
        match self {
            BidRateError::Engine(e) => e.category(),
            BidRateError::InvalidAnnouncementId(_) => FailureCategory::MalformedField,
            BidRateError::Transport { .. }
            | BidRateError::HttpStatus { .. }
            | BidRateError::ApiResult { .. }
            | BidRateError::MalformedPayload { .. } => FailureCategory::Transport,
            BidRateError::Config(_)
            | BidRateError::MissingServiceKey
            | BidRateError::InvalidBatchSize(_)
            | BidRateError::JsonParse(_)
            | BidRateError::Io(_)
            | BidRateError::ExcelGeneration(_) => FailureCategory::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, BidRateError>;
