use crate::error::{BidRateError, Result};
use bid_rate_common::BasePricePolicy;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SERVICE_KEY_ENV: &str = "DATA_GO_KR_SERVICE_KEY";
pub const DEFAULT_API_BASE_URL: &str = "http://apis.data.go.kr/1230000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service_key: Option<String>,
    pub api_base_url: String,
    /// リクエスト全体のタイムアウト（秒）
    pub timeout_seconds: u64,
    /// 同時に解析する公告数
    pub workers: usize,
    pub cache_ttl_seconds: i64,
    /// 基礎金額の種別コードを持つ項目名
    pub base_price_kind_field: Option<String>,
    /// 基準とする種別コード
    pub base_price_kind_code: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 設定ファイルを読み込み、値を検証する
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default_config());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            BidRateError::Config(format!("{} を読み込めません: {}", config_path.display(), e))
        })?;
        config.cache_ttl()?;
        Ok(config)
    }

    /// 設定が壊れていても編集できるよう既定値で続行する
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("設定を読み込めないため既定値を使用: {}", e);
            Self::default_config()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BidRateError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("bid-rate").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            service_key: None,
            api_base_url: DEFAULT_API_BASE_URL.into(),
            timeout_seconds: 20,
            workers: 4,
            cache_ttl_seconds: 3600,
            base_price_kind_field: None,
            base_price_kind_code: None,
        }
    }

    pub fn get_service_key(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(key) = std::env::var(SERVICE_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.service_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(BidRateError::MissingServiceKey)
    }

    pub fn set_service_key(&mut self, key: String) -> Result<()> {
        self.service_key = Some(key);
        self.save()
    }

    /// キャッシュの有効期限（0以上、chronoで表せる範囲）
    pub fn cache_ttl(&self) -> Result<Duration> {
        if self.cache_ttl_seconds < 0 {
            return Err(BidRateError::Config(format!(
                "cache_ttl_seconds は0以上を指定してください: {}",
                self.cache_ttl_seconds
            )));
        }
        Duration::try_seconds(self.cache_ttl_seconds).ok_or_else(|| {
            BidRateError::Config(format!(
                "cache_ttl_seconds が大きすぎます: {}",
                self.cache_ttl_seconds
            ))
        })
    }

    pub fn base_price_policy(&self) -> BasePricePolicy {
        BasePricePolicy {
            kind_field: self.base_price_kind_field.clone(),
            kind_code: self.base_price_kind_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "workers": 2 }"#).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.timeout_seconds, 20);
        assert_eq!(config.cache_ttl_seconds, 3600);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_base_price_policy() {
        let config = Config {
            base_price_kind_field: Some("kind".into()),
            base_price_kind_code: Some("1".into()),
            ..Config::default()
        };
        let policy = config.base_price_policy();
        assert_eq!(policy.kind_field.as_deref(), Some("kind"));
        assert_eq!(policy.kind_code.as_deref(), Some("1"));
    }

    #[test]
    fn test_cache_ttl_bounds() {
        let ttl = |secs: i64| Config { cache_ttl_seconds: secs, ..Config::default() }.cache_ttl();

        assert_eq!(ttl(3600).unwrap(), Duration::hours(1));
        assert_eq!(ttl(0).unwrap(), Duration::zero());
        assert!(matches!(ttl(-1), Err(BidRateError::Config(_))));
        assert!(matches!(ttl(i64::MAX), Err(BidRateError::Config(_))));
    }
}
