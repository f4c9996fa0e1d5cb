//! 解析結果キャッシュモジュール
//!
//! 公告番号をキーに解析結果を保持し、同じ公告の再取得をスキップする。
//! 有効期限は読み出し時に判定する。一度書いたエントリは期限切れまで上書きしない。
//! 基礎金額の選び方が変わったエントリはヒットしない。

use crate::error::Result;
use bid_rate_common::{AnnouncementAnalysis, BasePricePolicy};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = "results-cache.json";

/// 既定の有効期限（1時間）
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 公告番号 → 解析結果のマップ
    entries: HashMap<String, CacheEntry>,
    #[serde(skip, default = "default_ttl")]
    ttl: Duration,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub inserted_at: DateTime<Utc>,
    /// 解析時の基礎金額の選び方
    pub policy: BasePricePolicy,
    pub analysis: AnnouncementAnalysis,
}

fn default_ttl() -> Duration {
    Duration::seconds(DEFAULT_TTL_SECONDS)
}

impl ResultCache {
    const CURRENT_VERSION: u32 = 2;

    /// 既定のキャッシュファイルの場所
    pub fn cache_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("bid-rate").join(CACHE_FILE_NAME))
    }

    /// キャッシュファイルを読み込み。無い・壊れている場合は空
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, ResultCache>(reader) {
            Ok(cache) => {
                // バージョンチェック
                if cache.version != Self::CURRENT_VERSION {
                    tracing::warn!("キャッシュバージョン不一致、再生成します");
                    return Self::default();
                }
                cache
            }
            Err(e) => {
                tracing::warn!("キャッシュ読み込み失敗、空として扱う: {}", e);
                Self::default()
            }
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// キャッシュファイルを保存（期限切れは書き出さない）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut live = self.clone();
        live.purge_expired(Utc::now());

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &live)?;
        Ok(())
    }

    fn is_live(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now - entry.inserted_at < self.ttl
    }

    /// キャッシュをルックアップ
    pub fn get(&self, announcement_id: &str, policy: &BasePricePolicy) -> Option<&AnnouncementAnalysis> {
        self.get_at(announcement_id, policy, Utc::now())
    }

    pub fn get_at(
        &self,
        announcement_id: &str,
        policy: &BasePricePolicy,
        now: DateTime<Utc>,
    ) -> Option<&AnnouncementAnalysis> {
        self.entries
            .get(announcement_id)
            .filter(|e| self.is_live(e, now) && e.policy == *policy)
            .map(|e| &e.analysis)
    }

    /// キャッシュに追加。同じ条件の有効なエントリがあれば何もしない
    pub fn insert(
        &mut self,
        announcement_id: String,
        policy: &BasePricePolicy,
        analysis: AnnouncementAnalysis,
    ) -> bool {
        self.insert_at(announcement_id, policy, analysis, Utc::now())
    }

    pub fn insert_at(
        &mut self,
        announcement_id: String,
        policy: &BasePricePolicy,
        analysis: AnnouncementAnalysis,
        now: DateTime<Utc>,
    ) -> bool {
        if self.get_at(&announcement_id, policy, now).is_some() {
            return false;
        }
        self.entries.insert(announcement_id, CacheEntry {
            inserted_at: now,
            policy: policy.clone(),
            analysis,
        });
        true
    }

    /// 期限切れエントリを削除
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| now - e.inserted_at < ttl);
    }

    /// 全件削除
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// キャッシュ件数（期限切れを含む）
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
            ttl: default_ttl(),
        }
    }
}
