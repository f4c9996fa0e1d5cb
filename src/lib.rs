//! 入札査定率解析ツール
//!
//! 公告番号ごとに4種のデータを取得し、bid_rate_common で解析する。

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod analyzer;
pub mod export;
pub mod report;
