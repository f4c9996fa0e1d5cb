use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bid-rate")]
#[command(about = "入札査定率解析ツール（複数予価組合せ・開札結果）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 公告番号（1〜10件）を解析
    Analyze {
        /// 公告番号（例: 20240123456, 20240123456-01）
        announcement_ids: Vec<String>,

        /// 公告番号を列挙したテキストファイル（改行区切り）
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Excel出力先（ファイルまたはディレクトリ、デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Excelを出力しない
        #[arg(long)]
        no_excel: bool,

        /// 解析結果のJSON出力先
        #[arg(long)]
        json: Option<PathBuf>,

        /// キャッシュを使わない
        #[arg(long)]
        no_cache: bool,

        /// 同時に解析する公告数（省略時は設定値）
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// 設定を表示/編集
    Config {
        /// サービスキーを設定
        #[arg(long)]
        set_service_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
