use bid_rate_rust::{analyzer, cli, config, error, export, fetcher, report};
use analyzer::{BatchOptions, BatchReport, ResultCache};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { announcement_ids, file, output, no_excel, json, no_cache, workers } => {
            println!("🏗️ bid-rate - 査定率解析\n");

            // 1. 公告番号
            let mut input = announcement_ids.join("\n");
            if let Some(path) = file {
                input.push('\n');
                input.push_str(&std::fs::read_to_string(&path)?);
            }
            let ids = analyzer::parse_announcement_ids(&input)?;
            println!("[1/3] 公告番号 {}件", ids.len());

            // 2. 解析
            println!("[2/3] 解析中...{}", if no_cache { "" } else { " (キャッシュ有効)" });
            let batch = match Config::load() {
                Ok(config) => run_analysis(&config, &ids, workers, no_cache).await?,
                Err(e) => BatchReport::all_failed(&ids, &e),
            };
            if batch.cache_hits > 0 {
                println!("✔ キャッシュ使用: {}件", batch.cache_hits);
            }
            println!();

            for analysis in &batch.results {
                println!("{}", report::render_announcement(analysis));
            }
            if batch.results.len() > 1 {
                println!("📈 公告別比較表");
                println!("{}", report::render_comparison(&batch.comparison));
            }
            if batch.results.is_empty() {
                println!("有効な結果がありません（全公告で解析に失敗）");
            }

            // 3. 出力
            println!("[3/3] 結果を保存中...");
            if !batch.results.is_empty() && !no_excel {
                let target = output.unwrap_or_else(|| std::path::PathBuf::from("."));
                let path = export::export_excel(&batch, &target)?;
                println!("✔ Excel出力: {}", path.display());
            }
            if let Some(path) = json {
                export::export_json(&batch, &path)?;
                println!("✔ JSON出力: {}", path.display());
            }

            if !batch.failures.is_empty() {
                println!("\n⚠️ 解析中の警告・エラー:");
                print!("{}", report::render_failures(&batch.failures));
            }

            println!("\n✅ 解析完了");
        }

        Commands::Config { set_service_key, show } => {
            let mut config = Config::load_or_default();

            if let Some(key) = set_service_key {
                config.set_service_key(key)?;
                println!("✔ サービスキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API: {}", config.api_base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  並列数: {}", config.workers);
                println!("  キャッシュ有効期限: {}秒", config.cache_ttl_seconds);
                println!(
                    "  基礎金額の選択: {}",
                    match (&config.base_price_kind_field, &config.base_price_kind_code) {
                        (Some(field), Some(code)) => format!("{} = {}", field, code),
                        _ => "添字1".to_string(),
                    }
                );
                println!("  サービスキー: {}", if config.get_service_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Cache { clear, info } => {
            let Some(cache_path) = ResultCache::cache_path() else {
                println!("キャッシュディレクトリが見つかりません");
                return Ok(());
            };

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = ResultCache::load(&cache_path);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                let mut cache = ResultCache::load(&cache_path);
                let count = cache.len();
                cache.clear();
                match cache.save(&cache_path) {
                    Ok(()) => println!("✔ キャッシュを削除しました（{}件）: {}", count, cache_path.display()),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// 設定済みの取得元で一括解析する。設定不備は公告ごとの失敗として返す
async fn run_analysis(
    config: &Config,
    ids: &[String],
    workers: Option<usize>,
    no_cache: bool,
) -> Result<BatchReport> {
    let ttl = match config.cache_ttl() {
        Ok(ttl) => ttl,
        Err(e) => return Ok(BatchReport::all_failed(ids, &e)),
    };
    let client = match fetcher::DataGoKrClient::new(config) {
        Ok(client) => client,
        Err(e) => return Ok(BatchReport::all_failed(ids, &e)),
    };

    let cache_path = ResultCache::cache_path().filter(|_| !no_cache);
    let mut cache = cache_path
        .as_deref()
        .map(ResultCache::load)
        .unwrap_or_default()
        .with_ttl(ttl);

    let options = BatchOptions {
        workers: workers.unwrap_or(config.workers),
        policy: config.base_price_policy(),
    };

    let progress = ProgressBar::new(ids.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    let batch = analyzer::run_batch(&client, ids, &mut cache, &options, &progress).await?;
    progress.finish_and_clear();

    if let Some(path) = &cache_path {
        if let Err(e) = cache.save(path) {
            tracing::warn!("キャッシュ保存エラー: {}", e);
        }
    }
    Ok(batch)
}
