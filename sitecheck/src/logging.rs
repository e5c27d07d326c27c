//! ロギング初期化ユーティリティ
//!
//! ログはレポート（stdout）と混ざらないようstderrへ出力する。

use tracing_subscriber::EnvFilter;

/// ログレベルを指定する環境変数
pub const LOG_LEVEL_ENV: &str = "SITECHECK_LOG_LEVEL";

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// ログフィルタを構築
///
/// `RUST_LOG`が設定されていればそれを優先し、なければ`SITECHECK_LOG_LEVEL`を使う。
pub fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    })
}

/// tracing-subscriberを初期化
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

/// 未処理のpanicをログに記録するフックを設定
///
/// 既存のフック（標準のpanicメッセージ出力など）は記録後にそのまま呼び出す。
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Unhandled failure");
        previous(info);
    }));
}
