//! sitecheck
//!
//! 既知のURLに順番にGETリクエストを送り、ステータスコードと
//! 本文のキーワードを確認するスモークテストランナー

#![warn(missing_docs)]

/// 共通型定義（sitecheck-commonの再エクスポート）
pub use sitecheck_common as common;

/// エンドポイントチェッカー
pub mod checker;

/// CLIインターフェース
pub mod cli;

/// エラー型
pub mod error;

/// レスポンス検査と集計
pub mod inspect;

/// ロギング初期化ユーティリティ
pub mod logging;

/// レポート出力
pub mod report;

pub use checker::{CheckRunner, NoopObserver, RunObserver, RunnerSettings};
pub use error::CheckError;
