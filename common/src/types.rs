//! 共通型定義
//!
//! EndpointCheck, CheckResult等のコアデータ型

use serde::{Deserialize, Serialize};

/// エンドポイントチェック定義
///
/// 起動時に設定から構築され、以降は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointCheck {
    /// 表示名
    pub name: String,
    /// 絶対URL
    pub url: String,
    /// チェック方式
    pub mode: CheckMode,
}

impl EndpointCheck {
    /// コンテンツチェックを作成
    pub fn content<I, S>(name: impl Into<String>, url: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            url: url.into(),
            mode: CheckMode::Content {
                expected_keywords: keywords.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// ステータスのみのチェックを作成
    pub fn status_only(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            mode: CheckMode::StatusOnly,
        }
    }
}

/// チェック方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CheckMode {
    /// レスポンス本文にキーワードが含まれるかを検査する
    Content {
        /// 期待するキーワード（順序を保持）
        expected_keywords: Vec<String>,
    },
    /// ステータスコードのみで判定する
    StatusOnly,
}

/// チェック方式の種別（設定ファイル用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckModeKind {
    /// コンテンツチェック（デフォルト）
    #[default]
    Content,
    /// ステータスのみ
    StatusOnly,
}

/// 1件のチェック結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// チェック名
    pub name: String,
    /// 結果
    pub outcome: CheckOutcome,
}

impl CheckResult {
    /// レスポンスを受信できた場合のステータスコード
    pub fn status(&self) -> Option<u16> {
        match &self.outcome {
            CheckOutcome::Success { status, .. } => Some(*status),
            CheckOutcome::Failure { .. } => None,
        }
    }

    /// 通信が完了したか
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Success { .. })
    }
}

/// チェック結果の本体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// レスポンスを受信した（ステータスコードは問わない）
    Success {
        /// HTTPステータスコード
        status: u16,
        /// ステータスの理由句（例: "OK"）
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_text: Option<String>,
        /// レスポンスサイズ（バイト）。不明な場合はNone
        size_bytes: Option<u64>,
        /// 応答までの経過時間（ミリ秒）
        elapsed_ms: u64,
        /// 方式ごとの詳細
        detail: CheckDetail,
    },
    /// 通信レベルの失敗
    Failure {
        /// エラーメッセージ
        error: String,
        /// 失敗の種別
        kind: TransportErrorKind,
    },
}

/// 方式ごとの検査詳細
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckDetail {
    /// ステータスのみの分類
    StatusOnly(StatusClass),
    /// コンテンツ検査
    Content {
        /// キーワードごとの一致結果
        keywords: Vec<KeywordMatch>,
        /// 技術的シグナル
        signals: TechnicalSignals,
    },
}

/// ステータスコードの分類（表示専用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// 200: 稼働中
    Operational,
    /// 500: バックエンドの有効化待ち
    AwaitingActivation,
    /// その他のステータス
    Error(u16),
}

impl StatusClass {
    /// ステータスコードから分類する
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Self::Operational,
            500 => Self::AwaitingActivation,
            other => Self::Error(other),
        }
    }
}

/// キーワード一致結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    /// キーワード
    pub keyword: String,
    /// 本文に含まれていたか
    pub found: bool,
}

/// 本文から得られる技術的シグナル
///
/// 判定には影響しない情報表示用の値。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TechnicalSignals {
    /// `<style>` または `.css` 参照
    pub css: bool,
    /// `<script>` または `.js` 参照
    pub javascript: bool,
    /// viewport指定
    pub responsive: bool,
    /// アイコンフォント
    pub icons: bool,
}

/// 通信失敗の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportErrorKind {
    /// タイムアウト
    Timeout,
    /// 接続失敗（DNS、接続拒否など）
    Connect,
    /// 本文の読み取り失敗
    Body,
    /// その他
    Other,
}

impl TransportErrorKind {
    /// 文字列表現を返す
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Body => "body",
            Self::Other => "other",
        }
    }
}

/// サマリーでの表示ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLabel {
    /// 200
    Ok,
    /// 500（有効化待ち）
    Pending,
    /// その他のステータス
    Other(u16),
    /// 通信失敗
    Error,
}

impl SummaryLabel {
    /// 結果からラベルを決定する
    pub fn for_result(result: &CheckResult) -> Self {
        match result.status() {
            Some(200) => Self::Ok,
            Some(500) => Self::Pending,
            Some(other) => Self::Other(other),
            None => Self::Error,
        }
    }
}

/// サマリーの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    /// チェック名
    pub name: String,
    /// ラベル
    pub label: SummaryLabel,
}

/// 実行全体の集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// 総チェック数
    pub total: usize,
    /// 成功数（200または404）
    pub success_count: usize,
    /// 成功率（%、四捨五入）
    pub success_rate_percent: u32,
    /// 500を返したチェックがあるか
    pub deployment_pending: bool,
    /// 結果ごとのラベル
    pub entries: Vec<SummaryEntry>,
}
