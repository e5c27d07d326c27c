//! エンドポイントチェッカー
//!
//! 定義されたチェックを1件ずつ順番に実行し、結果を収集する。
//! リトライや並列実行は行わない。

use crate::error::CheckError;
use crate::inspect::{detect_signals, match_keywords};
use reqwest::header::HeaderValue;
use reqwest::Client;
use sitecheck_common::{
    CheckDetail, CheckMode, CheckOutcome, CheckResult, EndpointCheck, SiteCheckConfig,
    StatusClass,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// リクエストタイムアウトのデフォルト（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// チェック間の待機時間のデフォルト（ミリ秒）
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// デフォルトのUser-Agent
pub const DEFAULT_USER_AGENT: &str = "DOXA-Test-Agent/1.0";

/// チェッカーの実行設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// リクエストタイムアウト
    pub timeout: Duration,
    /// チェック間の待機時間
    pub delay: Duration,
    /// User-Agentヘッダ
    pub user_agent: String,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RunnerSettings {
    /// 設定ファイルの値から作成
    pub fn from_config(config: &SiteCheckConfig) -> Self {
        Self {
            timeout: config.timeout(),
            delay: config.delay(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// 待機時間を設定
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// タイムアウトを設定
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// 実行の進行を受け取るオブザーバー
///
/// 各チェックの出力は、次のチェックが始まる前にここで完了させる。
pub trait RunObserver {
    /// チェック開始時
    fn check_started(&mut self, _index: usize, _check: &EndpointCheck) {}

    /// チェック完了時
    fn check_finished(&mut self, index: usize, check: &EndpointCheck, result: &CheckResult);
}

/// 何もしないオブザーバー
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn check_finished(&mut self, _index: usize, _check: &EndpointCheck, _result: &CheckResult) {}
}

/// エンドポイントチェッカー
#[derive(Debug, Clone)]
pub struct CheckRunner {
    /// HTTPクライアント
    client: Client,
    /// 実行設定
    settings: RunnerSettings,
}

impl CheckRunner {
    /// 新しいチェッカーを作成
    pub fn new(settings: RunnerSettings) -> Result<Self, CheckError> {
        HeaderValue::from_str(&settings.user_agent)
            .map_err(|e| CheckError::ClientBuild(format!("invalid user agent: {}", e)))?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| CheckError::ClientBuild(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// 全チェックを定義順に実行
    ///
    /// 各チェックの完了（オブザーバーへの通知を含む）を待ってから次に進む。
    /// 通信失敗は結果として記録され、実行は中断しない。
    pub async fn run_all<O>(&self, checks: &[EndpointCheck], observer: &mut O) -> Vec<CheckResult>
    where
        O: RunObserver + ?Sized,
    {
        info!(
            count = checks.len(),
            delay_ms = self.settings.delay.as_millis() as u64,
            "Starting endpoint checks"
        );

        let mut results = Vec::with_capacity(checks.len());

        for (index, check) in checks.iter().enumerate() {
            observer.check_started(index, check);
            let result = self.run_check(check).await;
            observer.check_finished(index, check, &result);
            results.push(result);

            // リモートへの負荷を抑えるため、チェック間で待機
            if index + 1 < checks.len() && !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            total = results.len(),
            responded = succeeded,
            failed = results.len() - succeeded,
            "Endpoint checks completed"
        );

        results
    }

    /// 単一チェックを実行
    ///
    /// 通信レベルの失敗は`CheckOutcome::Failure`に変換され、呼び出し元には伝播しない。
    pub async fn run_check(&self, check: &EndpointCheck) -> CheckResult {
        let start = Instant::now();

        let outcome = match self.execute(check, start).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    check_name = %check.name,
                    url = %check.url,
                    error = %e,
                    "Endpoint check failed"
                );
                CheckOutcome::Failure {
                    error: e.to_string(),
                    kind: e.transport_kind(),
                }
            }
        };

        CheckResult {
            name: check.name.clone(),
            outcome,
        }
    }

    async fn execute(
        &self,
        check: &EndpointCheck,
        start: Instant,
    ) -> Result<CheckOutcome, CheckError> {
        let response = self.client.get(&check.url).send().await?;

        let status = response.status();
        // 表示用の理由句は標準のもの（サーバー独自の理由句は使わない）
        let status_text = status.canonical_reason().map(str::to_string);
        let header_size = response.content_length();

        let (size_bytes, detail) = match &check.mode {
            CheckMode::StatusOnly => (
                header_size,
                CheckDetail::StatusOnly(StatusClass::from_status(status.as_u16())),
            ),
            CheckMode::Content { expected_keywords } => {
                let body = response.text().await?;
                let size = header_size.or(Some(body.len() as u64));
                (
                    size,
                    CheckDetail::Content {
                        keywords: match_keywords(&body, expected_keywords),
                        signals: detect_signals(&body),
                    },
                )
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;

        debug!(
            check_name = %check.name,
            url = %check.url,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "Endpoint check succeeded"
        );

        Ok(CheckOutcome::Success {
            status: status.as_u16(),
            status_text,
            size_bytes,
            elapsed_ms,
            detail,
        })
    }
}
