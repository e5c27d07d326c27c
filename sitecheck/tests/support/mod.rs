//! テスト共通ユーティリティ

use sitecheck::common::{CheckResult, EndpointCheck};
use sitecheck::{CheckRunner, RunObserver, RunnerSettings};
use std::time::Duration;

/// 待機なし・短いタイムアウトのチェッカーを作成
#[allow(dead_code)]
pub fn fast_runner() -> CheckRunner {
    runner_with(Duration::ZERO, Duration::from_secs(2))
}

/// 待機時間とタイムアウトを指定してチェッカーを作成
#[allow(dead_code)]
pub fn runner_with(delay: Duration, timeout: Duration) -> CheckRunner {
    let settings = RunnerSettings::default()
        .with_delay(delay)
        .with_timeout(timeout);
    CheckRunner::new(settings).expect("failed to build runner")
}

/// 接続を拒否されるURLを返す
///
/// 一度バインドしたポートを解放し、そのポートを指すURLを作る。
#[allow(dead_code)]
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

/// オブザーバーへの通知を記録する
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<String>,
}

impl RunObserver for RecordingObserver {
    fn check_started(&mut self, index: usize, check: &EndpointCheck) {
        self.events.push(format!("start:{}:{}", index, check.name));
    }

    fn check_finished(&mut self, index: usize, check: &EndpointCheck, result: &CheckResult) {
        let tag = match result.status() {
            Some(status) => status.to_string(),
            None => "failure".to_string(),
        };
        self.events
            .push(format!("finish:{}:{}:{}", index, check.name, tag));
    }
}
