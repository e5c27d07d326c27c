//! 設定管理
//!
//! SiteCheckConfig, CheckDefinition等の設定構造体

use crate::error::{CommonError, CommonResult};
use crate::types::{CheckMode, CheckModeKind, EndpointCheck};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// 環境変数のプレフィックス（例: `SITECHECK_TIMEOUT_SECS`）
pub const ENV_PREFIX: &str = "SITECHECK";

/// スモークテスト全体の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCheckConfig {
    /// 相対URLの解決に使うベースURL (デフォルト: "https://www.dith-fastbusiness.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agentヘッダ (デフォルト: "DOXA-Test-Agent/1.0")
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// リクエストタイムアウト（秒）(デフォルト: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// チェック間の待機時間（ミリ秒）(デフォルト: 1000)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// チェック定義 (デフォルト: 組み込みスイート)
    #[serde(default = "default_checks")]
    pub checks: Vec<CheckDefinition>,
}

fn default_base_url() -> String {
    "https://www.dith-fastbusiness.com".to_string()
}

fn default_user_agent() -> String {
    "DOXA-Test-Agent/1.0".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_checks() -> Vec<CheckDefinition> {
    vec![
        CheckDefinition::content(
            "Home page",
            "/",
            &["DOXA Investments", "Services", "État du Système"],
        ),
        CheckDefinition::content(
            "Custom 404 page",
            "/page-inexistante",
            &["404", "Page non trouvée", "DOXA"],
        ),
        CheckDefinition::content(
            "Maintenance page",
            "/maintenance.html",
            &["Maintenance", "Progression", "DOXA"],
        ),
        CheckDefinition::content("Frontend application", "/frontend/", &["React", "App", "root"]),
        CheckDefinition::status_only("Backend API", "/backend/api.php"),
    ]
}

impl Default for SiteCheckConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            delay_ms: default_delay_ms(),
            checks: default_checks(),
        }
    }
}

/// 設定ファイル上のチェック定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    /// 表示名
    pub name: String,
    /// 絶対URL、またはベースURLからの相対パス
    pub url: String,
    /// チェック方式 (デフォルト: content)
    #[serde(default)]
    pub mode: CheckModeKind,
    /// 期待するキーワード（contentのみ）
    #[serde(default)]
    pub expected_keywords: Vec<String>,
}

impl CheckDefinition {
    fn content(name: &str, url: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            mode: CheckModeKind::Content,
            expected_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn status_only(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            mode: CheckModeKind::StatusOnly,
            expected_keywords: Vec::new(),
        }
    }

    /// ベースURLを適用して実行用のチェックに変換する
    pub fn to_endpoint_check(&self, base_url: &str) -> CommonResult<EndpointCheck> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CommonError::Validation(
                "check name must not be empty".to_string(),
            ));
        }

        let mode = match self.mode {
            CheckModeKind::Content => CheckMode::Content {
                expected_keywords: self.expected_keywords.clone(),
            },
            CheckModeKind::StatusOnly => {
                if !self.expected_keywords.is_empty() {
                    return Err(CommonError::Validation(format!(
                        "check '{}' is status_only but lists expected_keywords",
                        name
                    )));
                }
                CheckMode::StatusOnly
            }
        };

        Ok(EndpointCheck {
            name: name.to_string(),
            url: resolve_url(base_url, &self.url)?,
            mode,
        })
    }
}

impl SiteCheckConfig {
    /// 設定ファイル（任意）と環境変数から読み込む
    ///
    /// 優先順位: 環境変数 > 設定ファイル > デフォルト値。
    /// CLI引数での上書きを適用してから検証するため、ここでは`validate`を呼ばない。
    pub fn load(path: Option<&Path>) -> CommonResult<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        Ok(config)
    }

    /// TOML文字列から読み込む（環境変数は参照しない）
    pub fn from_toml(source: &str) -> CommonResult<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(
                source,
                ::config::FileFormat::Toml,
            ))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 値の妥当性を検証
    pub fn validate(&self) -> CommonResult<()> {
        if !is_http_url(&self.base_url) {
            return Err(CommonError::Validation(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CommonError::Validation(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CommonError::Validation(
                "user_agent must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// 実行用のチェック一覧を構築する（定義順を保持）
    pub fn endpoint_checks(&self) -> CommonResult<Vec<EndpointCheck>> {
        if self.checks.is_empty() {
            return Err(CommonError::Validation("no checks configured".to_string()));
        }
        self.checks
            .iter()
            .map(|check| check.to_endpoint_check(&self.base_url))
            .collect()
    }

    /// リクエストタイムアウト
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// チェック間の待機時間
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn parse_http_url(url: &str) -> Option<Url> {
    Url::parse(url)
        .ok()
        .filter(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
}

fn is_http_url(url: &str) -> bool {
    parse_http_url(url).is_some()
}

/// チェックURLを解決する
///
/// 絶対URLはそのまま、それ以外はベースURLを基準に結合する。
pub fn resolve_url(base_url: &str, url: &str) -> CommonResult<String> {
    let url = url.trim();
    match Url::parse(url) {
        Ok(absolute) => {
            if matches!(absolute.scheme(), "http" | "https") && absolute.has_host() {
                return Ok(absolute.to_string());
            }
            Err(CommonError::Validation(format!(
                "only http(s) URLs are supported: {}",
                url
            )))
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = parse_http_url(base_url).ok_or_else(|| {
                CommonError::Validation(format!(
                    "cannot resolve '{}' against base_url '{}'",
                    url, base_url
                ))
            })?;
            base.join(url).map(|joined| joined.to_string()).map_err(|e| {
                CommonError::Validation(format!("invalid check URL '{}': {}", url, e))
            })
        }
        Err(e) => Err(CommonError::Validation(format!(
            "invalid check URL '{}': {}",
            url, e
        ))),
    }
}
