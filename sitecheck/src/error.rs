//! エラー型定義
//!
//! チェック実行時のエラー（thiserror使用）

use sitecheck_common::{CommonError, TransportErrorKind};
use thiserror::Error;

/// チェック実行のエラー型
#[derive(Debug, Error)]
pub enum CheckError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Request timed out
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Connection failed (DNS, refused, reset)
    #[error("Connection error: {0}")]
    Connect(String),

    /// Response body could not be read
    #[error("Body read error: {0}")]
    Body(String),

    /// Other HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl CheckError {
    /// 通信失敗としての種別を返す
    pub fn transport_kind(&self) -> TransportErrorKind {
        match self {
            Self::Timeout(_) => TransportErrorKind::Timeout,
            Self::Connect(_) => TransportErrorKind::Connect,
            Self::Body(_) => TransportErrorKind::Body,
            Self::Common(_) | Self::Http(_) | Self::ClientBuild(_) => TransportErrorKind::Other,
        }
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_connect() {
            Self::Connect(message)
        } else if err.is_body() || err.is_decode() {
            Self::Body(message)
        } else if err.is_builder() {
            Self::ClientBuild(message)
        } else {
            Self::Http(message)
        }
    }
}
