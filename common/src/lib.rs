//! sitecheck 共通ライブラリ
//!
//! チェック定義・結果の型、設定、エラー型を提供する

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// エラー型
pub mod error;

/// 共通型定義
pub mod types;

pub use crate::config::{CheckDefinition, SiteCheckConfig};
pub use crate::error::{CommonError, CommonResult};
pub use crate::types::*;
