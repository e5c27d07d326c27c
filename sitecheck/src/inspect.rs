//! レスポンス検査と集計
//!
//! HTTP通信を伴わない純粋な判定ロジック。
//! キーワード照合、技術的シグナル、成功数・成功率の計算を行う。

use sitecheck_common::{
    CheckResult, KeywordMatch, RunSummary, SummaryEntry, SummaryLabel, TechnicalSignals,
};

/// サマリーで成功として数えるステータスコード
///
/// 404は「ページが見つからない」ことを確認するチェックのため成功扱い。
pub const COUNTED_SUCCESS_STATUSES: [u16; 2] = [200, 404];

/// デプロイ未完了とみなすステータスコード
pub const DEPLOYMENT_PENDING_STATUS: u16 = 500;

/// キーワードごとの一致を判定する
///
/// 大文字小文字を区別した単純な部分文字列検索で、順序は入力どおり。
pub fn match_keywords(body: &str, keywords: &[String]) -> Vec<KeywordMatch> {
    keywords
        .iter()
        .map(|keyword| KeywordMatch {
            keyword: keyword.clone(),
            found: body.contains(keyword.as_str()),
        })
        .collect()
}

/// 本文から技術的シグナルを抽出する
pub fn detect_signals(body: &str) -> TechnicalSignals {
    TechnicalSignals {
        css: body.contains("<style>") || body.contains(".css"),
        javascript: body.contains("<script>") || body.contains(".js"),
        responsive: body.contains("viewport"),
        icons: body.contains("font-awesome") || body.contains("fas fa-"),
    }
}

/// 結果がサマリー上の成功に数えられるか
pub fn counts_as_success(result: &CheckResult) -> bool {
    result
        .status()
        .is_some_and(|status| COUNTED_SUCCESS_STATUSES.contains(&status))
}

/// 成功率（%）を四捨五入で求める
pub fn success_rate_percent(success_count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (success_count as f64 / total as f64 * 100.0).round() as u32
}

/// 500を返した結果が1件でもあるか
pub fn has_deployment_pending(results: &[CheckResult]) -> bool {
    results
        .iter()
        .any(|result| result.status() == Some(DEPLOYMENT_PENDING_STATUS))
}

/// 結果一覧からサマリーを作成する
pub fn summarize(results: &[CheckResult]) -> RunSummary {
    let total = results.len();
    let success_count = results.iter().filter(|r| counts_as_success(r)).count();

    RunSummary {
        total,
        success_count,
        success_rate_percent: success_rate_percent(success_count, total),
        deployment_pending: has_deployment_pending(results),
        entries: results
            .iter()
            .map(|result| SummaryEntry {
                name: result.name.clone(),
                label: SummaryLabel::for_result(result),
            })
            .collect(),
    }
}
