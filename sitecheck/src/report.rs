//! レポート出力
//!
//! `CheckResult`/`RunSummary`を人間向けテキストまたはJSONに整形する。
//! 出力先は任意の`std::io::Write`。

use crate::checker::RunObserver;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sitecheck_common::{
    CheckDetail, CheckOutcome, CheckResult, EndpointCheck, RunSummary, StatusClass,
    SummaryLabel, TechnicalSignals,
};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

/// コンソール向けレポーター
///
/// 各チェックの詳細ブロックを完了時点で書き出し、最後にサマリーを出力する。
pub struct ConsoleReporter<W: Write> {
    out: W,
    total: usize,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    /// 新しいレポーターを作成
    pub fn new(out: W) -> Self {
        Self {
            out,
            total: 0,
            error: None,
        }
    }

    /// 実行開始のバナーを出力
    pub fn begin(&mut self, base_url: &str, total: usize) {
        self.total = total;
        let result = writeln!(self.out, "Endpoint smoke checks: {}", base_url)
            .and_then(|_| writeln!(self.out, "{}", rule()))
            .and_then(|_| writeln!(self.out, "Running {} checks...", total));
        self.record(result);
    }

    /// サマリーを出力し、出力中に発生したエラーを返す
    pub fn finish(mut self, summary: &RunSummary) -> io::Result<W> {
        let result = write_summary(&mut self.out, summary).and_then(|_| self.out.flush());
        self.record(result);
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }
}

impl<W: Write> RunObserver for ConsoleReporter<W> {
    fn check_started(&mut self, index: usize, check: &EndpointCheck) {
        let result = writeln!(self.out)
            .and_then(|_| {
                if self.total > 0 {
                    writeln!(self.out, "Check {}/{}: {}", index + 1, self.total, check.name)
                } else {
                    writeln!(self.out, "Check: {}", check.name)
                }
            })
            .and_then(|_| writeln!(self.out, "  URL: {}", check.url));
        self.record(result);
    }

    fn check_finished(&mut self, _index: usize, _check: &EndpointCheck, result: &CheckResult) {
        let written = write_check_detail(&mut self.out, result).and_then(|_| self.out.flush());
        self.record(written);
    }
}

/// 1件分の詳細ブロック（ステータス行以降）を書き出す
pub fn write_check_detail<W: Write>(out: &mut W, result: &CheckResult) -> io::Result<()> {
    match &result.outcome {
        CheckOutcome::Success {
            status,
            status_text,
            size_bytes,
            detail,
            ..
        } => {
            match status_text {
                Some(text) => writeln!(out, "  Status: {} {}", status, text)?,
                None => writeln!(out, "  Status: {}", status)?,
            }
            writeln!(out, "  Size: {}", format_size(*size_bytes))?;

            match detail {
                CheckDetail::StatusOnly(class) => {
                    writeln!(out, "  Backend: {}", format_status_class(*class))?;
                }
                CheckDetail::Content { keywords, signals } => {
                    if !keywords.is_empty() {
                        writeln!(out, "  Content:")?;
                        for keyword in keywords {
                            let mark = if keyword.found { "found" } else { "missing" };
                            writeln!(out, "    [{}] \"{}\"", mark, keyword.keyword)?;
                        }
                    }
                    write_signals(out, signals)?;
                }
            }
        }
        CheckOutcome::Failure { error, kind } => {
            writeln!(out, "  Error ({}): {}", kind.as_str(), error)?;
        }
    }
    Ok(())
}

fn write_signals<W: Write>(out: &mut W, signals: &TechnicalSignals) -> io::Result<()> {
    writeln!(out, "  Technical analysis:")?;
    writeln!(out, "    CSS: {}", yes_no(signals.css))?;
    writeln!(out, "    JavaScript: {}", yes_no(signals.javascript))?;
    writeln!(out, "    Responsive: {}", yes_no(signals.responsive))?;
    writeln!(out, "    Icons: {}", yes_no(signals.icons))
}

/// サマリーブロックを書き出す
pub fn write_summary<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "{}", rule())?;

    for entry in &summary.entries {
        writeln!(out, "{}: {}", entry.name, format_label(entry.label))?;
    }

    writeln!(out)?;
    writeln!(out, "Statistics:")?;
    writeln!(
        out,
        "Successful: {}/{}",
        summary.success_count, summary.total
    )?;
    writeln!(out, "Success rate: {}%", summary.success_rate_percent)?;

    if summary.deployment_pending {
        write_deployment_advisory(out)?;
    }

    writeln!(out)?;
    writeln!(out, "Checks finished.")
}

fn write_deployment_advisory<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Deployment status:")?;
    writeln!(out, "  At least one endpoint answered HTTP 500.")?;
    writeln!(out, "  The backend may still be activating on the host.")?;
    writeln!(out, "  Re-run the checks once activation has completed.")
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// サイズ表示（不明な場合は"unknown"）
pub fn format_size(size_bytes: Option<u64>) -> String {
    match size_bytes {
        Some(size) => format!("{} bytes", size),
        None => "unknown".to_string(),
    }
}

fn format_status_class(class: StatusClass) -> String {
    match class {
        StatusClass::Operational => "operational".to_string(),
        StatusClass::AwaitingActivation => "awaiting activation".to_string(),
        StatusClass::Error(status) => format!("error {}", status),
    }
}

fn format_label(label: SummaryLabel) -> String {
    match label {
        SummaryLabel::Ok => "OK".to_string(),
        SummaryLabel::Pending => "PENDING".to_string(),
        SummaryLabel::Other(status) => format!("HTTP {}", status),
        SummaryLabel::Error => "ERROR".to_string(),
    }
}

/// JSON出力用の実行レポート
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// 実行開始時刻
    pub started_at: DateTime<Utc>,
    /// 実行終了時刻
    pub finished_at: DateTime<Utc>,
    /// ベースURL
    pub base_url: String,
    /// チェック結果（実行順）
    pub results: Vec<CheckResult>,
    /// 集計
    pub summary: RunSummary,
}

/// 実行レポートをJSONで書き出す
pub fn render_json<W: Write>(report: &RunReport, mut out: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, report).map_err(io::Error::from)?;
    writeln!(out)?;
    out.flush()
}
