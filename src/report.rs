//! User-facing output: the refusal banner and the `--explain` report

use crate::config::{APPROVED_INVOCATIONS, BANNER_HEADLINE, BANNER_HINT, BANNER_WIDTH};
use crate::core::models::{AncestryReport, WalkOutcome};
use crate::error::{GuardError, GuardResult};
use colored::Colorize;
use std::io::Write;

/// Output format for `--explain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

fn boxed_line(content: &str) -> String {
    let pad = BANNER_WIDTH.saturating_sub(content.chars().count());
    format!("│{content}{}│", " ".repeat(pad))
}

/// Plain (uncolored) lines of the refusal banner.
pub fn banner_lines() -> Vec<String> {
    let mut lines = vec![
        format!("╭{}╮", "─".repeat(BANNER_WIDTH)),
        boxed_line(""),
        boxed_line(&format!("   {BANNER_HEADLINE}")),
        boxed_line(""),
        boxed_line(&format!("   {BANNER_HINT}")),
    ];
    lines.extend(
        APPROVED_INVOCATIONS
            .iter()
            .map(|invocation| boxed_line(&format!("     - {invocation}"))),
    );
    lines.push(boxed_line(""));
    lines.push(format!("╰{}╯", "─".repeat(BANNER_WIDTH)));
    lines
}

/// Write the bold red refusal banner. Coloring follows `colored`'s global override.
pub fn write_banner<W: Write>(out: &mut W) -> GuardResult<()> {
    let mut text = String::from("\n");
    for line in banner_lines() {
        text.push_str(&line.red().bold().to_string());
        text.push('\n');
    }
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|err| GuardError::output("banner", err))
}

/// Whether the banner should be colored, judged against stderr where it is written.
///
/// `--no-color` and `NO_COLOR` turn color off, `CLICOLOR_FORCE` turns it on,
/// `CLICOLOR=0` turns it off, and otherwise stderr must be a terminal.
pub fn banner_colorize<F>(no_color_flag: bool, stderr_is_terminal: bool, env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if no_color_flag || env("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    if env("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        return true;
    }
    if env("CLICOLOR").as_deref() == Some("0") {
        return false;
    }
    stderr_is_terminal
}

fn describe_outcome(outcome: &WalkOutcome) -> String {
    match outcome {
        WalkOutcome::Completed => "walk reached the root".to_string(),
        WalkOutcome::Interrupted { pid, reason } => {
            format!("walk stopped at pid {pid}: {reason}")
        }
    }
}

/// Render the ancestry report in the requested format.
pub fn render_report(report: &AncestryReport, format: ReportFormat) -> GuardResult<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Text => {
            let mut text = String::new();
            for (depth, entry) in report.ancestors.iter().enumerate() {
                let marker = if entry.allowed {
                    "✔".green().to_string()
                } else {
                    " ".to_string()
                };
                let name = if entry.binary_name.is_empty() {
                    "<empty>"
                } else {
                    entry.binary_name.as_str()
                };
                let name = format!("{name:<20}");
                text.push_str(&format!(
                    "{marker} {depth:>2}  {} {}\n",
                    name.bold(),
                    entry.command_line
                ));
            }
            text.push_str(&format!("{}\n", describe_outcome(&report.outcome)));
            text.push_str(&format!(
                "verdict: {}\n",
                if report.verdict.is_allowed() {
                    "allowed".green()
                } else {
                    "denied".red()
                }
            ));
            Ok(text)
        }
    }
}

pub fn write_report<W: Write>(
    out: &mut W,
    report: &AncestryReport,
    format: ReportFormat,
) -> GuardResult<()> {
    let rendered = render_report(report, format)?;
    writeln!(out, "{}", rendered.trim_end()).map_err(|err| GuardError::output("report", err))
}
