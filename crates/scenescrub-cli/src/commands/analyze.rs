//! Analyze command implementation.
//!
//! Runs the read-only analysis core and renders the report.

use super::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use scenescrub_analysis::{analyze, AnalysisReport, Reason, Severity};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// JSON output for the analyze command.
#[derive(Debug, Serialize)]
struct AnalyzeOutput<'a> {
    /// True when nothing blocks export under the chosen policy.
    success: bool,
    /// Path of the analyzed scene document.
    input: String,
    /// The full analysis report.
    report: &'a AnalysisReport,
}

/// Runs the analyze command.
///
/// Exit code 0 when no mesh is CRITICAL (and, with `strict`, no warnings
/// fired); 1 otherwise.
pub fn run(
    input: &Path,
    format: OutputFormat,
    strict: bool,
    thresholds_path: Option<&Path>,
) -> Result<ExitCode> {
    let thresholds = super::load_thresholds(thresholds_path)?;
    let graph = super::load_graph(input)?;
    let report = analyze(&graph, &thresholds)?;

    let success = passes(&report, strict);

    match format {
        OutputFormat::Json => {
            let output = AnalyzeOutput {
                success,
                input: input.display().to_string(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_text_report(input, &report, success),
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Export-gating policy: CRITICAL always blocks, warnings only in strict mode.
fn passes(report: &AnalysisReport, strict: bool) -> bool {
    !report.has_critical() && (!strict || !report.has_warnings())
}

fn print_text_report(input: &Path, report: &AnalysisReport, success: bool) {
    println!("{} {}", "Analyzing:".cyan().bold(), input.display());
    println!(
        "{}",
        format!(
            "Scene: {} meshes, {} verts, {} bones, {} actions",
            report.totals.mesh_count,
            report.totals.vertex_count,
            report.totals.bone_count,
            report.totals.action_count
        )
        .dimmed()
    );

    let criticals: Vec<_> = report
        .meshes
        .iter()
        .filter(|a| a.severity == Severity::Critical)
        .collect();
    if !criticals.is_empty() {
        println!("\n{}", "Critical:".red().bold());
        for assessment in criticals {
            for reason in &assessment.reasons {
                print_reason(reason, "x".red());
            }
        }
    }

    let mut warnings: Vec<&Reason> = report
        .meshes
        .iter()
        .filter(|a| a.severity == Severity::Warning)
        .flat_map(|a| a.reasons.iter())
        .collect();
    warnings.extend(report.scene.reasons.iter());
    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for reason in warnings {
            print_reason(reason, "!".yellow());
        }
    }

    if !report.duplicates.is_empty() {
        println!("\n{}", "Duplicate names:".yellow().bold());
        for group in &report.duplicates {
            println!(
                "  {} [{}] '{}' <- {:?}",
                "#".yellow(),
                group.namespace.to_string().cyan(),
                group.sanitized,
                group.names
            );
        }
    }

    if !report.notes.is_empty() {
        println!("\n{}", "Notes:".blue().bold());
        for note in &report.notes {
            println!("  {} '{}': {}", "i".blue(), note.name, note.detail);
        }
    }

    if report.totals.bone_count > 0 {
        println!(
            "\nStatic bones: {} of {}",
            report.summary.static_bone_count, report.totals.bone_count
        );
    }

    let summary = format!(
        "{} critical, {} warning(s), {} collision(s)",
        report.summary.critical_count,
        report.summary.warning_count,
        report.summary.collision_count
    );
    if success {
        println!("\n{} {}", "PASSED".green().bold(), summary.dimmed());
    } else {
        println!("\n{} {}", "FAILED".red().bold(), summary.dimmed());
    }
}

/// Prints a single triggered rule.
pub(crate) fn print_reason(reason: &Reason, marker: colored::ColoredString) {
    println!(
        "  {} [{}] {}",
        marker,
        reason.rule_id.cyan(),
        reason.message
    );
    if let Some(actual) = &reason.actual_value {
        if let Some(expected) = &reason.expected_range {
            println!(
                "    {} actual={}, expected={}",
                "->".dimmed(),
                actual,
                expected
            );
        } else {
            println!("    {} actual={}", "->".dimmed(), actual);
        }
    }
    println!("    {} {}", "suggestion:".dimmed(), reason.suggestion);
}
