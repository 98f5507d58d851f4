//! Autofix command implementation.
//!
//! Analyze, repair, and commit the mutated scene document.

use super::OutputFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use scenescrub_analysis::{analyze, AnalysisReport};
use scenescrub_autofix::{autofix, AutofixReport};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// JSON output for the autofix command.
#[derive(Debug, Serialize)]
struct AutofixOutput<'a> {
    success: bool,
    input: String,
    output: String,
    analysis: &'a AnalysisReport,
    autofix: &'a AutofixReport,
}

/// Runs the autofix command: analyze, mutate, re-validate, write.
pub fn run(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    thresholds_path: Option<&Path>,
) -> Result<ExitCode> {
    let thresholds = super::load_thresholds(thresholds_path)?;
    let mut graph = super::load_graph(input)?;

    let analysis = analyze(&graph, &thresholds)?;
    let fix = autofix(&mut graph, &analysis, &thresholds)?;

    let json = scenescrub_graph::document::save_scene(&mut graph)
        .context("failed to serialize repaired scene")?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write repaired scene to {}", output.display()))?;

    match format {
        OutputFormat::Json => {
            let out = AutofixOutput {
                success: true,
                input: input.display().to_string(),
                output: output.display().to_string(),
                analysis: &analysis,
                autofix: &fix,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => print_text_report(input, output, &fix),
    }

    Ok(ExitCode::SUCCESS)
}

fn print_text_report(input: &Path, output: &Path, fix: &AutofixReport) {
    println!("{} {}", "Autofixing:".cyan().bold(), input.display());

    if !fix.cleanup.is_empty() {
        println!("\n{}", "Geometry cleanup:".bold());
        for record in &fix.cleanup {
            let mut details = Vec::new();
            if record.doubles_merged > 0 {
                details.push(format!("{} doubles", record.doubles_merged));
            }
            if record.degenerate_removed > 0 {
                details.push(format!("{} degenerate", record.degenerate_removed));
            }
            if record.loose_removed > 0 {
                details.push(format!("{} loose", record.loose_removed));
            }
            println!(
                "  {}: {} (-{} verts)",
                record.name,
                details.join(", "),
                record.vertices_before - record.vertices_after
            );
        }
    }

    if !fix.decimated.is_empty() {
        println!("\n{}", "Decimation:".bold());
        for record in &fix.decimated {
            println!(
                "  {}: {} -> {} verts (-{:.0}%)",
                record.name,
                record.vertices_before,
                record.vertices_after,
                record.reduction_percent
            );
        }
    }

    if !fix.renames.is_empty() {
        println!("\n{}", "Renames:".bold());
        for rename in &fix.renames {
            println!(
                "  [{}] {} -> {}",
                rename.namespace.to_string().cyan(),
                rename.old_name,
                rename.new_name
            );
        }
    }

    if !fix.bones_marked.is_empty() || !fix.bones_kept_for_skinning.is_empty() {
        println!(
            "\n{} {} marked non-deform, {} kept for skinning",
            "Bones:".bold(),
            fix.bones_marked.len(),
            fix.bones_kept_for_skinning.len()
        );
    }

    for (label, records) in [
        ("UV channels removed", &fix.uv_channels_removed),
        ("Vertex groups removed", &fix.vertex_groups_removed),
    ] {
        if !records.is_empty() {
            println!("\n{}", format!("{label}:").bold());
            for record in records {
                println!("  {} ({})", record.name, record.mesh);
            }
        }
    }

    if !fix.helpers_removed.is_empty() {
        println!("\n{}", "Shape helpers removed:".bold());
        for record in &fix.helpers_removed {
            println!("  {}", record.name);
        }
    }

    if !fix.skipped.is_empty() {
        println!("\n{}", "Skipped:".dimmed());
        for skip in &fix.skipped {
            println!(
                "  {} {} '{}': {}",
                "-".dimmed(),
                skip.step,
                skip.target,
                skip.reason
            );
        }
    }

    let total = fix.summary.total();
    let summary = format!("{total} mutation(s)");
    if total == 0 {
        println!("\n{} {}", "DONE".green().bold(), "nothing to fix".dimmed());
    } else {
        println!("\n{} {}", "DONE".green().bold(), summary.dimmed());
    }
    println!("Wrote {}", output.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenescrub_graph::{document, SceneBuilder};
    use std::io::Write;

    #[test]
    fn test_repairs_and_writes_document() {
        let mut b = SceneBuilder::new();
        let mesh = b.mesh("prop", vec![[0.0; 3]; 3], vec![[0, 1, 2]]);
        b.uv_channel(mesh, "uv0");
        b.uv_channel(mesh, "bake");
        b.mesh_object("Prop", mesh);
        b.object("Prop", None);
        let mut graph = b.build();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", document::save_scene(&mut graph).unwrap()).unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let out_path = out_dir.path().join("fixed.json");

        run(file.path(), &out_path, OutputFormat::Json, None).unwrap();

        let written = std::fs::read_to_string(&out_path).unwrap();
        let fixed = document::load_scene(&written).unwrap();
        // The duplicate pair was renamed and the unused channel removed.
        let names: Vec<_> = fixed.objects.iter().map(|o| o.name.as_str()).collect();
        assert!(names.contains(&"Prop"));
        assert_eq!(names.iter().filter(|n| **n == "Prop").count(), 1);
        assert_eq!(fixed.meshes[0].uv_channels.len(), 1);
    }
}
