// Rubric grading and agent-assisted review

use super::{load_snapshot, type_table};
use anyhow::{Context, Result};
use ghbridge_core::document::DocumentSnapshot;
use ghbridge_core::grading::GradeReport;
use ghbridge_core::review::{grading_prompt, ReviewResult};
use ghbridge_core::{ComponentId, GrasshopperClient};
use std::fmt::Write;
use std::path::Path;

pub async fn grade(client: &GrasshopperClient, snapshot: Option<&Path>, json: bool) -> Result<()> {
    let snapshot = load_snapshot(client, snapshot).await?;
    let report = client.config().grading.grade(&snapshot);
    tracing::info!(
        document = %report.document_name,
        score = report.score,
        grade = %report.grade,
        "Document graded"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_grade(&snapshot, &report));
    }
    Ok(())
}

fn render_grade(snapshot: &DocumentSnapshot, report: &GradeReport) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Document: {}", snapshot.document_name);
    let _ = writeln!(text, "Components: {}", snapshot.total_components);
    text.push_str("\nComponent types:\n");
    text.push_str(&type_table(snapshot, 10));
    text.push('\n');
    text.push_str(&report.to_string());
    text
}

pub async fn prompt(
    client: &GrasshopperClient,
    requirements: &Path,
    snapshot: Option<&Path>,
) -> Result<()> {
    let requirements = std::fs::read_to_string(requirements)
        .with_context(|| format!("Failed to read requirements {}", requirements.display()))?;
    let snapshot = load_snapshot(client, snapshot).await?;
    print!("{}", grading_prompt(&snapshot, &requirements));
    Ok(())
}

/// Print a review and, when `panel` is given, show it on the canvas too.
pub async fn review(client: &GrasshopperClient, file: &Path, panel: Option<&str>) -> Result<()> {
    let review = ReviewResult::load(file)
        .with_context(|| format!("Failed to load review {}", file.display()))?;
    let text = review.render();
    print!("{}", text);

    if let Some(panel) = panel {
        push_to_panel(client, &ComponentId::from(panel), &text).await?;
        println!("\nReview written to panel {}", panel);
    }
    Ok(())
}

async fn push_to_panel(client: &GrasshopperClient, panel: &ComponentId, text: &str) -> Result<()> {
    client
        .values()
        .set_panel_text(panel, text)
        .await
        .with_context(|| format!("Failed to set text of panel {}", panel))?;
    Ok(())
}
