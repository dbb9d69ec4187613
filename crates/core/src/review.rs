//! Agent-assisted review: prompt construction and rendering of the verdict.

use crate::document::DocumentSnapshot;
use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// Build the grading prompt handed to a reviewing agent.
pub fn grading_prompt(snapshot: &DocumentSnapshot, requirements: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a Grasshopper instructor. Grade this student submission.\n\n");
    prompt.push_str("## Assignment requirements\n");
    prompt.push_str(requirements.trim());
    prompt.push_str("\n\n## Submission\n");
    let _ = writeln!(prompt, "- Document name: {}", snapshot.document_name);
    let _ = writeln!(prompt, "- Total components: {}", snapshot.total_components);
    prompt.push_str("\nComponent types:\n");
    for (component_type, count) in snapshot.top_types(usize::MAX) {
        let _ = writeln!(prompt, "- {}: {}", component_type, count);
    }

    prompt.push_str(
        r#"
## Response format

Reply with JSON only:
{
  "score": <0-100>,
  "grade": "<A/B/C/D/F>",
  "strengths": ["..."],
  "weaknesses": ["..."],
  "suggestions": ["..."],
  "detailed_feedback": "<paragraph>"
}

Criteria:
1. Meets the assignment requirements (40 points)
2. Sound and efficient logic (30 points)
3. Appropriate choice of components (20 points)
4. Organization and readability (10 points)
"#,
    );

    prompt
}

/// Verdict returned by a reviewing agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub score: u32,
    pub grade: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub detailed_feedback: String,
}

impl ReviewResult {
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            BridgeError::UnexpectedPayload(format!("review {}: {}", path.display(), e))
        })
    }

    /// Plain-text rendering, suitable for a canvas panel.
    pub fn render(&self) -> String {
        let mut text = String::new();

        text.push_str("Review result\n\n");
        let _ = writeln!(text, "Score: {}/100", self.score);
        let _ = writeln!(text, "Grade: {}", self.grade);

        section(&mut text, "Strengths", &self.strengths);
        section(&mut text, "Needs improvement", &self.weaknesses);
        section(&mut text, "Suggestions", &self.suggestions);

        if !self.detailed_feedback.is_empty() {
            let _ = write!(text, "\nFeedback:\n{}\n", self.detailed_feedback);
        }

        text
    }
}

fn section(text: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(text, "\n{}:", title);
    for item in items {
        let _ = writeln!(text, "  * {}", item);
    }
}
