//! Additive scoring rubric for student documents.

use crate::document::DocumentSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rubric weights and the component types each criterion looks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rubric {
    pub slider_types: Vec<String>,
    pub slider_points: u32,

    pub geometry_types: Vec<String>,
    pub geometry_points: u32,

    /// Inclusive component count range considered well-sized.
    pub count_min: usize,
    pub count_max: usize,
    pub count_in_range_points: u32,
    pub count_below_points: u32,
    pub count_above_points: u32,

    pub parameter_types: Vec<String>,
    pub parameter_points: u32,

    pub organization_types: Vec<String>,
    pub organization_points: u32,

    pub base_points: u32,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            slider_types: strings(&["GH_NumberSlider"]),
            slider_points: 10,
            geometry_types: strings(&["Component_Circle", "Component_Rectangle", "Component_Line"]),
            geometry_points: 20,
            count_min: 10,
            count_max: 50,
            count_in_range_points: 15,
            count_below_points: 10,
            count_above_points: 10,
            parameter_types: strings(&["Param_Point", "Param_Curve", "Param_Surface", "Param_Number"]),
            parameter_points: 15,
            organization_types: strings(&["GH_Panel", "GH_Group"]),
            organization_points: 15,
            base_points: 20,
        }
    }
}

/// Letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => Self::A,
            s if s >= 80 => Self::B,
            s if s >= 70 => Self::C,
            s if s >= 60 => Self::D,
            _ => Self::F,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Good",
            Self::C => "Satisfactory",
            Self::D => "Pass",
            Self::F => "Fail",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        write!(f, "{}", letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Sliders,
    Geometry,
    ComponentCount,
    Parameters,
    Organization,
    Base,
}

/// Outcome of one rubric line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    pub points: u32,
    pub max_points: u32,
    pub met: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub document_name: String,
    pub total_components: usize,
    pub score: u32,
    pub max_score: u32,
    pub grade: Grade,
    pub results: Vec<CriterionResult>,
    pub suggestions: Vec<String>,
    pub graded_at: DateTime<Utc>,
}

impl Rubric {
    pub fn max_score(&self) -> u32 {
        self.slider_points
            + self.geometry_points
            + self
                .count_in_range_points
                .max(self.count_below_points)
                .max(self.count_above_points)
            + self.parameter_points
            + self.organization_points
            + self.base_points
    }

    pub fn grade(&self, snapshot: &DocumentSnapshot) -> GradeReport {
        let mut results = Vec::with_capacity(6);
        let mut suggestions = Vec::new();

        let sliders = snapshot.count_any(&self.slider_types);
        if sliders > 0 {
            results.push(met(
                Criterion::Sliders,
                self.slider_points,
                format!("Uses number sliders ({})", sliders),
            ));
        } else {
            results.push(missed(Criterion::Sliders, self.slider_points, "No number sliders"));
            suggestions.push("Add number sliders to drive the parameters".to_string());
        }

        let geometry = snapshot.count_any(&self.geometry_types);
        if geometry > 0 {
            results.push(met(
                Criterion::Geometry,
                self.geometry_points,
                "Contains geometry components".to_string(),
            ));
        } else {
            results.push(missed(Criterion::Geometry, self.geometry_points, "No geometry components"));
            suggestions.push("Add geometry components (circle, rectangle, line, ...)".to_string());
        }

        let total = snapshot.total_components;
        let count_max = self
            .count_in_range_points
            .max(self.count_below_points)
            .max(self.count_above_points);
        let (points, detail) = if (self.count_min..=self.count_max).contains(&total) {
            (self.count_in_range_points, format!("Reasonable component count ({})", total))
        } else if total < self.count_min {
            (self.count_below_points, format!("Few components ({})", total))
        } else {
            (self.count_above_points, format!("Many components ({})", total))
        };
        results.push(CriterionResult {
            criterion: Criterion::ComponentCount,
            points,
            max_points: count_max,
            met: points == count_max,
            detail,
        });

        let parameters = snapshot.count_any(&self.parameter_types);
        if parameters > 0 {
            results.push(met(
                Criterion::Parameters,
                self.parameter_points,
                format!("Uses parameter components ({})", parameters),
            ));
        } else {
            results.push(missed(
                Criterion::Parameters,
                self.parameter_points,
                "No parameter components",
            ));
            suggestions.push("Use parameter components to make the definition reusable".to_string());
        }

        let organization = snapshot.count_any(&self.organization_types);
        if organization > 0 {
            results.push(met(
                Criterion::Organization,
                self.organization_points,
                "Organized with panels or groups".to_string(),
            ));
        } else {
            results.push(missed(
                Criterion::Organization,
                self.organization_points,
                "No panels or groups",
            ));
            suggestions.push("Use panels or groups to organize and annotate the work".to_string());
        }

        results.push(met(Criterion::Base, self.base_points, "Base score".to_string()));

        let score = results.iter().map(|r| r.points).sum();

        GradeReport {
            document_name: snapshot.document_name.clone(),
            total_components: total,
            score,
            max_score: self.max_score(),
            grade: Grade::from_score(score),
            results,
            suggestions,
            graded_at: Utc::now(),
        }
    }
}

fn met(criterion: Criterion, points: u32, detail: String) -> CriterionResult {
    CriterionResult {
        criterion,
        points,
        max_points: points,
        met: true,
        detail,
    }
}

fn missed(criterion: Criterion, max_points: u32, detail: &str) -> CriterionResult {
    CriterionResult {
        criterion,
        points: 0,
        max_points,
        met: false,
        detail: detail.to_string(),
    }
}

impl fmt::Display for GradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}/{}", self.score, self.max_score)?;
        writeln!(f, "Grade: {} ({})", self.grade, self.grade.label())?;
        writeln!(f)?;
        writeln!(f, "Breakdown:")?;
        for result in &self.results {
            let mark = if result.met { "+" } else { "-" };
            writeln!(f, "  [{}] {} +{}", mark, result.detail, result.points)?;
        }
        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Suggestions:")?;
            for suggestion in &self.suggestions {
                writeln!(f, "  * {}", suggestion)?;
            }
        }
        Ok(())
    }
}
