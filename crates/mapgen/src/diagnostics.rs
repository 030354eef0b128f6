//! Append-only diagnostics accumulated across a generation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pipeline::PassId;
use crate::scoring::SoftGoalId;
use crate::types::GridPoint;
use crate::validation::ConstraintId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub id: ConstraintId,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<GridPoint>>,
}

impl ValidationIssue {
    pub fn error(id: ConstraintId, message: impl Into<String>) -> Self {
        Self { id, severity: Severity::Error, message: message.into(), cells: None }
    }

    pub fn with_cells(mut self, cells: Vec<GridPoint>) -> Self {
        self.cells = Some(cells);
        self
    }
}

/// One record per registered repair per round, including no-ops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRepairAction {
    pub id: String,
    pub description: String,
    pub applied: bool,
    pub attempt: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftGoalScore {
    pub id: SoftGoalId,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationDiagnostics {
    pub warnings: Vec<String>,
    pub pass_durations_ms: BTreeMap<PassId, f64>,
    pub hard_constraint_issues: Vec<ValidationIssue>,
    pub soft_goal_scores: Vec<SoftGoalScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_soft_goal_score: Option<f64>,
    pub applied_repairs: Vec<GenerationRepairAction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSummary {
    pub warning_count: usize,
    pub major_issue_count: usize,
    pub pass_count: usize,
    pub total_pass_duration_ms: f64,
    pub slowest_pass_id: Option<PassId>,
    pub slowest_pass_duration_ms: f64,
}

impl GenerationDiagnostics {
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("generation warning: {message}");
        self.warnings.push(message);
    }

    /// A pass listed more than once accumulates its time under one key.
    pub fn record_pass_duration(&mut self, pass_id: PassId, elapsed_ms: f64) {
        *self.pass_durations_ms.entry(pass_id).or_default() += elapsed_ms;
    }

    pub fn summary(&self) -> DiagnosticsSummary {
        let mut slowest_pass_id = None;
        let mut slowest_pass_duration_ms = 0.0;
        let mut total_pass_duration_ms = 0.0;

        for (&pass_id, &duration_ms) in &self.pass_durations_ms {
            total_pass_duration_ms += duration_ms;
            if duration_ms > slowest_pass_duration_ms {
                slowest_pass_duration_ms = duration_ms;
                slowest_pass_id = Some(pass_id);
            }
        }

        DiagnosticsSummary {
            warning_count: self.warnings.len(),
            major_issue_count: self
                .hard_constraint_issues
                .iter()
                .filter(|issue| issue.severity == Severity::Error)
                .count(),
            pass_count: self.pass_durations_ms.len(),
            total_pass_duration_ms,
            slowest_pass_id,
            slowest_pass_duration_ms,
        }
    }
}
