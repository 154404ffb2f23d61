//! Grading report types with JSON persistence.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::statistics::{percentage, ScoreDistribution, ScoreSummary};

/// The result of grading a directory of exams against one problem set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Title of the problem set used for grading.
    pub problem_set: String,
    /// Uuid of the problem set used for grading.
    pub problem_set_uuid: Uuid,
    /// Successfully graded exams, in file name order.
    pub outcomes: Vec<ExamOutcome>,
    /// Files that could not be graded.
    pub skipped: Vec<SkippedExam>,
    /// Per question id: how many exams received each score.
    pub question_scores: BTreeMap<String, ScoreDistribution>,
}

/// One graded exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamOutcome {
    /// File name of the exam.
    pub file: String,
    pub user_name: Option<String>,
    pub score: i64,
    pub max_score: i64,
}

impl ExamOutcome {
    /// Score as a percentage of the exam's maximum.
    pub fn percentage(&self) -> f64 {
        percentage(self.score as f64, self.max_score as f64)
    }

    /// The user name, or a placeholder for anonymous submissions.
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("(anonymous)")
    }
}

/// An exam file that was not graded, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedExam {
    pub file: String,
    pub reason: String,
}

impl GradingReport {
    /// Outcomes ordered by percentage, best first. Ties keep file order.
    pub fn ranked(&self) -> Vec<&ExamOutcome> {
        let mut ranked: Vec<&ExamOutcome> = self.outcomes.iter().collect();
        ranked.sort_by(|a, b| b.percentage().total_cmp(&a.percentage()));
        ranked
    }

    /// Highest maximum score across the graded exams.
    pub fn max_score(&self) -> i64 {
        self.outcomes.iter().map(|o| o.max_score).max().unwrap_or(0)
    }

    /// Mean/median summary, or `None` if nothing was graded.
    pub fn summary(&self) -> Option<ScoreSummary> {
        let scores: Vec<i64> = self.outcomes.iter().map(|o| o.score).collect();
        ScoreSummary::compute(&scores, self.max_score())
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(file: &str, user: Option<&str>, score: i64, max_score: i64) -> ExamOutcome {
        ExamOutcome {
            file: file.into(),
            user_name: user.map(String::from),
            score,
            max_score,
        }
    }

    fn report() -> GradingReport {
        let mut question_scores = BTreeMap::new();
        question_scores.insert("q1".to_string(), ScoreDistribution::from([(0, 1), (2, 2)]));
        GradingReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            problem_set: "Capitals".into(),
            problem_set_uuid: Uuid::new_v4(),
            outcomes: vec![
                outcome("a.yml", Some("ann"), 3, 6),
                outcome("b.yml", Some("ben"), 5, 5),
                outcome("c.yml", None, 1, 4),
            ],
            skipped: vec![SkippedExam {
                file: "d.yml".into(),
                reason: "not completed".into(),
            }],
            question_scores,
        }
    }

    #[test]
    fn ranking_orders_by_percentage() {
        let report = report();
        let names: Vec<&str> = report.ranked().iter().map(|o| o.display_name()).collect();
        assert_eq!(names, vec!["ben", "ann", "(anonymous)"]);
        assert_eq!(report.max_score(), 6);
    }

    #[test]
    fn summary_over_outcomes() {
        let summary = report().summary().unwrap();
        assert_eq!(summary.participants, 3);
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.median, 3.0);
    }

    #[test]
    fn saves_json_into_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let report = report();
        report.save_json(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: GradingReport = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.outcomes, report.outcomes);
        assert_eq!(loaded.skipped, report.skipped);
        assert_eq!(loaded.question_scores, report.question_scores);
    }
}
