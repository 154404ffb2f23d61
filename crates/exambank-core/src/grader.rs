//! Question graders.
//!
//! A grader maps a question's authoritative metadata and the exam-taker's
//! selections onto a non-negative number of points. Graders are resolved by
//! name when a problem set is loaded, so an unknown name never reaches scoring.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExamError;
use crate::exam::ExamQuestion;
use crate::model::QuestionMetadata;

/// The available grading algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GraderKind {
    /// All points only if exactly the correct answers were selected.
    #[default]
    Binary,
    /// Points proportional to the selected correct answers, zero on any wrong one.
    Linear,
}

impl GraderKind {
    /// Every grader, in display order.
    pub const ALL: [GraderKind; 2] = [GraderKind::Binary, GraderKind::Linear];

    /// The name used in problem set files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            GraderKind::Binary => "binary",
            GraderKind::Linear => "linear",
        }
    }

    /// Grade one exam question against its metadata.
    pub fn grade(self, meta: &QuestionMetadata, question: &ExamQuestion) -> i64 {
        match self {
            GraderKind::Binary => binary_grader(meta, question),
            GraderKind::Linear => linear_grader(meta, question),
        }
    }
}

impl fmt::Display for GraderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GraderKind {
    type Err = ExamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GraderKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ExamError::UnsupportedGrader(s.to_string()))
    }
}

impl TryFrom<String> for GraderKind {
    type Error = ExamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GraderKind> for String {
    fn from(kind: GraderKind) -> Self {
        kind.name().to_string()
    }
}

/// Grants all of the question's points only when the selected answers are
/// exactly the correct answers of the question's pool.
pub fn binary_grader(meta: &QuestionMetadata, question: &ExamQuestion) -> i64 {
    if meta.id != question.id {
        return 0;
    }
    if question
        .answers
        .iter()
        .any(|answer| meta.find_answer(answer.id).is_none())
    {
        return 0;
    }

    let selected: BTreeSet<u32> = question.selected_ids().into_iter().collect();
    let correct: BTreeSet<u32> = meta
        .answers
        .iter()
        .filter(|a| a.is_correct)
        .map(|a| a.id)
        .collect();

    if selected == correct {
        meta.points.max(0)
    } else {
        0
    }
}

/// Grants points in proportion to the selected correct answers out of all
/// correct answers in the question's pool. Any selected wrong answer scores 0.
pub fn linear_grader(meta: &QuestionMetadata, question: &ExamQuestion) -> i64 {
    if meta.id != question.id {
        return 0;
    }

    let mut selected_correct: i64 = 0;
    for answer in &question.answers {
        let Some(answer_meta) = meta.find_answer(answer.id) else {
            return 0;
        };
        if answer.is_selected {
            if !answer_meta.is_correct {
                return 0;
            }
            selected_correct += 1;
        }
    }

    let total_correct = meta.answers.iter().filter(|a| a.is_correct).count() as i64;
    let points = meta.points.max(0);
    if total_correct == 0 {
        return points;
    }

    let scaled = i128::from(points) * i128::from(selected_correct) / i128::from(total_correct);
    i64::try_from(scaled).unwrap_or(points)
}
