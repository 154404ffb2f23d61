//! Batch grading of exam files.
//!
//! Every file in a directory goes through load → compatibility check →
//! scoring. A file that fails any step is skipped and reported; it never
//! aborts the batch.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::compat::ensure_compatible;
use crate::exam::ExamQuestion;
use crate::report::{ExamOutcome, GradingReport, SkippedExam};
use crate::statistics::ScoreDistribution;
use crate::store::load_exam;

/// Per-question scores of one exam, in exam order.
pub type QuestionScores = Vec<(String, i64)>;

/// Grade a single completed exam file.
///
/// Fails if the file cannot be parsed, was not completed, or does not belong
/// to `bank`.
pub fn grade_exam_file(bank: &QuestionBank, path: &Path) -> Result<(ExamOutcome, QuestionScores)> {
    let exam = load_exam(path)?;
    if !exam.was_user_completed {
        anyhow::bail!("not completed");
    }
    ensure_compatible(bank, &exam)?;

    let mut per_question = QuestionScores::new();
    let score = exam.score(
        Some(bank),
        Some(&mut |question: &ExamQuestion, points: i64| {
            per_question.push((question.id.clone(), points));
        }),
    )?;

    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // Graders award the problem set's points, so the maximum comes from there too.
    let max_score = exam
        .questions
        .iter()
        .filter_map(|q| bank.find_question(&q.id))
        .map(|meta| meta.points.max(0))
        .sum();

    let outcome = ExamOutcome {
        file,
        user_name: exam.user_name.clone(),
        score,
        max_score,
    };
    Ok((outcome, per_question))
}

/// Grade every file in `dir` against `bank`.
///
/// Files are processed in name order. Subdirectories are ignored.
pub fn grade_directory(bank: &QuestionBank, dir: &Path) -> Result<GradingReport> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut outcomes = Vec::new();
    let mut skipped = Vec::new();
    let mut question_scores: BTreeMap<String, ScoreDistribution> = BTreeMap::new();

    for path in &paths {
        match grade_exam_file(bank, path) {
            Ok((outcome, per_question)) => {
                for (question_id, points) in per_question {
                    *question_scores
                        .entry(question_id)
                        .or_default()
                        .entry(points)
                        .or_default() += 1;
                }
                outcomes.push(outcome);
            }
            Err(e) => {
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                tracing::warn!("skipping {}: {:#}", path.display(), e);
                skipped.push(SkippedExam {
                    file,
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    tracing::info!(
        graded = outcomes.len(),
        skipped = skipped.len(),
        "graded exams in {}",
        dir.display()
    );

    Ok(GradingReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        problem_set: bank.title.clone(),
        problem_set_uuid: bank.uuid(),
        outcomes,
        skipped,
        question_scores,
    })
}
