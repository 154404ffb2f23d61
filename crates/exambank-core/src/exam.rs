//! Generated exams.
//!
//! An exam is a fixed, shuffled selection of questions and answers with all
//! correctness data removed. The exam-taking surface toggles selections and
//! fills in the completion fields; grading joins the exam back onto its
//! problem set by question and answer id.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::error::ExamError;
use crate::model::{AnswerMetadata, QuestionMetadata};

/// An answer as shown on an exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerInstance {
    /// Id of the answer in the question's pool.
    pub id: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_selected: bool,
}

impl From<&AnswerMetadata> for AnswerInstance {
    fn from(meta: &AnswerMetadata) -> Self {
        Self {
            id: meta.id,
            text: meta.text.clone(),
            is_selected: false,
        }
    }
}

/// A question as shown on an exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuestion {
    /// Id of the question in the problem set.
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_multiple_choice: bool,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub answers: Vec<AnswerInstance>,
}

impl ExamQuestion {
    /// Instantiate a question, drawing and shuffling its answers.
    pub fn from_metadata<R: Rng + ?Sized>(
        meta: &QuestionMetadata,
        rng: &mut R,
    ) -> Result<Self, ExamError> {
        let answers = meta.prepare_answers(rng)?;
        Ok(Self {
            id: meta.id.clone(),
            text: meta.text.clone(),
            is_multiple_choice: meta.is_multiple_choice,
            points: meta.points,
            answers: answers.iter().map(AnswerInstance::from).collect(),
        })
    }

    /// Ids of the selected answers, in display order.
    pub fn selected_ids(&self) -> Vec<u32> {
        self.answers
            .iter()
            .filter(|a| a.is_selected)
            .map(|a| a.id)
            .collect()
    }

    /// Score this question with the grader configured in `meta`.
    pub fn grade(&self, meta: &QuestionMetadata) -> i64 {
        meta.grader.grade(meta, self)
    }
}

/// A writable exam generated from a problem set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    /// Uuid of the problem set this exam was generated from.
    pub meta_uuid: Uuid,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<ExamQuestion>,
    #[serde(default)]
    pub was_user_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Exam {
    /// Points available across all questions.
    pub fn max_score(&self) -> i64 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Total score against `bank`.
    ///
    /// `on_graded` is called with every question and its points, in exam
    /// order. Without a bank the exam cannot be graded and scores 0.
    ///
    /// # Errors
    ///
    /// [`ExamError::UnknownId`] if a question is missing from `bank`. Run
    /// [`crate::compat::ensure_compatible`] first to rule this out.
    pub fn score(
        &self,
        bank: Option<&QuestionBank>,
        mut on_graded: Option<&mut dyn FnMut(&ExamQuestion, i64)>,
    ) -> Result<i64, ExamError> {
        let Some(bank) = bank else {
            return Ok(0);
        };

        let mut score = 0;
        for question in &self.questions {
            let meta = bank
                .find_question(&question.id)
                .ok_or_else(|| ExamError::UnknownId(question.id.clone()))?;
            let points = question.grade(meta);
            if let Some(callback) = on_graded.as_deref_mut() {
                callback(question, points);
            }
            score += points;
        }

        Ok(score)
    }

    /// Select or deselect an answer.
    ///
    /// Selecting an answer of a single-choice question deselects the others.
    pub fn set_selected(
        &mut self,
        question_id: &str,
        answer_id: u32,
        selected: bool,
    ) -> Result<(), ExamError> {
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| ExamError::UnknownId(question_id.to_string()))?;

        if !question.answers.iter().any(|a| a.id == answer_id) {
            return Err(ExamError::UnknownId(format!("{question_id}/{answer_id}")));
        }

        let exclusive = selected && !question.is_multiple_choice;
        for answer in &mut question.answers {
            if answer.id == answer_id {
                answer.is_selected = selected;
            } else if exclusive {
                answer.is_selected = false;
            }
        }
        Ok(())
    }

    /// Mark the exam as submitted by `user_name`.
    pub fn complete(&mut self, user_name: impl Into<String>) {
        self.was_user_completed = true;
        self.user_name = Some(user_name.into());
        self.completed_at = Some(Utc::now());
    }

    /// Remove all user input.
    pub fn clear(&mut self) {
        self.was_user_completed = false;
        self.user_name = None;
        self.completed_at = None;
        for answer in self.questions.iter_mut().flat_map(|q| q.answers.iter_mut()) {
            answer.is_selected = false;
        }
    }
}
