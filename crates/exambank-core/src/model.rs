//! Question and answer metadata.
//!
//! These types hold the authoritative content of a problem set, correctness
//! flags included. They are never shown to the exam-taker; exams carry the
//! stripped-down types from [`crate::exam`].

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::QuestionDefaults;
use crate::error::ExamError;
use crate::grader::GraderKind;
use crate::sampler::weighted_sample;

/// One possible answer in a question's pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMetadata {
    /// Unique within the question. Zero means "not assigned yet".
    #[serde(default)]
    pub id: u32,
    /// Answer text.
    #[serde(default)]
    pub text: String,
    /// Whether selecting this answer is correct.
    #[serde(default)]
    pub is_correct: bool,
    /// Sampling weight when the question is instantiated.
    #[serde(default = "default_answer_likelihood")]
    pub likelihood: i64,
}

fn default_answer_likelihood() -> i64 {
    1
}

impl Default for AnswerMetadata {
    fn default() -> Self {
        Self {
            id: 0,
            text: String::new(),
            is_correct: false,
            likelihood: default_answer_likelihood(),
        }
    }
}

impl AnswerMetadata {
    /// Overwrite the fields set in `patch`.
    pub fn apply(&mut self, patch: &AnswerPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(is_correct) = patch.is_correct {
            self.is_correct = is_correct;
        }
        if let Some(likelihood) = patch.likelihood {
            self.likelihood = likelihood;
        }
    }
}

impl fmt::Display for AnswerMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_correct { '+' } else { '-' };
        write!(f, "{}: [{}] {}", self.id, mark, self.text)
    }
}

/// Field-by-field changes to an answer. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerPatch {
    pub text: Option<String>,
    pub is_correct: Option<bool>,
    pub likelihood: Option<i64>,
}

/// Field-by-field changes to a question. `None` keeps the current value.
///
/// Also serves as the sparse per-problem-set defaults template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_answers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_correct_answers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_multiple_choice: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likelihood: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grader: Option<GraderKind>,
}

impl QuestionPatch {
    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == QuestionPatch::default()
    }

    /// Layer `other` on top of this patch; fields set in `other` win.
    pub fn merge(&mut self, other: &QuestionPatch) {
        if other.text.is_some() {
            self.text.clone_from(&other.text);
        }
        self.num_answers = other.num_answers.or(self.num_answers);
        self.num_correct_answers = other.num_correct_answers.or(self.num_correct_answers);
        self.is_multiple_choice = other.is_multiple_choice.or(self.is_multiple_choice);
        self.likelihood = other.likelihood.or(self.likelihood);
        self.points = other.points.or(self.points);
        self.grader = other.grader.or(self.grader);
    }
}

/// A question together with its full answer pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    /// Problem set key; stored as the map key in files.
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Answers shown per exam instance.
    pub num_answers: u32,
    /// Correct answers among the shown ones.
    pub num_correct_answers: u32,
    pub is_multiple_choice: bool,
    /// Sampling weight when generating an exam.
    pub likelihood: i64,
    pub points: i64,
    #[serde(default)]
    pub grader: GraderKind,
    #[serde(default)]
    pub answers: Vec<AnswerMetadata>,
}

impl QuestionMetadata {
    /// An empty question seeded from the global defaults.
    pub fn from_defaults(id: impl Into<String>, defaults: &QuestionDefaults) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            num_answers: defaults.num_answers,
            num_correct_answers: defaults.num_correct_answers,
            is_multiple_choice: defaults.is_multiple_choice,
            likelihood: defaults.likelihood,
            points: defaults.points,
            grader: defaults.grader,
            answers: Vec::new(),
        }
    }

    /// Overwrite the fields set in `patch`. Answers are left untouched.
    pub fn apply(&mut self, patch: &QuestionPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(num_answers) = patch.num_answers {
            self.num_answers = num_answers;
        }
        if let Some(num_correct_answers) = patch.num_correct_answers {
            self.num_correct_answers = num_correct_answers;
        }
        if let Some(is_multiple_choice) = patch.is_multiple_choice {
            self.is_multiple_choice = is_multiple_choice;
        }
        if let Some(likelihood) = patch.likelihood {
            self.likelihood = likelihood;
        }
        if let Some(points) = patch.points {
            self.points = points;
        }
        if let Some(grader) = patch.grader {
            self.grader = grader;
        }
    }

    /// The answer with the given id, if any.
    pub fn find_answer(&self, id: u32) -> Option<&AnswerMetadata> {
        self.answers.iter().find(|a| a.id == id)
    }

    /// One past the largest answer id in the pool.
    ///
    /// Fails with [`ExamError::Overflow`] once the pool holds `u32::MAX`.
    pub fn next_answer_id(&self) -> Result<u32, ExamError> {
        let max = self.answers.iter().map(|a| a.id).max().unwrap_or(0);
        max.checked_add(1)
            .ok_or_else(|| ExamError::Overflow(format!("question `{}`: answer ids exhausted", self.id)))
    }

    /// Insert an answer, or update the one with the same id.
    ///
    /// An existing answer keeps every field `patch` leaves unset. A missing or
    /// zero `id` allocates the next free one.
    pub fn insert_answer(
        &mut self,
        id: Option<u32>,
        patch: &AnswerPatch,
    ) -> Result<&AnswerMetadata, ExamError> {
        let id = id.filter(|id| *id != 0);

        let index = match id.and_then(|id| self.answers.iter().position(|a| a.id == id)) {
            Some(index) => {
                self.answers[index].apply(patch);
                index
            }
            None => {
                let id = match id {
                    Some(id) => id,
                    None => self.next_answer_id()?,
                };
                let mut answer = AnswerMetadata {
                    id,
                    ..AnswerMetadata::default()
                };
                answer.apply(patch);
                self.answers.push(answer);
                self.answers.len() - 1
            }
        };

        Ok(&self.answers[index])
    }

    /// Normalize the question: assign missing answer ids, force multiple
    /// choice unless exactly one answer is correct, clamp points at zero.
    pub fn validate(&mut self) {
        for index in 0..self.answers.len() {
            if self.answers[index].id == 0 {
                // An exhausted id space leaves the answer unnumbered.
                if let Ok(id) = self.next_answer_id() {
                    self.answers[index].id = id;
                }
            }
        }
        if self.num_correct_answers != 1 {
            self.is_multiple_choice = true;
        }
        self.points = self.points.max(0);
    }

    /// Pick and shuffle the answers for one exam instance.
    ///
    /// Draws `num_correct_answers` correct and
    /// `num_answers - num_correct_answers` wrong answers by likelihood, then
    /// shuffles them together. The pool itself is not modified.
    pub fn prepare_answers<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<AnswerMetadata>, ExamError> {
        let (correct, wrong): (Vec<&AnswerMetadata>, Vec<&AnswerMetadata>) =
            self.answers.iter().partition(|a| a.is_correct);

        let correct_count = i64::from(self.num_correct_answers);
        let wrong_count = i64::from(self.num_answers) - correct_count;

        self.check_pool(correct.len(), correct_count, "correct answers")?;
        self.check_pool(wrong.len(), wrong_count, "wrong answers")?;

        let mut answers = weighted_sample(correct, |a| a.likelihood, correct_count, rng)?;
        answers.extend(weighted_sample(wrong, |a| a.likelihood, wrong_count, rng)?);
        answers.shuffle(rng);

        Ok(answers.into_iter().cloned().collect())
    }

    fn check_pool(&self, available: usize, expected: i64, what: &str) -> Result<(), ExamError> {
        if expected > available as i64 {
            return Err(ExamError::Scheme(format!(
                "question `{}`, {what}: got {available}, expected {expected}",
                self.id
            )));
        }
        Ok(())
    }
}
