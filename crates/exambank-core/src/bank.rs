//! Problem sets.
//!
//! A [`QuestionBank`] owns every question's metadata plus a sparse defaults
//! template, and generates exams from them.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::compat;
use crate::config::QuestionDefaults;
use crate::error::ExamError;
use crate::exam::{Exam, ExamQuestion};
use crate::model::{AnswerMetadata, AnswerPatch, QuestionMetadata, QuestionPatch};
use crate::sampler::weighted_sample;

/// All question metadata of a problem set, keyed by question id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBank {
    pub(crate) uuid: Uuid,
    /// Display name.
    pub title: String,
    /// Questions keyed by id. Ordered so sampling sees a stable input order.
    pub questions: BTreeMap<String, QuestionMetadata>,
    /// Values for fields a new question leaves unset, ahead of the global defaults.
    #[serde(skip_serializing_if = "QuestionPatch::is_empty")]
    pub question_defaults: QuestionPatch,
}

impl QuestionBank {
    /// An empty problem set with a fresh identity.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_uuid(Uuid::new_v4(), title)
    }

    /// An empty problem set with a known identity, e.g. when loading from disk.
    pub fn with_uuid(uuid: Uuid, title: impl Into<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
            questions: BTreeMap::new(),
            question_defaults: QuestionPatch::default(),
        }
    }

    /// Identity token copied into every generated exam.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Build a question from the global defaults, then this problem set's
    /// template, then `overrides`. Later layers win field by field.
    pub fn create_question(
        &self,
        defaults: &QuestionDefaults,
        id: &str,
        overrides: &QuestionPatch,
    ) -> QuestionMetadata {
        let mut question = QuestionMetadata::from_defaults(id, defaults);
        question.apply(&self.question_defaults);
        question.apply(overrides);
        question
    }

    /// Insert a new question, or update an existing one when `allow_edit` is set.
    ///
    /// An existing question keeps its answers and every field `overrides`
    /// leaves unset.
    pub fn insert_question(
        &mut self,
        defaults: &QuestionDefaults,
        allow_edit: bool,
        id: &str,
        overrides: &QuestionPatch,
    ) -> Result<&QuestionMetadata, ExamError> {
        let question = match self.questions.entry(id.to_string()) {
            Entry::Occupied(_) if !allow_edit => {
                return Err(ExamError::DuplicateId(id.to_string()))
            }
            Entry::Occupied(entry) => {
                let question = entry.into_mut();
                question.apply(overrides);
                question
            }
            Entry::Vacant(entry) => {
                let mut question = QuestionMetadata::from_defaults(id, defaults);
                question.apply(&self.question_defaults);
                question.apply(overrides);
                entry.insert(question)
            }
        };

        tracing::debug!(question = id, "question stored");
        Ok(question)
    }

    /// Update an existing question.
    pub fn edit_question(
        &mut self,
        id: &str,
        overrides: &QuestionPatch,
    ) -> Result<&QuestionMetadata, ExamError> {
        let question = self
            .questions
            .get_mut(id)
            .ok_or_else(|| ExamError::UnknownId(id.to_string()))?;
        question.apply(overrides);
        Ok(question)
    }

    /// The question with the given id, if any.
    pub fn find_question(&self, id: &str) -> Option<&QuestionMetadata> {
        self.questions.get(id)
    }

    /// Insert or update an answer of an existing question.
    pub fn insert_answer(
        &mut self,
        question_id: &str,
        answer_id: Option<u32>,
        overrides: &AnswerPatch,
    ) -> Result<&AnswerMetadata, ExamError> {
        let question = self
            .questions
            .get_mut(question_id)
            .ok_or_else(|| ExamError::UnknownId(question_id.to_string()))?;
        question.insert_answer(answer_id, overrides)
    }

    /// Normalize every question. Run before saving and after loading.
    pub fn validate(&mut self) {
        for question in self.questions.values_mut() {
            question.validate();
        }
    }

    /// Generate an exam of `num_questions` questions drawn by likelihood.
    ///
    /// Each drawn question is normalized on a copy, so the problem set is
    /// never modified. `title` falls back to the problem set's title.
    pub fn generate_exam<R: Rng + ?Sized>(
        &self,
        num_questions: i64,
        description: &str,
        title: Option<&str>,
        rng: &mut R,
    ) -> Result<Exam, ExamError> {
        let drawn = weighted_sample(self.questions.values(), |q| q.likelihood, num_questions, rng)?;

        let mut questions = Vec::with_capacity(drawn.len());
        for meta in drawn {
            let mut meta = meta.clone();
            meta.validate();
            questions.push(ExamQuestion::from_metadata(&meta, rng)?);
        }

        let title = title
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
            .to_string();

        tracing::debug!(
            problem_set = %self.uuid,
            questions = questions.len(),
            "exam generated"
        );

        Ok(Exam {
            meta_uuid: self.uuid,
            generated_at: Utc::now(),
            title,
            description: description.to_string(),
            questions,
            was_user_completed: false,
            user_name: None,
            completed_at: None,
        })
    }

    /// Check that `exam` was generated from this problem set.
    pub fn ensure_compatible(&self, exam: &Exam) -> Result<(), ExamError> {
        compat::ensure_compatible(self, exam)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::grader::GraderKind;

    fn defaults() -> QuestionDefaults {
        QuestionDefaults::bundled().unwrap()
    }

    fn patch_points(points: i64) -> QuestionPatch {
        QuestionPatch {
            points: Some(points),
            ..Default::default()
        }
    }

    /// A bank of `n` questions with two correct and two wrong answers each.
    fn populated(n: usize) -> QuestionBank {
        let defaults = defaults();
        let mut bank = QuestionBank::new("Geography");
        for i in 0..n {
            let id = format!("q{i}");
            bank.insert_question(
                &defaults,
                false,
                &id,
                &QuestionPatch {
                    text: Some(format!("Question {i}")),
                    num_answers: Some(3),
                    num_correct_answers: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();
            for a in 0..4 {
                bank.insert_answer(
                    &id,
                    None,
                    &AnswerPatch {
                        text: Some(format!("Answer {a}")),
                        is_correct: Some(a < 2),
                        likelihood: None,
                    },
                )
                .unwrap();
            }
        }
        bank
    }

    #[test]
    fn insert_question_rejects_duplicates() {
        let mut bank = QuestionBank::new("Test");
        bank.insert_question(&defaults(), false, "test", &QuestionPatch::default())
            .unwrap();
        assert_eq!(bank.questions.len(), 1);
        let err = bank
            .insert_question(&defaults(), false, "test", &QuestionPatch::default())
            .unwrap_err();
        assert_eq!(err, ExamError::DuplicateId("test".into()));
    }

    #[test]
    fn insert_question_edit_keeps_other_fields() {
        let mut bank = QuestionBank::new("Test");
        bank.insert_question(
            &defaults(),
            false,
            "test",
            &QuestionPatch {
                text: Some("Capital of France?".into()),
                points: Some(3),
                grader: Some(GraderKind::Linear),
                ..Default::default()
            },
        )
        .unwrap();
        bank.insert_answer("test", None, &AnswerPatch::default()).unwrap();

        let edited = bank
            .insert_question(
                &defaults(),
                true,
                "test",
                &QuestionPatch {
                    num_answers: Some(1),
                    ..Default::default()
                },
            )
            .unwrap()
            .clone();

        assert_eq!(bank.questions.len(), 1);
        assert_eq!(edited.num_answers, 1);
        assert_eq!(edited.text, "Capital of France?");
        assert_eq!(edited.points, 3);
        assert_eq!(edited.grader, GraderKind::Linear);
        assert_eq!(edited.answers.len(), 1);
    }

    #[test]
    fn create_question_layers_defaults() {
        let mut bank = QuestionBank::new("Test");
        bank.question_defaults = QuestionPatch {
            points: Some(5),
            num_answers: Some(6),
            ..Default::default()
        };
        let q = bank.create_question(&defaults(), "x", &patch_points(9));
        assert_eq!(q.id, "x");
        assert_eq!(q.points, 9);
        assert_eq!(q.num_answers, 6);
        assert_eq!(q.num_correct_answers, defaults().num_correct_answers);
    }

    #[test]
    fn edit_and_answer_unknown_question() {
        let mut bank = QuestionBank::new("Test");
        assert_eq!(
            bank.edit_question("nope", &patch_points(1)).unwrap_err(),
            ExamError::UnknownId("nope".into())
        );
        assert_eq!(
            bank.insert_answer("nope", None, &AnswerPatch::default())
                .unwrap_err(),
            ExamError::UnknownId("nope".into())
        );
    }

    #[test]
    fn generate_exam_shapes_questions() {
        let bank = populated(5);
        let mut rng = StdRng::seed_from_u64(9);
        let exam = bank.generate_exam(3, "Midterm", None, &mut rng).unwrap();

        assert_eq!(exam.meta_uuid, bank.uuid());
        assert_eq!(exam.title, "Geography");
        assert_eq!(exam.description, "Midterm");
        assert_eq!(exam.questions.len(), 3);

        let ids: HashSet<_> = exam.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        for question in &exam.questions {
            let meta = bank.find_question(&question.id).unwrap();
            assert_eq!(question.answers.len(), 3);
            let correct = question
                .answers
                .iter()
                .filter(|a| meta.find_answer(a.id).unwrap().is_correct)
                .count();
            assert_eq!(correct, 1);
            assert!(question.answers.iter().all(|a| !a.is_selected));
        }
        bank.ensure_compatible(&exam).unwrap();
    }

    #[test]
    fn generate_exam_uses_explicit_title() {
        let bank = populated(2);
        let mut rng = StdRng::seed_from_u64(1);
        let exam = bank
            .generate_exam(2, "", Some("Pop quiz"), &mut rng)
            .unwrap();
        assert_eq!(exam.title, "Pop quiz");
    }

    #[test]
    fn generate_exam_skips_disabled_questions() {
        let mut bank = populated(4);
        bank.edit_question(
            "q0",
            &QuestionPatch {
                likelihood: Some(0),
                ..Default::default()
            },
        )
        .unwrap();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let exam = bank.generate_exam(3, "", None, &mut rng).unwrap();
            assert!(exam.questions.iter().all(|q| q.id != "q0"));
        }

        let mut rng = StdRng::seed_from_u64(0);
        let err = bank.generate_exam(4, "", None, &mut rng).unwrap_err();
        assert_eq!(
            err,
            ExamError::InsufficientCandidates {
                available: 3,
                requested: 4
            }
        );
    }

    #[test]
    fn generate_exam_does_not_touch_the_bank() {
        let mut bank = populated(2);
        bank.questions
            .get_mut("q0")
            .unwrap()
            .answers
            .push(AnswerMetadata::default());
        bank.questions.get_mut("q1").unwrap().points = -2;
        let before = bank.clone();

        let mut rng = StdRng::seed_from_u64(4);
        let exam = bank.generate_exam(2, "", None, &mut rng).unwrap();

        assert_eq!(bank, before);
        let q1 = exam.questions.iter().find(|q| q.id == "q1").unwrap();
        assert_eq!(q1.points, 0);
    }

    #[test]
    fn generate_exam_propagates_scheme_errors() {
        let mut bank = populated(1);
        bank.edit_question(
            "q0",
            &QuestionPatch {
                num_correct_answers: Some(3),
                num_answers: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let err = bank.generate_exam(1, "", None, &mut rng).unwrap_err();
        assert!(matches!(err, ExamError::Scheme(msg) if msg.contains("correct answers: got 2, expected 3")));
    }

    #[test]
    fn scoring_reports_every_question() {
        let mut bank = populated(3);
        // Show both correct answers so a full selection is possible.
        for question in bank.questions.values_mut() {
            question.num_correct_answers = 2;
        }
        let mut rng = StdRng::seed_from_u64(5);
        let mut exam = bank.generate_exam(3, "", None, &mut rng).unwrap();

        // Answer the first question correctly, leave the rest blank.
        let first = exam.questions[0].clone();
        let meta = bank.find_question(&first.id).unwrap();
        for answer in &first.answers {
            if meta.find_answer(answer.id).unwrap().is_correct {
                exam.set_selected(&first.id, answer.id, true).unwrap();
            }
        }

        let mut seen = Vec::new();
        let score = exam
            .score(Some(&bank), Some(&mut |q: &ExamQuestion, points: i64| {
                seen.push((q.id.clone(), points));
            }))
            .unwrap();

        assert_eq!(score, meta.points);
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (first.id.clone(), meta.points));
        assert!(seen[1..].iter().all(|(_, p)| *p == 0));
    }

    #[test]
    fn scoring_against_a_foreign_bank_fails() {
        let bank = populated(2);
        let mut rng = StdRng::seed_from_u64(5);
        let exam = bank.generate_exam(2, "", None, &mut rng).unwrap();

        let other = QuestionBank::new("Other");
        assert!(matches!(
            exam.score(Some(&other), None),
            Err(ExamError::UnknownId(_))
        ));
    }
}
