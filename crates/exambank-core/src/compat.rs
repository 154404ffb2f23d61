//! Exam / problem set compatibility.

use crate::bank::QuestionBank;
use crate::error::ExamError;
use crate::exam::Exam;

/// Check that `exam` was generated from `bank`.
///
/// The uuids must match and every exam question must still exist in the
/// problem set. Grading an incompatible exam is rejected, never attempted.
pub fn ensure_compatible(bank: &QuestionBank, exam: &Exam) -> Result<(), ExamError> {
    let fail = |reason: String| {
        ExamError::Scheme(format!(
            "problem set `{}` does not match the exam `{}` ({reason})",
            bank.title, exam.title
        ))
    };

    if bank.uuid() != exam.meta_uuid {
        return Err(fail("UUID".into()));
    }

    if let Some(missing) = exam
        .questions
        .iter()
        .find(|q| bank.find_question(&q.id).is_none())
    {
        return Err(fail(format!("missing question: {}", missing.id)));
    }

    Ok(())
}
