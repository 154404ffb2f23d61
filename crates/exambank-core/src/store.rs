//! YAML persistence for problem sets and exams.
//!
//! Problem set files store questions as a map keyed by id. Question fields
//! left out of a file are filled from the file's `question_defaults`, then
//! from the global defaults.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::config::QuestionDefaults;
use crate::exam::Exam;
use crate::model::{AnswerMetadata, QuestionPatch};

/// Intermediate structure for parsing problem set files.
#[derive(Debug, Deserialize)]
struct BankFile {
    uuid: Uuid,
    #[serde(default)]
    title: String,
    #[serde(default)]
    questions: BTreeMap<String, BankFileQuestion>,
    #[serde(default)]
    question_defaults: QuestionPatch,
}

#[derive(Debug, Deserialize)]
struct BankFileQuestion {
    #[serde(flatten)]
    fields: QuestionPatch,
    #[serde(default)]
    answers: Vec<AnswerMetadata>,
}

/// Load and validate a problem set file.
pub fn load_bank(path: &Path, defaults: &QuestionDefaults) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read problem set: {}", path.display()))?;

    load_bank_str(&content, path, defaults)
}

/// Parse and validate a problem set from a YAML string.
pub fn load_bank_str(
    content: &str,
    source_path: &Path,
    defaults: &QuestionDefaults,
) -> Result<QuestionBank> {
    let parsed: BankFile = serde_yaml::from_str(content)
        .with_context(|| format!("invalid problem set: {}", source_path.display()))?;

    let mut bank = QuestionBank::with_uuid(parsed.uuid, parsed.title);
    bank.question_defaults = parsed.question_defaults;

    for (id, raw) in parsed.questions {
        let mut question = bank.create_question(defaults, &id, &raw.fields);
        question.answers = raw.answers;
        bank.questions.insert(id, question);
    }

    bank.validate();
    tracing::debug!(
        path = %source_path.display(),
        questions = bank.questions.len(),
        "problem set loaded"
    );
    Ok(bank)
}

/// Validate and write a problem set.
pub fn save_bank(bank: &mut QuestionBank, path: &Path) -> Result<()> {
    bank.validate();
    let yaml = serde_yaml::to_string(bank).context("failed to serialize problem set")?;
    write_file(path, &yaml)?;
    tracing::info!(path = %path.display(), title = %bank.title, "problem set saved");
    Ok(())
}

/// Load an exam file.
pub fn load_exam(path: &Path) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam: {}", path.display()))?;

    load_exam_str(&content, path)
}

/// Parse an exam from a YAML string.
pub fn load_exam_str(content: &str, source_path: &Path) -> Result<Exam> {
    serde_yaml::from_str(content)
        .with_context(|| format!("invalid exam file: {}", source_path.display()))
}

/// Write an exam file.
pub fn save_exam(exam: &Exam, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(exam).context("failed to serialize exam")?;
    write_file(path, &yaml)?;
    tracing::info!(path = %path.display(), "exam saved");
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
