//! Question defaults configuration.
//!
//! The defaults document is read once at startup and handed to every
//! operation that creates questions. It is never re-read implicitly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grader::GraderKind;

/// Defaults shipped with the crate.
const BUNDLED_DEFAULTS: &str = include_str!("../question_defaults.toml");

/// File name looked up in the working directory and the user config directory.
pub const DEFAULTS_FILE_NAME: &str = "question_defaults.toml";

/// Values used for question fields that neither the problem set template nor
/// the caller specify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefaults {
    /// How many answers an exam instance of the question shows.
    pub num_answers: u32,
    /// How many of the shown answers are correct.
    pub num_correct_answers: u32,
    /// Whether more than one answer may be selected.
    pub is_multiple_choice: bool,
    /// Sampling weight of the question.
    pub likelihood: i64,
    /// Points awarded for a fully correct answer.
    pub points: i64,
    /// Grading algorithm.
    #[serde(default)]
    pub grader: GraderKind,
}

impl QuestionDefaults {
    /// The defaults compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_DEFAULTS, Path::new(DEFAULTS_FILE_NAME))
    }

    /// Parse a defaults document. Every field except `grader` is required.
    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| format!("failed to parse question defaults: {}", source_path.display()))
    }
}

/// Load question defaults.
///
/// Search order:
/// 1. the explicit `path`, which must exist
/// 2. `question_defaults.toml` in the current directory
/// 3. `~/.config/exambank/question_defaults.toml`
/// 4. the bundled defaults
pub fn load_defaults(path: Option<&Path>) -> Result<QuestionDefaults> {
    let defaults_path = if let Some(p) = path {
        if !p.exists() {
            anyhow::bail!("question defaults file not found: {}", p.display());
        }
        Some(p.to_path_buf())
    } else {
        let local = PathBuf::from(DEFAULTS_FILE_NAME);
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join(DEFAULTS_FILE_NAME))
                .filter(|global| global.exists())
        }
    };

    match defaults_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read question defaults: {}", path.display()))?;
            let defaults = QuestionDefaults::from_toml_str(&content, &path)?;
            tracing::debug!(path = %path.display(), "loaded question defaults");
            Ok(defaults)
        }
        None => QuestionDefaults::bundled(),
    }
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("exambank"))
}
