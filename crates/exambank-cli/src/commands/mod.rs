pub mod create;
pub mod defaults;
pub mod exam;
pub mod grade;
pub mod question;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;

use exambank_core::config::load_defaults;
use exambank_core::store::load_bank;
use exambank_core::{GraderKind, QuestionBank, QuestionDefaults, QuestionPatch};

/// State shared by every command: the global defaults and the selected
/// problem set path.
pub struct Context {
    pub defaults: QuestionDefaults,
    pub problem_set: Option<PathBuf>,
}

impl Context {
    pub fn load(problem_set: Option<PathBuf>, defaults_path: Option<&Path>) -> Result<Self> {
        let defaults = load_defaults(defaults_path).context("failed to load question defaults")?;
        Ok(Self {
            defaults,
            problem_set,
        })
    }

    /// The selected problem set path, or an error if none was given.
    pub fn problem_set_path(&self) -> Result<&Path> {
        self.problem_set
            .as_deref()
            .context("unspecified problem set (use --problem-set=PATH)")
    }

    /// Load the selected problem set.
    pub fn require_bank(&self) -> Result<(QuestionBank, PathBuf)> {
        let path = self.problem_set_path()?;
        let bank = load_bank(path, &self.defaults)?;
        Ok((bank, path.to_path_buf()))
    }
}

/// Question fields that can be set from the command line.
#[derive(Args, Debug, Default)]
pub struct QuestionFields {
    /// Answers shown per exam
    #[arg(short = 'a', long)]
    pub num_answers: Option<u32>,

    /// Correct answers shown per exam
    #[arg(short = 'c', long)]
    pub num_correct_answers: Option<u32>,

    /// Points for a fully correct answer
    #[arg(short, long)]
    pub points: Option<i64>,

    /// Grader: binary, linear
    #[arg(short, long)]
    pub grader: Option<GraderKind>,

    /// Sampling weight
    #[arg(short, long)]
    pub likelihood: Option<i64>,

    /// Whether several answers may be selected
    #[arg(short = 'm', long)]
    pub is_multiple_choice: Option<bool>,
}

impl QuestionFields {
    pub fn into_patch(self, text: Option<String>) -> QuestionPatch {
        QuestionPatch {
            text,
            num_answers: self.num_answers,
            num_correct_answers: self.num_correct_answers,
            is_multiple_choice: self.is_multiple_choice,
            likelihood: self.likelihood,
            points: self.points,
            grader: self.grader,
        }
    }
}
