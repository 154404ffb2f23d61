//! exambank-core — Question banks, weighted exam generation and grading.
//!
//! This crate defines the problem set data model, the weighted sampler used to
//! draw questions and answers, the graders, and the YAML persistence that the
//! `exambank` CLI builds on.

pub mod bank;
pub mod batch;
pub mod compat;
pub mod config;
pub mod error;
pub mod exam;
pub mod grader;
pub mod model;
pub mod report;
pub mod sampler;
pub mod statistics;
pub mod store;

pub use bank::QuestionBank;
pub use config::QuestionDefaults;
pub use error::ExamError;
pub use exam::{AnswerInstance, Exam, ExamQuestion};
pub use grader::GraderKind;
pub use model::{AnswerMetadata, AnswerPatch, QuestionMetadata, QuestionPatch};
