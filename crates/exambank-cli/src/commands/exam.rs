//! The `exambank gen-exam` and `exambank clear-exam` commands.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use exambank_core::store::{load_exam, save_exam};

use super::Context;

pub fn generate(
    ctx: &Context,
    title: Option<String>,
    description: String,
    num_questions: i64,
    path: PathBuf,
    seed: Option<u64>,
) -> Result<()> {
    let (bank, _) = ctx.require_bank()?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let exam = match bank.generate_exam(num_questions, &description, title.as_deref(), &mut rng) {
        Ok(exam) => exam,
        Err(e) if e.is_sampling() => {
            return Err(e).context(format!("cannot draw {num_questions} question(s)"))
        }
        Err(e) => return Err(e.into()),
    };
    save_exam(&exam, &path)?;

    println!(
        "Generated exam \"{}\" with {} question(s) ({} points) at {}",
        exam.title,
        exam.questions.len(),
        exam.max_score(),
        path.display()
    );
    Ok(())
}

pub fn clear(path: PathBuf) -> Result<()> {
    let mut exam = load_exam(&path)?;
    exam.clear();
    save_exam(&exam, &path)?;

    println!("Cleared {}", path.display());
    Ok(())
}
