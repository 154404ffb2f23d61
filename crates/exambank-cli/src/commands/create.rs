//! The `exambank create-problem-set` command.

use std::path::PathBuf;

use anyhow::Result;

use exambank_core::store::save_bank;
use exambank_core::QuestionBank;

use super::Context;

pub fn execute(_ctx: &Context, path: PathBuf, title: String) -> Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }

    let mut bank = QuestionBank::new(title);
    save_bank(&mut bank, &path)?;

    println!("Created problem set {} ({})", path.display(), bank.uuid());
    Ok(())
}
