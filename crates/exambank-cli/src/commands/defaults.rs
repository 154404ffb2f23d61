//! The `exambank edit-defaults` command.

use anyhow::Result;

use exambank_core::store::save_bank;

use super::{Context, QuestionFields};

pub fn execute(ctx: &Context, fields: QuestionFields) -> Result<()> {
    let (mut bank, path) = ctx.require_bank()?;

    bank.question_defaults.merge(&fields.into_patch(None));
    save_bank(&mut bank, &path)?;

    print!("{}", serde_yaml::to_string(&bank.question_defaults)?);
    Ok(())
}
