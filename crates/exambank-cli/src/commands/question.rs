//! Question and answer authoring commands.

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};

use exambank_core::store::save_bank;
use exambank_core::{AnswerPatch, QuestionBank, QuestionMetadata};

use super::{Context, QuestionFields};

/// `exambank add-question`
pub fn add(ctx: &Context, id: String, text: Option<String>, fields: QuestionFields) -> Result<()> {
    let (mut bank, path) = ctx.require_bank()?;

    bank.insert_question(&ctx.defaults, false, &id, &fields.into_patch(text))?;
    save_bank(&mut bank, &path)?;

    print_question(&bank, &id, "yaml")
}

/// `exambank edit-question`
pub fn edit(ctx: &Context, id: String, text: Option<String>, fields: QuestionFields) -> Result<()> {
    let (mut bank, path) = ctx.require_bank()?;

    bank.edit_question(&id, &fields.into_patch(text))?;
    save_bank(&mut bank, &path)?;

    print_question(&bank, &id, "yaml")
}

/// `exambank get-question`
pub fn get(ctx: &Context, id: String, format: String) -> Result<()> {
    let (bank, _) = ctx.require_bank()?;
    print_question(&bank, &id, &format)
}

/// `exambank list-questions`
pub fn list(ctx: &Context, ids: Vec<String>, hide_answers: bool) -> Result<()> {
    let (bank, _) = ctx.require_bank()?;

    let questions: Vec<&QuestionMetadata> = if ids.is_empty() {
        bank.questions.values().collect()
    } else {
        ids.iter()
            .map(|id| {
                bank.find_question(id)
                    .with_context(|| format!("unknown question: {id}"))
            })
            .collect::<Result<_>>()?
    };

    for question in &questions {
        println!("{}: {}", question.id, question.text);
        if !hide_answers {
            for answer in &question.answers {
                println!("\t{answer}");
            }
        }
    }
    println!("Processed {} question(s)", questions.len());
    Ok(())
}

/// `exambank add-answer`
pub fn add_answer(
    ctx: &Context,
    question_id: String,
    answer_id: Option<u32>,
    text: Option<String>,
    correct: Option<bool>,
    likelihood: Option<i64>,
) -> Result<()> {
    let (mut bank, path) = ctx.require_bank()?;

    let patch = AnswerPatch {
        text,
        is_correct: correct,
        likelihood,
    };
    let answer = bank.insert_answer(&question_id, answer_id, &patch)?.clone();
    save_bank(&mut bank, &path)?;

    println!("{question_id}/{answer}");
    Ok(())
}

fn print_question(bank: &QuestionBank, id: &str, format: &str) -> Result<()> {
    let question = bank
        .find_question(id)
        .with_context(|| format!("unknown question: {id}"))?;
    let entry = BTreeMap::from([(id, question)]);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&entry)?),
        "yaml" => print!("{}", serde_yaml::to_string(&entry)?),
        other => anyhow::bail!("unknown format: {other} (expected yaml or json)"),
    }
    Ok(())
}
