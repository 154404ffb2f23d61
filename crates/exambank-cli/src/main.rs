//! exambank CLI — author problem sets, generate exams and grade them.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::{Context, QuestionFields};

#[derive(Parser)]
#[command(
    name = "exambank",
    version,
    about = "Question banks, randomized exams and grading"
)]
struct Cli {
    /// Problem set file to operate on
    #[arg(short = 's', long, global = true)]
    problem_set: Option<PathBuf>,

    /// Question defaults file (TOML)
    #[arg(long, global = true)]
    defaults: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty problem set
    CreateProblemSet {
        /// Where to write the problem set
        #[arg(short, long)]
        path: PathBuf,

        /// Problem set title
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Edit the problem set's question defaults
    EditDefaults {
        #[command(flatten)]
        fields: QuestionFields,
    },

    /// Add a new question
    AddQuestion {
        /// Question id
        #[arg(short, long)]
        id: String,

        /// Question text
        #[arg(short, long)]
        text: Option<String>,

        #[command(flatten)]
        fields: QuestionFields,
    },

    /// Edit an existing question
    EditQuestion {
        /// Question id
        #[arg(short, long)]
        id: String,

        /// Question text
        #[arg(short, long)]
        text: Option<String>,

        #[command(flatten)]
        fields: QuestionFields,
    },

    /// Print a single question
    GetQuestion {
        /// Question id
        id: String,

        /// Output format: yaml, json
        #[arg(long, default_value = "yaml")]
        format: String,
    },

    /// List questions and their answers
    ListQuestions {
        /// Only list these question ids
        #[arg(short, long = "id")]
        ids: Vec<String>,

        /// Do not print answers
        #[arg(long)]
        hide_answers: bool,
    },

    /// Add an answer to a question, or update an existing one by id
    AddAnswer {
        /// Question id
        #[arg(short = 'q', long)]
        question_id: String,

        /// Answer text
        #[arg(short, long)]
        text: Option<String>,

        /// Whether the answer is correct
        #[arg(short, long)]
        correct: Option<bool>,

        /// Sampling weight
        #[arg(short, long)]
        likelihood: Option<i64>,

        /// Answer id (allocated if omitted)
        #[arg(short, long)]
        id: Option<u32>,
    },

    /// Generate a randomized exam
    GenExam {
        /// Exam title (defaults to the problem set title)
        #[arg(short, long)]
        title: Option<String>,

        /// Exam description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Number of questions to draw
        #[arg(short, long)]
        num_questions: i64,

        /// Where to write the exam
        #[arg(short, long)]
        path: PathBuf,

        /// Seed for reproducible exams
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Remove all answers and the submission state from an exam
    ClearExam {
        /// Exam file
        exam: PathBuf,
    },

    /// Grade every exam in a directory
    GradeExams {
        /// Directory with completed exams
        directory: PathBuf,

        /// Show per-question score distributions
        #[arg(short = 'q', long)]
        display_questions: bool,

        /// Also write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("exambank_core=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = Context::load(cli.problem_set, cli.defaults.as_deref()).and_then(|ctx| {
        match cli.command {
            Commands::CreateProblemSet { path, title } => {
                commands::create::execute(&ctx, path, title)
            }
            Commands::EditDefaults { fields } => commands::defaults::execute(&ctx, fields),
            Commands::AddQuestion { id, text, fields } => {
                commands::question::add(&ctx, id, text, fields)
            }
            Commands::EditQuestion { id, text, fields } => {
                commands::question::edit(&ctx, id, text, fields)
            }
            Commands::GetQuestion { id, format } => commands::question::get(&ctx, id, format),
            Commands::ListQuestions { ids, hide_answers } => {
                commands::question::list(&ctx, ids, hide_answers)
            }
            Commands::AddAnswer {
                question_id,
                text,
                correct,
                likelihood,
                id,
            } => commands::question::add_answer(&ctx, question_id, id, text, correct, likelihood),
            Commands::GenExam {
                title,
                description,
                num_questions,
                path,
                seed,
            } => commands::exam::generate(&ctx, title, description, num_questions, path, seed),
            Commands::ClearExam { exam } => commands::exam::clear(exam),
            Commands::GradeExams {
                directory,
                display_questions,
                json,
            } => commands::grade::execute(&ctx, directory, display_questions, json),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
