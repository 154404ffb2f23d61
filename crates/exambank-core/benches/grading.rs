use criterion::{black_box, criterion_group, criterion_main, Criterion};

use exambank_core::{AnswerInstance, AnswerMetadata, ExamQuestion, GraderKind, QuestionMetadata};

fn make_question(answers: u32, grader: GraderKind) -> (QuestionMetadata, ExamQuestion) {
    let meta = QuestionMetadata {
        id: "bench".into(),
        text: "bench".into(),
        num_answers: answers,
        num_correct_answers: answers / 2,
        is_multiple_choice: true,
        likelihood: 1,
        points: 10,
        grader,
        answers: (1..=answers)
            .map(|id| AnswerMetadata {
                id,
                text: id.to_string(),
                is_correct: id % 2 == 0,
                likelihood: 1,
            })
            .collect(),
    };
    let question = ExamQuestion {
        id: "bench".into(),
        text: "bench".into(),
        is_multiple_choice: true,
        points: 10,
        answers: (1..=answers)
            .map(|id| AnswerInstance {
                id,
                text: id.to_string(),
                is_selected: id % 4 == 0,
            })
            .collect(),
    };
    (meta, question)
}

fn bench_graders(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    for grader in GraderKind::ALL {
        let (meta, question) = make_question(8, grader);
        group.bench_function(format!("{grader}/8 answers"), |b| {
            b.iter(|| grader.grade(black_box(&meta), black_box(&question)))
        });

        let (meta, question) = make_question(64, grader);
        group.bench_function(format!("{grader}/64 answers"), |b| {
            b.iter(|| grader.grade(black_box(&meta), black_box(&question)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_graders);
criterion_main!(benches);
