//! Throughput benchmarks for the full pipeline at the two population sizes
//! named in the performance targets (N ≈ 100, N ≈ 1000).

use std::collections::HashMap;

use compat_matcher::catalog::{AnswerFormat, QuestionCatalog, QuestionDescriptor, ScoringMethod, Section};
use compat_matcher::config::{Importance, MatchingConfig};
use compat_matcher::response::{Answer, Preference, PreferenceTag, Respondent, ResponseRecord};
use compat_matcher::run_matching;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample_catalog() -> QuestionCatalog {
    let mut questions = Vec::new();
    for i in 0..10 {
        questions.push(QuestionDescriptor {
            id: format!("q{i}"),
            section: if i % 2 == 0 { Section::Lifestyle } else { Section::Personality },
            answer_format: AnswerFormat::Likert,
            scoring_method: ScoringMethod::Similarity,
            options: vec![],
            range: Some((1, 5)),
            ranking_length: None,
            max_selections: None,
            linked_question_id: None,
            hard_filter: false,
            required: true,
            semantic_group_map: HashMap::new(),
            flexible_tags: vec![],
        });
    }
    QuestionCatalog::new(questions)
}

fn sample_users(n: usize, catalog: &QuestionCatalog, seed: u64) -> Vec<Respondent> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let mut responses = HashMap::new();
            for question in catalog.iter() {
                responses.insert(
                    question.id.clone(),
                    ResponseRecord {
                        own_answer: Answer::Likert(rng.gen_range(1..=5)),
                        preference: Some(Preference::Tag(PreferenceTag::Similar)),
                        importance: Importance::Important,
                        dealbreaker: false,
                    },
                );
            }
            Respondent { id: format!("user{i}"), responses }
        })
        .collect()
}

fn bench_matching(c: &mut Criterion) {
    let catalog = sample_catalog();
    let config = MatchingConfig::default();

    let mut group = c.benchmark_group("run_matching");
    for &n in &[100usize, 1000usize] {
        let users = sample_users(n, &catalog, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &users, |b, users| {
            b.iter(|| run_matching(users, &catalog, &config, None).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matching);
criterion_main!(benches);
