use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sorx_rs::engine::evaluator::{EvaluationMode, Evaluator};
use sorx_rs::engine::ranker::{Ranker, RankingStrategy};
use sorx_rs::engine::types::{Venue, VenueSet};

fn random_venues(count: usize) -> VenueSet {
    let mut rng = StdRng::seed_from_u64(11);
    let venues = (0..count)
        .map(|i| {
            Venue::new(
                &format!("V{}", i),
                rng.gen_range(95.0..105.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(100..1100),
            )
        })
        .collect();
    VenueSet::new(venues).unwrap()
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ranking");
    let evaluator = Evaluator::default().with_mode(EvaluationMode::Sequential);

    for count in [3usize, 64, 1024] {
        let mut scored = random_venues(count);
        evaluator.score(&mut scored).unwrap();

        for strategy in [RankingStrategy::Partition, RankingStrategy::Heap] {
            group.bench_with_input(BenchmarkId::new(strategy.name(), count), &scored, |b, set| {
                b.iter(|| black_box(strategy.rank(set.clone())));
            });
        }
    }
    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Evaluation");
    let venues = random_venues(3);

    for mode in [EvaluationMode::Sequential, EvaluationMode::Concurrent] {
        let evaluator = Evaluator::default().with_mode(mode);
        group.bench_function(BenchmarkId::new("score", format!("{:?}", mode)), |b| {
            b.iter(|| {
                let mut set = venues.clone();
                black_box(evaluator.score(&mut set).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ranking, bench_evaluation);
criterion_main!(benches);
