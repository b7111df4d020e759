use criterion::{criterion_group, criterion_main, Criterion};
use metaclass::_internal_test_data::{RANDOM_SEQUENCES, SIMPLE_DATABASE};
use metaclass::model::{ContextModel, ModelParams};
use metaclass::pairwise::PairwiseComparator;
use metaclass::score::compute_nrc;

fn train_and_score(c: &mut Criterion) {
    let params = ModelParams::new(6, 0.5).unwrap();

    c.bench_function("Train k=6 model on 1k acids", |b| {
        b.iter(|| {
            let model = ContextModel::trained(params, &RANDOM_SEQUENCES[0]);
            assert!(model.context_num() > 0);
        })
    });

    let model = ContextModel::trained(params, &RANDOM_SEQUENCES[0]);
    c.bench_function("Score 1k acids with k=6 model", |b| {
        b.iter(|| {
            let nrc = compute_nrc(&model, &RANDOM_SEQUENCES[1]).unwrap();
            assert!(nrc.get() > 0.0);
        })
    });
}

fn pairwise_matrix(c: &mut Criterion) {
    let comparator = PairwiseComparator::new(ModelParams::new(3, 1.0).unwrap());
    let sequences: Vec<_> = SIMPLE_DATABASE.iter().collect();

    c.bench_function("5x5 similarity matrix", |b| {
        b.iter(|| {
            let matrix = comparator.compare(&sequences).unwrap();
            assert_eq!(matrix.len(), 5);
        })
    });
}

criterion_group!(benches, train_and_score, pairwise_matrix);
criterion_main!(benches);
