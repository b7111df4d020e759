use std::sync::Arc;

use metaclass::_internal_test_data::{PERIODIC_SAMPLE_STR, SIMPLE_DATABASE_STR};
use metaclass::database::reader::{read_database, read_sample};
use metaclass::model::{ContextModel, ModelParams};
use metaclass::pairwise::PairwiseComparator;
use metaclass::progress::DummyProgressNotifier;
use metaclass::ranking::{RankingOrchestrator, RankingParams};
use metaclass::score::{compute_complexity_profile, compute_nrc, Nrc};

#[test_log::test]
fn test_rank_loaded_database() {
    let sample = read_sample(PERIODIC_SAMPLE_STR.as_bytes()).unwrap();
    let database = read_database(SIMPLE_DATABASE_STR.as_bytes()).unwrap();
    let params = RankingParams::builder()
        .top_n(3)
        .progress_notifier(Arc::new(DummyProgressNotifier))
        .build()
        .unwrap();
    let orchestrator = RankingOrchestrator::new(ModelParams::new(2, 1.0).unwrap(), params);

    let ranking = orchestrator.rank(&sample, &database);

    let ids: Vec<_> = ranking
        .top()
        .iter()
        .map(|result| result.identifier().str())
        .collect();
    assert_eq!(ids, ["PERIODIC", "SHORT", "POLY_T"]);
    assert_eq!(ranking.all().len(), database.len());
    assert!(ranking.excluded().is_empty());
}

#[test_log::test]
fn test_compare_top_sequences() {
    let sample = read_sample(PERIODIC_SAMPLE_STR.as_bytes()).unwrap();
    let database = read_database(SIMPLE_DATABASE_STR.as_bytes()).unwrap();
    let model_params = ModelParams::new(3, 0.5).unwrap();
    let params = RankingParams::builder().top_n(4).build().unwrap();
    let orchestrator = RankingOrchestrator::new(model_params, params);

    let ranking = orchestrator.rank(&sample, &database);
    let top_sequences = ranking.top_sequences(&database);
    let matrix = PairwiseComparator::new(model_params)
        .compare(&top_sequences)
        .unwrap();

    assert_eq!(matrix.len(), 4);
    for (i, sequence) in top_sequences.iter().enumerate() {
        let model = ContextModel::trained(model_params, sequence.acids());
        assert_eq!(matrix.get(i, i), compute_nrc(&model, sequence.acids()).unwrap());
        assert_eq!(&matrix.identifiers()[i], sequence.identifier());
    }
}

#[test]
fn test_complexity_profiles_of_top_sequences() {
    let sample = read_sample(PERIODIC_SAMPLE_STR.as_bytes()).unwrap();
    let database = read_database(SIMPLE_DATABASE_STR.as_bytes()).unwrap();
    let model_params = ModelParams::new(4, 1.0).unwrap();
    let orchestrator =
        RankingOrchestrator::new(model_params, RankingParams::builder().build().unwrap());

    let model = orchestrator.train(&sample);
    let ranking = orchestrator.rank_with(&model, &database);

    for sequence in ranking.top_sequences(&database) {
        let profile = compute_complexity_profile(&model, sequence.acids());
        assert_eq!(profile.len(), sequence.len());
        assert!(profile[..4].iter().all(|&bits| bits == 0.0));

        let nrc = compute_nrc(&model, sequence.acids()).unwrap();
        if sequence.len() <= 4 {
            assert_eq!(nrc, Nrc::CEILING);
        } else {
            let expected = profile.total_bits() / (2.0 * (sequence.len() - 4) as f64);
            assert!((nrc.get() - expected).abs() < 1e-9);
        }
    }
}
