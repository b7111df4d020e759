pub mod context;
pub mod context_spec;
pub mod database;
pub mod model;
pub mod pairwise;
pub mod progress;
pub mod ranking;
pub mod score;
pub mod sequence;
pub mod sweep;

#[doc(hidden)]
pub mod _internal_test_data;
