use std::io::Write;
use std::sync::Arc;

use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

use crate::model::{ContextModel, ModelParams};
use crate::progress::{DummyProgressNotifier, ProgressNotifier};
use crate::ranking::{score_database, NrcSummary, RankingError};
use crate::score::ScoreResult;
use crate::sequence::{Acid, NucleotideSequence};

const NOT_AVAILABLE: &str = "N/A";
const TABLE_CORNER: &str = "k / alpha";

/// Descriptive information about a sweep run, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepMetadata {
    pub database: String,
    pub sample: String,
    pub top_n: usize,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepParameters {
    pub k_values: Vec<usize>,
    pub alpha_values: Vec<f64>,
}

/// Ranking results for a single `(k, alpha)` combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepEntry {
    pub order: usize,
    pub alpha: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub top: Vec<ScoreResult>,
    pub summary: Option<NrcSummary>,
    pub excluded: usize,
}

impl SweepEntry {
    fn failed(order: usize, alpha: f64, error: String) -> Self {
        Self {
            order,
            alpha,
            error: Some(error),
            top: Vec::new(),
            summary: None,
            excluded: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub metadata: SweepMetadata,
    pub parameters: SweepParameters,
    pub results: Vec<SweepEntry>,
    pub mean_nrc_table: Vec<Vec<String>>,
}

impl SweepReport {
    /// Returns the entry for given combination, if it was part of the sweep.
    #[must_use]
    pub fn entry(&self, order: usize, alpha: f64) -> Option<&SweepEntry> {
        self.results
            .iter()
            .find(|entry| entry.order == order && entry.alpha == alpha)
    }

    /// Writes the report as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

/// Runs the ranking for every combination of context orders and smoothing
/// constants.
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    parameters: SweepParameters,
    top_n: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl ParameterSweep {
    pub fn new(
        k_values: Vec<usize>,
        alpha_values: Vec<f64>,
        top_n: usize,
    ) -> Result<Self, RankingError> {
        if top_n == 0 {
            return Err(RankingError::ZeroTopN);
        }

        Ok(Self {
            parameters: SweepParameters {
                k_values,
                alpha_values,
            },
            top_n,
            progress_notifier: Arc::new(DummyProgressNotifier),
        })
    }

    #[must_use]
    pub fn with_progress_notifier(self, progress_notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self {
            progress_notifier,
            ..self
        }
    }

    /// Runs the sweep. Combinations with invalid parameters produce an entry
    /// with an error message instead of stopping the sweep.
    ///
    /// `database` and `sample` are labels stored in the report metadata.
    #[must_use]
    pub fn run(
        &self,
        sample: &[Acid],
        database: &[NucleotideSequence],
        labels: (&str, &str),
        timestamp: String,
    ) -> SweepReport {
        let combinations: Vec<_> = self
            .parameters
            .k_values
            .iter()
            .copied()
            .cartesian_product(self.parameters.alpha_values.iter().copied())
            .collect();
        info!(
            "Running parameter sweep: {} combinations",
            combinations.len()
        );
        self.progress_notifier.set_iter_num(combinations.len() as u64);

        let results: Vec<_> = combinations
            .into_iter()
            .map(|(order, alpha)| {
                let entry = self.run_single(sample, database, order, alpha);
                self.progress_notifier.inc_iter();
                entry
            })
            .collect();

        let (database_label, sample_label) = labels;
        SweepReport {
            metadata: SweepMetadata {
                database: database_label.to_owned(),
                sample: sample_label.to_owned(),
                top_n: self.top_n,
                timestamp,
            },
            mean_nrc_table: self.mean_nrc_table(&results),
            parameters: self.parameters.clone(),
            results,
        }
    }

    fn run_single(
        &self,
        sample: &[Acid],
        database: &[NucleotideSequence],
        order: usize,
        alpha: f64,
    ) -> SweepEntry {
        let params = match ModelParams::new(order, alpha) {
            Ok(params) => params,
            Err(e) => {
                warn!("Skipping k={}, alpha={}: {}", order, alpha, e);
                return SweepEntry::failed(order, alpha, e.to_string());
            }
        };

        let model = ContextModel::trained(params, sample);
        let (mut scored, excluded) = score_database(&model, database, &DummyProgressNotifier);
        scored.sort_by_key(ScoreResult::nrc);
        let summary = NrcSummary::from_results(&scored);
        scored.truncate(self.top_n);

        info!(
            "{}: mean NRC {}",
            params,
            summary.map_or_else(|| NOT_AVAILABLE.to_owned(), |s| format!("{:.6}", s.mean))
        );

        SweepEntry {
            order,
            alpha,
            error: None,
            top: scored,
            summary,
            excluded: excluded.len(),
        }
    }

    fn mean_nrc_table(&self, results: &[SweepEntry]) -> Vec<Vec<String>> {
        let header: Vec<String> = std::iter::once(TABLE_CORNER.to_owned())
            .chain(self.parameters.alpha_values.iter().map(f64::to_string))
            .collect();

        let rows = self.parameters.k_values.iter().map(|&order| {
            std::iter::once(order.to_string())
                .chain(self.parameters.alpha_values.iter().map(|&alpha| {
                    results
                        .iter()
                        .find(|entry| entry.order == order && entry.alpha == alpha)
                        .and_then(|entry| entry.summary)
                        .map_or_else(|| NOT_AVAILABLE.to_owned(), |s| format!("{:.6}", s.mean))
                }))
                .collect::<Vec<String>>()
        });

        std::iter::once(header).chain(rows).collect()
    }
}
