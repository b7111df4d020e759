use std::sync::Arc;

use anyhow::{bail, Context};
use log::{info, warn};
use metaclass::database::reader::{read_database, read_sample};
use metaclass::model::{ContextModel, ModelParams};
use metaclass::ranking::{Ranking, RankingOrchestrator, RankingParams};
use metaclass::sequence::{Acid, NucleotideSequence};

use crate::cli::{InputArgs, ModelArgs, RankArgs};
use crate::opts::InputStream;
use crate::PROGRESS_BAR;

pub(crate) mod compare;
pub(crate) mod profile;
pub(crate) mod rank;
pub(crate) mod stats;
pub(crate) mod sweep;

pub(crate) fn load_sample(stream: &InputStream) -> anyhow::Result<Vec<Acid>> {
    info!("Loading metagenomic sample from {}", stream);
    let reader = stream.as_reader()?;
    let sample = read_sample(reader.into_buf_read())
        .with_context(|| format!("Could not read the sample from {}", stream))?;
    info!("Sample loaded: {} acids", sample.len());

    Ok(sample)
}

pub(crate) fn load_database(stream: &InputStream) -> anyhow::Result<Vec<NucleotideSequence>> {
    info!("Loading reference database from {}", stream);
    let reader = stream.as_reader()?;
    let database = read_database(reader.into_buf_read())
        .with_context(|| format!("Could not read the database from {}", stream))?;
    info!("Database loaded: {} sequences", database.len());

    Ok(database)
}

pub(crate) fn load_inputs(input: &InputArgs) -> anyhow::Result<(Vec<Acid>, Vec<NucleotideSequence>)> {
    if input.sample.is_stdin() && input.database.is_stdin() {
        bail!("The sample and the database cannot both be read from the standard input");
    }

    let sample = load_sample(&input.sample)?;
    let database = load_database(&input.database)?;
    Ok((sample, database))
}

pub(crate) fn model_params(args: &ModelArgs) -> anyhow::Result<ModelParams> {
    ModelParams::new(args.k as usize, args.alpha).context("Invalid model parameters")
}

/// Database ranked against the sample model.
pub(crate) struct RankedDatabase {
    pub database: Vec<NucleotideSequence>,
    pub model_params: ModelParams,
    pub model: ContextModel,
    pub ranking: Ranking,
}

impl RankedDatabase {
    pub fn top_sequences(&self) -> Vec<&NucleotideSequence> {
        self.ranking.top_sequences(&self.database)
    }
}

pub(crate) fn rank_database(args: &RankArgs) -> anyhow::Result<RankedDatabase> {
    let model_params = model_params(&args.model)?;
    let params = RankingParams::builder()
        .top_n(args.top_n as usize)
        .progress_notifier(Arc::new(PROGRESS_BAR.clone()))
        .build()
        .context("Invalid ranking parameters")?;
    let (sample, database) = load_inputs(&args.input)?;

    let orchestrator = RankingOrchestrator::new(model_params, params);
    let model = orchestrator.train(&sample);
    let ranking = orchestrator.rank_with(&model, &database);
    for excluded in ranking.excluded() {
        warn!("Sequence excluded from the ranking: {}", excluded);
    }

    Ok(RankedDatabase {
        database,
        model_params,
        model,
        ranking,
    })
}
