use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use metaclass::model::ContextModel;
use metaclass::score::compute_complexity_profile;
use metaclass::sequence::NucleotideSequence;

use crate::cli::RankArgs;
use crate::cmd::rank_database;
use crate::csv_stat::CsvOutput;
use crate::opts::Directory;

pub(crate) fn profile(args: &RankArgs, output: &Directory) -> anyhow::Result<()> {
    let ranked = rank_database(args)?;
    let directory = output.create()?;

    for (i, sequence) in ranked.top_sequences().into_iter().enumerate() {
        let path = profile_path(&directory, i + 1, sequence.identifier().str());
        info!(
            "Writing complexity profile of `{}` to {}",
            sequence.identifier(),
            path.display()
        );

        let file = File::create(&path)
            .with_context(|| format!("Could not create {}", path.display()))?;
        let mut csv = CsvOutput::new(BufWriter::new(file));
        write_profile(&mut csv, &ranked.model, sequence)?;
        csv.flush()?;
    }

    Ok(())
}

/// Path of the profile file of the sequence at given (1-based) rank. The rank
/// keeps paths unique for duplicate or similarly sanitized identifiers.
fn profile_path(directory: &Path, rank: usize, identifier: &str) -> PathBuf {
    let sanitized: String = identifier
        .chars()
        .map(|ch| {
            if ch.is_whitespace() || matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                ch
            }
        })
        .collect();

    directory.join(format!("complexity_{}_{}.csv", rank, sanitized))
}

fn write_profile<W: std::io::Write>(
    csv: &mut CsvOutput<W>,
    model: &ContextModel,
    sequence: &NucleotideSequence,
) -> anyhow::Result<()> {
    let profile = compute_complexity_profile(model, sequence.acids());
    let identifier = sequence.identifier().to_string();
    let order = model.order().to_string();

    csv.use_header(["SequenceID", "K", "Position", "Complexity"])?;
    for (position, bits) in profile.iter().enumerate() {
        csv.add_record([
            identifier.clone(),
            order.clone(),
            position.to_string(),
            format!("{:.6}", bits),
        ])?;
    }

    Ok(())
}
