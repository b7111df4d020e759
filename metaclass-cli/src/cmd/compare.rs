use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use metaclass::pairwise::{PairwiseComparator, SimilarityMatrix};

use crate::cli::RankArgs;
use crate::cmd::rank_database;
use crate::csv_stat::CsvOutput;
use crate::PROGRESS_BAR;

pub(crate) fn compare<W: Write>(args: &RankArgs, output: W) -> anyhow::Result<()> {
    let ranked = rank_database(args)?;

    let comparator = PairwiseComparator::new(ranked.model_params)
        .with_progress_notifier(Arc::new(PROGRESS_BAR.clone()));
    let matrix = comparator
        .compare(&ranked.top_sequences())
        .context("Could not compute the similarity matrix")?;

    let mut csv = CsvOutput::new(output);
    write_matrix(&mut csv, &matrix)?;
    csv.flush()
}

fn write_matrix<W: Write>(csv: &mut CsvOutput<W>, matrix: &SimilarityMatrix) -> anyhow::Result<()> {
    let header = std::iter::once(String::new())
        .chain(matrix.identifiers().iter().map(ToString::to_string));
    csv.use_header(header)?;

    for (identifier, row) in matrix.rows() {
        let record =
            std::iter::once(identifier.to_string()).chain(row.iter().map(ToString::to_string));
        csv.add_record(record)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use metaclass::model::ModelParams;
    use metaclass::pairwise::PairwiseComparator;
    use metaclass::sequence::Acid::{A, C, G, T};
    use metaclass::sequence::NucleotideSequence;

    use crate::cmd::compare::write_matrix;
    use crate::csv_stat::CsvOutput;

    #[test]
    fn test_write_matrix() {
        let first = NucleotideSequence::new("first", [A, C, A, C, A, C]);
        let second = NucleotideSequence::new("second", [G, T, G]);
        let matrix = PairwiseComparator::new(ModelParams::new(4, 1.0).unwrap())
            .compare(&[&first, &second])
            .unwrap();
        let mut csv = CsvOutput::in_memory();

        write_matrix(&mut csv, &matrix).unwrap();

        let content = csv.into_string();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], ",first,second");
        assert!(lines[1].starts_with("first,"));
        assert!(lines[1].ends_with(",1.000000"));
        assert_eq!(lines[2], "second,1.000000,1.000000");
    }
}
