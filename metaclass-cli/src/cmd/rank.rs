use std::io::Write;

use log::info;
use metaclass::score::ScoreResult;

use crate::cli::RankArgs;
use crate::cmd::rank_database;
use crate::csv_stat::CsvOutput;

pub(crate) fn rank<W: Write>(args: &RankArgs, output: W, all: bool) -> anyhow::Result<()> {
    let ranked = rank_database(args)?;
    let results = if all {
        ranked.ranking.all()
    } else {
        ranked.ranking.top()
    };

    if let Some(summary) = ranked.ranking.summary() {
        info!(
            "NRC of {} sequences: mean {:.6}, min {:.6}, max {:.6}",
            summary.count, summary.mean, summary.min, summary.max
        );
    }

    let mut csv = CsvOutput::new(output);
    write_results(&mut csv, results)?;
    csv.flush()
}

fn write_results<W: Write>(csv: &mut CsvOutput<W>, results: &[ScoreResult]) -> anyhow::Result<()> {
    csv.use_header(["Rank", "NRC", "Sequence ID"])?;
    for (i, result) in results.iter().enumerate() {
        csv.add_record([
            (i + 1).to_string(),
            result.nrc().to_string(),
            result.identifier().to_string(),
        ])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use metaclass::score::{Nrc, ScoreResult};

    use crate::cmd::rank::write_results;
    use crate::csv_stat::CsvOutput;

    #[test]
    fn test_write_results() {
        let mut csv = CsvOutput::in_memory();
        let results = [
            ScoreResult::new("best", Nrc::new(0.25), 1),
            ScoreResult::new("worst", Nrc::CEILING, 0),
        ];

        write_results(&mut csv, &results).unwrap();

        assert_eq!(
            csv.into_string(),
            "Rank,NRC,Sequence ID\n1,0.250000,best\n2,1.000000,worst\n"
        );
    }
}
