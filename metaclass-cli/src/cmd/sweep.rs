use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use itertools::Itertools;
use log::info;
use metaclass::sweep::{ParameterSweep, SweepReport};

use crate::cli::InputArgs;
use crate::cmd::load_inputs;
use crate::PROGRESS_BAR;

pub(crate) fn sweep<W: Write>(
    input: &InputArgs,
    top_n: u32,
    k_values: &[u32],
    alpha_values: &[f64],
    mut output: W,
) -> anyhow::Result<()> {
    let sweep = ParameterSweep::new(
        k_values.iter().map(|&k| k as usize).collect(),
        alpha_values.to_vec(),
        top_n as usize,
    )
    .context("Invalid sweep parameters")?
    .with_progress_notifier(Arc::new(PROGRESS_BAR.clone()));
    let (sample, database) = load_inputs(input)?;

    let database_label = input.database.to_string();
    let sample_label = input.sample.to_string();

    let report = sweep.run(
        &sample,
        &database,
        (database_label.as_str(), sample_label.as_str()),
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    log_mean_table(&report);

    report
        .write_json(&mut output)
        .context("Could not write the sweep report")?;
    writeln!(output)?;
    output.flush()?;

    Ok(())
}

fn log_mean_table(report: &SweepReport) {
    info!("Mean NRC:");
    for row in &report.mean_nrc_table {
        info!("  {}", row.iter().map(|cell| format!("{:>10}", cell)).join(" "));
    }
}
