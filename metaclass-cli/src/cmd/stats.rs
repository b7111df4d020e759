use std::io::Write;

use anyhow::Context;
use metaclass::context::ContextCounter;
use metaclass::model::{ContextModel, ModelParams};
use metaclass::score::compute_nrc;
use metaclass::sequence::{Acid, Symbol};

use crate::cmd::load_sample;
use crate::opts::InputStream;

pub(crate) fn stats<W: Write>(
    sample: &InputStream,
    model_params: Option<ModelParams>,
    mut output: W,
) -> anyhow::Result<()> {
    let sample = load_sample(sample)?;

    print_acid_stats(&sample, &mut output)?;
    if let Some(params) = model_params {
        writeln!(output)?;
        print_model_stats(&sample, params, &mut output)?;
    }

    Ok(())
}

fn print_acid_stats<W: Write>(sample: &[Acid], output: &mut W) -> anyhow::Result<()> {
    let mut counter = ContextCounter::<Acid>::new();
    for &acid in sample {
        counter.add(acid);
    }

    writeln!(output, "Length: {}", sample.len())?;
    writeln!(output, "Acids:")?;
    for acid in Acid::values() {
        writeln!(
            output,
            "  {}: {:.4}%",
            acid,
            counter.percentage(acid) * 100.0,
        )?;
    }

    Ok(())
}

fn print_model_stats<W: Write>(
    sample: &[Acid],
    params: ModelParams,
    output: &mut W,
) -> anyhow::Result<()> {
    let model = ContextModel::trained(params, sample);
    let nrc = compute_nrc(&model, sample).context("Could not compute the self-compression NRC")?;

    writeln!(output, "Model ({}):", params)?;
    writeln!(output, "  Distinct contexts: {}", model.context_num())?;
    writeln!(
        output,
        "  Observed alphabet: {}",
        model
            .observed_alphabet()
            .iter()
            .map(Acid::to_string)
            .collect::<String>()
    )?;
    writeln!(
        output,
        "  Effective alphabet size: {}",
        model.effective_alphabet_size()
    )?;
    writeln!(output, "  Self-compression NRC: {}", nrc)?;

    Ok(())
}
