use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use log::{info, warn};
use minmax::calculator::{MinMaxCalculator, MinMaxParams};
use minmax::frequency_table::FrequencyIndex;
use minmax::sequence::{CodonSequence, CodonSequenceParams};

use crate::opts::{OutputWriter, WriteMode};
use crate::report::{MinMaxReport, OutputFormat, TextLayout};

/// Input files, as named in the report.
#[derive(Debug)]
pub struct InputNames {
    pub frequencies: String,
    pub sequence: String,
}

/// Where and how the report is written. The file is only opened once the
/// values have been calculated.
#[derive(Debug)]
pub struct OutputTarget {
    pub path: Option<PathBuf>,
    pub mode: WriteMode,
    pub format: OutputFormat,
}

pub fn calculate<F: BufRead, S: BufRead>(
    frequencies: F,
    sequence: S,
    names: InputNames,
    sequence_params: &CodonSequenceParams,
    params: MinMaxParams,
    target: OutputTarget,
) -> anyhow::Result<()> {
    let index = FrequencyIndex::from_reader(frequencies)
        .with_context(|| format!("Could not read the frequencies file {}", names.frequencies))?;
    info!(
        "Loaded {} codons of {} amino acids from {}",
        index.len(),
        index.amino_acids().count(),
        names.frequencies
    );

    let sequence = CodonSequence::from_reader_with_params(sequence, sequence_params)
        .with_context(|| format!("Could not read the sequence file {}", names.sequence))?;
    info!("Read {} codons from {}", sequence.len(), names.sequence);
    if sequence.dropped_remainder() > 0 {
        warn!(
            "Sequence length is not a multiple of 3; ignoring {} trailing nucleotide(s)",
            sequence.dropped_remainder()
        );
    }

    let scores = MinMaxCalculator::with_params(&index, params)
        .calculate(&sequence)
        .context("Failed to calculate MinMax values")?;

    let report = MinMaxReport::new(&names.frequencies, &names.sequence, &sequence, &scores);
    let output = OutputWriter::from_path(target.path.as_deref(), target.mode)?;
    let output_path = output.file_path().map(|path| path.to_owned());
    match &output_path {
        Some(path) => {
            for line in report.summary() {
                info!("{}", line);
            }
            report.write(output.into_write(), target.format, TextLayout::Column)?;
            info!("Data written to {}", path.display());
        }
        None => report.write(output.into_write(), target.format, TextLayout::List)?,
    }

    Ok(())
}
