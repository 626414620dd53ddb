use std::fmt::{Display, Formatter};
use std::io::Write;

use clap::ValueEnum;
use itertools::Itertools;
use minmax::calculator::{MinMaxScores, MinMaxValue};
use minmax::codon::Codon;
use minmax::sequence::CodonSequence;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

const UNDEFINED_TEXT: &str = "None";

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Summary followed by the list of values
    Text,
    /// One value per line
    Lines,
    /// `position,codon,minmax` records
    Csv,
    /// Summary and values as a JSON object
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Lines => "lines",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        };

        write!(f, "{}", name)
    }
}

/// Where the text report ends up; files get one value per line so that
/// successive runs appended to the same file stay readable.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextLayout {
    List,
    Column,
}

#[derive(Debug, Serialize)]
pub(crate) struct MinMaxReport<'a> {
    frequencies_file: String,
    sequence_file: String,
    codon_num: usize,
    window_size: usize,
    window_num: usize,
    #[serde(skip)]
    codons: &'a [Codon],
    #[serde(serialize_with = "serialize_values")]
    values: &'a [MinMaxValue],
}

#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    position: usize,
    codon: &'a str,
    minmax: Option<f64>,
}

impl<'a> MinMaxReport<'a> {
    pub fn new<F: Display, S: Display>(
        frequencies_file: F,
        sequence_file: S,
        sequence: &'a CodonSequence,
        scores: &'a MinMaxScores,
    ) -> Self {
        Self {
            frequencies_file: frequencies_file.to_string(),
            sequence_file: sequence_file.to_string(),
            codon_num: sequence.len(),
            window_size: scores.window_size().get(),
            window_num: scores.window_num(),
            codons: sequence.codons(),
            values: scores.values(),
        }
    }

    pub fn summary(&self) -> [String; 5] {
        [
            format!("Frequencies file: {}", self.frequencies_file),
            format!("Sequence file: {}", self.sequence_file),
            format!("Number of codons in sequence: {}", self.codon_num),
            format!("Sliding window size: {}", self.window_size),
            format!("Number of windows evaluated: {}", self.window_num),
        ]
    }

    pub fn write<W: Write>(
        &self,
        mut writer: W,
        format: OutputFormat,
        layout: TextLayout,
    ) -> anyhow::Result<()> {
        match format {
            OutputFormat::Text => self.write_text(&mut writer, layout)?,
            OutputFormat::Lines => self.write_lines(&mut writer)?,
            OutputFormat::Csv => self.write_csv(&mut writer)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, self)?;
                writeln!(writer)?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    fn write_text<W: Write>(&self, writer: &mut W, layout: TextLayout) -> anyhow::Result<()> {
        for line in self.summary() {
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer)?;
        writeln!(writer, "Min Max Values:")?;

        match layout {
            TextLayout::List => {
                let values = self.values.iter().map(format_value).join(", ");
                writeln!(writer, "[{}]", values)?;
            }
            TextLayout::Column => {
                self.write_lines(writer)?;
                writeln!(writer)?;
                writeln!(writer)?;
            }
        }

        Ok(())
    }

    fn write_lines<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        for value in self.values {
            writeln!(writer, "{}", format_value(value))?;
        }

        Ok(())
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (index, (codon, value)) in self.codons.iter().zip(self.values).enumerate() {
            csv_writer.serialize(CsvRecord {
                position: index + 1,
                codon: codon.str(),
                minmax: value.score(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// JSON has no NaN nor infinity; such scores are written as strings, so that
/// they are not mistaken for `null` (undefined) entries.
fn serialize_values<S: Serializer>(
    values: &&[MinMaxValue],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values.iter() {
        match value {
            MinMaxValue::Score(score) if !score.is_finite() => {
                seq.serialize_element(&score.to_string())?
            }
            _ => seq.serialize_element(value)?,
        }
    }
    seq.end()
}

fn format_value(value: &MinMaxValue) -> String {
    match value {
        MinMaxValue::Score(score) => format!("{:?}", score),
        MinMaxValue::Undefined => UNDEFINED_TEXT.to_owned(),
    }
}
