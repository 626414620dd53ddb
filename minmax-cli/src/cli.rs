use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use minmax::calculator::{DegenerateWindowPolicy, DEFAULT_WINDOW_SIZE};

use crate::opts::{input_file, input_stream, InputFile, InputStream, WriteMode, DEFAULT_OUTPUT_FILE};
use crate::report::OutputFormat;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    /// Don't display a progress bar/spinner
    #[clap(long, value_parser)]
    pub no_progress: bool,

    /// Codon usage table; one `<codon> <amino acid> <frequency>` record per line
    #[clap(value_parser = input_file)]
    pub frequencies: InputFile,

    /// Coding sequence to evaluate (`-` reads the standard input)
    #[clap(value_parser = input_stream)]
    pub sequence: InputStream,

    /// Sliding window size, in codons
    #[clap(
        short,
        long,
        default_value_t = DEFAULT_WINDOW_SIZE as u32,
        value_parser = clap::value_parser!(u32).range(2..)
    )]
    pub window_size: u32,

    /// Write the values to `output.txt` instead of the standard output
    #[clap(short = 'o', value_parser, conflicts_with = "output")]
    pub output_txt: bool,

    /// Write the values to given file instead of the standard output
    #[clap(short = 'O', long, value_parser)]
    pub output: Option<PathBuf>,

    /// Replace the content of the output file instead of appending to it
    #[clap(short, long, value_parser)]
    pub replace: bool,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// How to score windows whose maximum, minimum and average frequencies are equal
    #[clap(long, value_enum, default_value_t = DegenerateMode::Zero)]
    pub degenerate: DegenerateMode,

    /// Skip `>` header lines, for sequences in FASTA format
    #[clap(long, value_parser)]
    pub fasta: bool,

    /// Evaluate the windows on multiple threads
    #[clap(long, value_parser)]
    pub parallel: bool,
}

impl Cli {
    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        if self.output_txt {
            Some(Path::new(DEFAULT_OUTPUT_FILE))
        } else {
            self.output.as_deref()
        }
    }

    #[must_use]
    pub fn write_mode(&self) -> WriteMode {
        if self.replace {
            WriteMode::Replace
        } else {
            WriteMode::Append
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum DegenerateMode {
    /// Score the window as 0
    Zero,
    /// Score the window as NaN
    Nan,
    /// Stop with an error
    Error,
}

impl Display for DegenerateMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DegenerateMode::Zero => "zero",
            DegenerateMode::Nan => "nan",
            DegenerateMode::Error => "error",
        };

        write!(f, "{}", name)
    }
}

impl From<DegenerateMode> for DegenerateWindowPolicy {
    fn from(mode: DegenerateMode) -> Self {
        match mode {
            DegenerateMode::Zero => DegenerateWindowPolicy::Zero,
            DegenerateMode::Nan => DegenerateWindowPolicy::NotANumber,
            DegenerateMode::Error => DegenerateWindowPolicy::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use crate::cli::{Cli, DegenerateMode};
    use crate::opts::WriteMode;
    use crate::report::OutputFormat;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["minmax", "table.txt", "seq.txt"]).unwrap();

        assert_eq!(cli.window_size, 17);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.degenerate, DegenerateMode::Zero);
        assert_eq!(cli.output_path(), None);
        assert_eq!(cli.write_mode(), WriteMode::Append);
        assert!(!cli.fasta);
        assert!(!cli.parallel);
    }

    #[test]
    fn output_options() {
        let cli = Cli::try_parse_from(["minmax", "-o", "-r", "table.txt", "seq.txt"]).unwrap();
        assert_eq!(cli.output_path(), Some(Path::new("output.txt")));
        assert_eq!(cli.write_mode(), WriteMode::Replace);

        let cli =
            Cli::try_parse_from(["minmax", "-O", "values.csv", "-f", "csv", "table.txt", "-"])
                .unwrap();
        assert_eq!(cli.output_path(), Some(Path::new("values.csv")));
        assert_eq!(cli.format, OutputFormat::Csv);

        assert!(
            Cli::try_parse_from(["minmax", "-o", "-O", "values.csv", "table.txt", "seq.txt"])
                .is_err()
        );
    }

    #[test]
    fn window_size_too_small() {
        assert!(Cli::try_parse_from(["minmax", "-w", "1", "table.txt", "seq.txt"]).is_err());

        let cli = Cli::try_parse_from(["minmax", "-w", "2", "table.txt", "seq.txt"]).unwrap();
        assert_eq!(cli.window_size, 2);
    }

    #[test]
    fn degenerate_mode() {
        let cli =
            Cli::try_parse_from(["minmax", "--degenerate", "nan", "table.txt", "seq.txt"]).unwrap();

        assert_eq!(cli.degenerate, DegenerateMode::Nan);
    }
}
