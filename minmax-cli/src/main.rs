#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::Arc;

use atty::Stream;
use clap::Parser;
use cli::Cli;
use cmd::calculate;
use human_panic::setup_panic;
use lazy_static::lazy_static;
use minmax::calculator::MinMaxParams;
use minmax::sequence::CodonSequenceParams;

use crate::cmd::calculate::{InputNames, OutputTarget};
use crate::logging::init_logging;
use crate::progress_bar::MinMaxProgressBar;

mod cli;
mod cmd;
mod logging;
mod opts;
mod progress_bar;
mod report;

lazy_static! {
    pub(crate) static ref PROGRESS_BAR: MinMaxProgressBar = MinMaxProgressBar::new();
}

fn main() -> anyhow::Result<()> {
    setup_panic!();

    let cli: Cli = Cli::parse();

    if !cli.no_progress && atty::is(Stream::Stderr) {
        PROGRESS_BAR.show();
    }

    init_logging(cli.verbose.log_level_filter()).expect("Could not initialize logging");

    let frequencies = cli.frequencies.as_reader()?;
    let sequence = cli.sequence.as_reader()?;

    let sequence_params = CodonSequenceParams::builder()
        .skip_fasta_headers(cli.fasta)
        .build();
    let params = MinMaxParams::builder()
        .window_size(cli.window_size as usize)
        .degenerate_policy(cli.degenerate.into())
        .parallel(cli.parallel)
        .progress_notifier(Arc::new(PROGRESS_BAR.clone()))
        .build();
    let names = InputNames {
        frequencies: cli.frequencies.to_string(),
        sequence: cli.sequence.to_string(),
    };
    let target = OutputTarget {
        path: cli.output_path().map(|path| path.to_owned()),
        mode: cli.write_mode(),
        format: cli.format,
    };

    let result = calculate::calculate(
        frequencies.into_buf_read(),
        sequence.into_buf_read(),
        names,
        &sequence_params,
        params,
        target,
    );

    PROGRESS_BAR.finish();
    result
}
