use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use minmax::progress::ProgressNotifier;

/// Progress bar counting the evaluated windows.
///
/// Starts as a hidden spinner; the bar style is applied on the first
/// increment, once the number of windows is known.
#[derive(Debug, Clone)]
pub(crate) struct MinMaxProgressBar {
    bar: ProgressBar,
    length: Arc<AtomicU64>,
    styled: Arc<AtomicBool>,
}

impl MinMaxProgressBar {
    pub fn new() -> MinMaxProgressBar {
        let bar = ProgressBar::hidden();
        bar.set_style(ProgressStyle::default_spinner());
        bar.enable_steady_tick(Duration::from_millis(50));
        bar.set_message("Reading input files...");

        Self {
            bar,
            length: Arc::new(AtomicU64::new(0)),
            styled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear()
    }

    pub fn println<I: AsRef<str>>(&self, msg: I) {
        self.bar.println(msg);
    }

    #[inline]
    fn init(&self) {
        if self.styled.swap(true, Ordering::AcqRel) {
            return;
        }

        let style = if self.length.load(Ordering::Acquire) == 0 {
            ProgressStyle::default_spinner()
                .template("{spinner} {pos} windows ({per_sec}) {msg}")
                .expect("Invalid progress bar template")
        } else {
            ProgressStyle::default_bar()
                .template("{wide_bar} {pos}/{len} windows [ETA {eta}]")
                .expect("Invalid progress bar template")
        };
        self.bar.set_style(style);
    }
}

impl ProgressNotifier for MinMaxProgressBar {
    fn set_iter_num(&self, num_iter: u64) {
        self.length.store(num_iter, Ordering::Release);
        self.bar.set_length(num_iter);
        self.bar.set_position(0);
        self.styled.store(false, Ordering::Release);
    }

    fn inc_iter(&self) {
        self.init();
        self.bar.inc(1);
    }
}
