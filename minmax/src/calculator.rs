//! Sliding-window MinMax codon usage bias calculation.
//!
//! For each window of consecutive codons, the average frequency of the codons
//! actually used is compared with the averages obtained by replacing every
//! codon with its most favored synonym (max), its least favored synonym (min),
//! and with the mean over all synonyms (avg). The resulting score is positive
//! when the window leans towards the most favored codons, negative when it
//! leans towards the least favored ones, and scaled to roughly `-100..=100`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter;
use std::sync::Arc;

use derive_more::Deref;
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Serialize, Serializer};

use crate::codon::Codon;
use crate::frequency_table::FrequencyIndex;
use crate::progress::{DummyProgressNotifier, ProgressNotifier};
use crate::sequence::CodonSequence;

/// Window size used when none is given explicitly.
pub const DEFAULT_WINDOW_SIZE: usize = 17;
/// The smallest allowed window size.
pub const MIN_WINDOW_SIZE: usize = 2;

/// Error occurring during calculating MinMax values.
#[derive(Debug, Clone, PartialEq)]
pub enum MinMaxError {
    /// Window size is smaller than [`MIN_WINDOW_SIZE`] or larger than the
    /// number of codons in the sequence.
    InvalidWindowSize { window_size: usize, codon_num: usize },
    /// A codon of the sequence is missing from the frequency table.
    UnknownCodon { codon: Codon, position: usize },
    /// The maximum, minimum and average frequencies of a window are equal, so
    /// the MinMax value is undefined. Only returned with
    /// [`DegenerateWindowPolicy::Error`].
    DegenerateWindow { position: usize },
}

impl Display for MinMaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MinMaxError::InvalidWindowSize {
                window_size,
                codon_num,
            } => write!(
                f,
                "Invalid window size: {} (must be between {} and the number of codons in the sequence: {})",
                window_size, MIN_WINDOW_SIZE, codon_num
            ),
            MinMaxError::UnknownCodon { codon, position } => write!(
                f,
                "Codon `{}` at position {} is missing from the frequency table",
                codon, position
            ),
            MinMaxError::DegenerateWindow { position } => write!(
                f,
                "Degenerate window centered at position {}: maximum, minimum and average frequencies are equal",
                position
            ),
        }
    }
}

impl Error for MinMaxError {}

/// The result of a MinMax calculation.
pub type MinMaxResult<T> = Result<T, MinMaxError>;

/// Sliding window size (in codons), validated against the sequence length.
#[derive(Deref, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct WindowSize(usize);

impl WindowSize {
    /// Creates a new `WindowSize` for a sequence of `codon_num` codons.
    ///
    /// # Examples
    /// ```
    /// use minmax::calculator::{MinMaxError, WindowSize};
    ///
    /// assert_eq!(WindowSize::new(17, 100).unwrap().get(), 17);
    /// assert_eq!(
    ///     WindowSize::new(17, 10),
    ///     Err(MinMaxError::InvalidWindowSize {
    ///         window_size: 17,
    ///         codon_num: 10
    ///     })
    /// );
    /// ```
    pub fn new(window_size: usize, codon_num: usize) -> MinMaxResult<Self> {
        if window_size < MIN_WINDOW_SIZE || window_size > codon_num {
            return Err(MinMaxError::InvalidWindowSize {
                window_size,
                codon_num,
            });
        }

        Ok(Self(window_size))
    }

    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Number of codons preceding the center codon of a window
    /// (`floor(window_size / 2)`).
    #[must_use]
    pub const fn half(&self) -> usize {
        self.0 / 2
    }

    /// Number of codons following the center codon of a window.
    #[must_use]
    pub const fn tail(&self) -> usize {
        self.0 - 1 - self.half()
    }
}

/// What to do with windows whose maximum, minimum and average frequencies are
/// all equal (e.g. windows made of `Met` and `Trp` codons only), for which the
/// MinMax formula divides zero by zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DegenerateWindowPolicy {
    /// Score the window as `0.0`: the codons used are all equally favored.
    #[default]
    Zero,
    /// Score the window as `NaN`.
    NotANumber,
    /// Abort the calculation with [`MinMaxError::DegenerateWindow`].
    Error,
}

/// Frequencies of a single codon and of its synonyms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CodonWeights {
    pub actual: f64,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub constant: bool,
}

impl CodonWeights {
    /// Looks up the weights of given codon, returning `None` if the codon is
    /// missing from the index.
    #[must_use]
    pub fn resolve(index: &FrequencyIndex, codon: &Codon) -> Option<Self> {
        let actual = index.frequency(codon)?;
        let synonyms = index.synonyms_of_codon(codon)?;

        Some(Self {
            actual,
            max: synonyms.max(),
            min: synonyms.min(),
            mean: synonyms.mean(),
            constant: synonyms.is_constant(),
        })
    }
}

/// Average frequencies over a single window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindowStats {
    pub actual: f64,
    pub max: f64,
    pub min: f64,
    pub avg: f64,
    degenerate: bool,
}

impl WindowStats {
    /// Creates window statistics out of already averaged frequencies.
    ///
    /// The window is degenerate when `max == min`.
    #[must_use]
    pub fn new(actual: f64, max: f64, min: f64, avg: f64) -> Self {
        Self {
            actual,
            max,
            min,
            avg,
            degenerate: max == min,
        }
    }

    /// Calculates the averages over the codons of a window.
    ///
    /// # Panics
    /// This function panics if `weights` is empty.
    #[must_use]
    pub fn from_weights(weights: &[CodonWeights]) -> Self {
        assert!(!weights.is_empty());

        let mut actual = 0.0;
        let mut max = 0.0;
        let mut min = 0.0;
        let mut avg = 0.0;
        for codon in weights {
            actual += codon.actual;
            max += codon.max;
            min += codon.min;
            avg += codon.mean;
        }

        let len = weights.len() as f64;
        Self::new(actual / len, max / len, min / len, avg / len)
    }

    /// Returns `true` if the maximum and minimum frequencies of the window
    /// are equal, so no synonymous substitution could change its codon
    /// usage. For windows built with [`WindowStats::from_weights`] this
    /// holds exactly when every codon has a constant synonym set: each
    /// codon then adds the same value to both sums.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// How far the actual frequency is from the average towards the maximum,
    /// in percent.
    #[must_use]
    pub fn percent_max(&self) -> f64 {
        ((self.actual - self.avg) / (self.max - self.avg)) * 100.0
    }

    /// How far the actual frequency is from the average towards the minimum,
    /// in percent.
    #[must_use]
    pub fn percent_min(&self) -> f64 {
        ((self.avg - self.actual) / (self.avg - self.min)) * 100.0
    }

    /// The MinMax score: `percent_max` when it is non-negative, negated
    /// `percent_min` otherwise.
    ///
    /// # Examples
    /// ```
    /// use minmax::calculator::WindowStats;
    ///
    /// assert_eq!(WindowStats::new(0.625, 0.75, 0.25, 0.5).score(), 50.0);
    /// assert_eq!(WindowStats::new(0.375, 0.75, 0.25, 0.5).score(), -50.0);
    /// assert_eq!(WindowStats::new(0.5, 0.75, 0.25, 0.5).score(), 0.0);
    /// ```
    #[must_use]
    pub fn score(&self) -> f64 {
        let percent_max = self.percent_max();
        if percent_max >= 0.0 {
            percent_max
        } else {
            -self.percent_min()
        }
    }
}

/// A single entry of the MinMax output: either a score, or a marker for
/// codons too close to the sequence ends to be the center of a window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MinMaxValue {
    Score(f64),
    Undefined,
}

impl MinMaxValue {
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self {
            MinMaxValue::Score(score) => Some(*score),
            MinMaxValue::Undefined => None,
        }
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, MinMaxValue::Undefined)
    }
}

impl Serialize for MinMaxValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MinMaxValue::Score(score) => serializer.serialize_f64(*score),
            MinMaxValue::Undefined => serializer.serialize_none(),
        }
    }
}

/// MinMax values for every codon of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinMaxScores {
    window_size: WindowSize,
    values: Vec<MinMaxValue>,
}

impl MinMaxScores {
    #[must_use]
    pub fn window_size(&self) -> WindowSize {
        self.window_size
    }

    /// Number of windows that were evaluated.
    #[must_use]
    pub fn window_num(&self) -> usize {
        self.values.len() - self.window_size.get() + 1
    }

    #[must_use]
    pub fn values(&self) -> &[MinMaxValue] {
        &self.values
    }

    /// Returns the number of values, equal to the number of codons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MinMaxValue> {
        self.values.iter()
    }

    /// Iterates over `(position, score)` pairs of all defined values.
    pub fn scores(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(position, value)| value.score().map(|score| (position, score)))
    }

    #[must_use]
    pub fn into_values(self) -> Vec<MinMaxValue> {
        self.values
    }
}

#[derive(Debug, Clone)]
pub struct MinMaxParams {
    window_size: usize,
    degenerate_policy: DegenerateWindowPolicy,
    parallel: bool,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl MinMaxParams {
    pub fn builder() -> MinMaxParamsBuilder {
        MinMaxParamsBuilder::new()
    }
}

impl Default for MinMaxParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct MinMaxParamsBuilder {
    window_size: usize,
    degenerate_policy: DegenerateWindowPolicy,
    parallel: bool,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl MinMaxParamsBuilder {
    pub fn new() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            degenerate_policy: DegenerateWindowPolicy::default(),
            parallel: false,
            progress_notifier: Arc::new(DummyProgressNotifier),
        }
    }

    pub fn window_size(&mut self, window_size: usize) -> &mut Self {
        self.window_size = window_size;
        self
    }

    pub fn degenerate_policy(&mut self, degenerate_policy: DegenerateWindowPolicy) -> &mut Self {
        self.degenerate_policy = degenerate_policy;
        self
    }

    /// Evaluate the windows on the rayon thread pool. The output is identical
    /// to the sequential one.
    pub fn parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        self.progress_notifier = progress_notifier;
        self
    }

    pub fn build(&mut self) -> MinMaxParams {
        MinMaxParams {
            window_size: self.window_size,
            degenerate_policy: self.degenerate_policy,
            parallel: self.parallel,
            progress_notifier: self.progress_notifier.clone(),
        }
    }
}

impl Default for MinMaxParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculates MinMax values of codon sequences using a single frequency
/// table.
#[derive(Debug)]
pub struct MinMaxCalculator<'a> {
    index: &'a FrequencyIndex,
    params: MinMaxParams,
}

impl<'a> MinMaxCalculator<'a> {
    #[must_use]
    pub fn new(index: &'a FrequencyIndex) -> Self {
        Self::with_params(index, MinMaxParams::default())
    }

    #[must_use]
    pub fn with_params(index: &'a FrequencyIndex, params: MinMaxParams) -> Self {
        Self { index, params }
    }

    /// Calculates the MinMax value for every codon of given sequence.
    ///
    /// The value at position `i + window_size / 2` is the score of the window
    /// starting at codon `i`; positions that are not the center of any window
    /// are [`MinMaxValue::Undefined`].
    ///
    /// # Examples
    /// ```
    /// use minmax::calculator::{MinMaxCalculator, MinMaxParams, MinMaxValue};
    /// use minmax::frequency_table::FrequencyIndex;
    /// use minmax::sequence::CodonSequence;
    ///
    /// let index = FrequencyIndex::from_lines(["AAA Lys 0.75", "AAG Lys 0.25"]).unwrap();
    /// let sequence = CodonSequence::from_lines(["AAAAAAAAG"]);
    /// let params = MinMaxParams::builder().window_size(2).build();
    ///
    /// let scores = MinMaxCalculator::with_params(&index, params)
    ///     .calculate(&sequence)
    ///     .unwrap();
    /// assert_eq!(
    ///     scores.values(),
    ///     [
    ///         MinMaxValue::Undefined,
    ///         MinMaxValue::Score(100.0),
    ///         MinMaxValue::Score(0.0),
    ///     ]
    /// );
    /// ```
    pub fn calculate(&self, sequence: &CodonSequence) -> MinMaxResult<MinMaxScores> {
        let window_size = WindowSize::new(self.params.window_size, sequence.len())?;
        let weights = self.resolve_weights(sequence)?;

        let window_num = sequence.len() - window_size.get() + 1;
        debug!(
            "Evaluating {} windows of {} codons (parallel: {})",
            window_num,
            window_size.get(),
            self.params.parallel
        );
        self.params.progress_notifier.set_iter_num(window_num as u64);

        let windows: Vec<MinMaxResult<MinMaxValue>> = if self.params.parallel {
            weights
                .par_windows(window_size.get())
                .enumerate()
                .map(|(start, window)| self.evaluate_window(start + window_size.half(), window))
                .collect()
        } else {
            weights
                .windows(window_size.get())
                .enumerate()
                .map(|(start, window)| self.evaluate_window(start + window_size.half(), window))
                .collect()
        };

        let mut values = Vec::with_capacity(sequence.len());
        values.extend(iter::repeat(MinMaxValue::Undefined).take(window_size.half()));
        for value in windows {
            values.push(value?);
        }
        values.extend(iter::repeat(MinMaxValue::Undefined).take(window_size.tail()));

        Ok(MinMaxScores {
            window_size,
            values,
        })
    }

    fn resolve_weights(&self, sequence: &CodonSequence) -> MinMaxResult<Vec<CodonWeights>> {
        sequence
            .iter()
            .enumerate()
            .map(|(position, codon)| {
                CodonWeights::resolve(self.index, codon).ok_or_else(|| {
                    MinMaxError::UnknownCodon {
                        codon: codon.clone(),
                        position,
                    }
                })
            })
            .collect()
    }

    fn evaluate_window(&self, center: usize, window: &[CodonWeights]) -> MinMaxResult<MinMaxValue> {
        let stats = WindowStats::from_weights(window);
        self.params.progress_notifier.inc_iter();

        if !stats.is_degenerate() {
            return Ok(MinMaxValue::Score(stats.score()));
        }

        trace!("Degenerate window centered at codon {}", center);
        match self.params.degenerate_policy {
            DegenerateWindowPolicy::Zero => Ok(MinMaxValue::Score(0.0)),
            DegenerateWindowPolicy::NotANumber => Ok(MinMaxValue::Score(f64::NAN)),
            DegenerateWindowPolicy::Error => Err(MinMaxError::DegenerateWindow { position: center }),
        }
    }
}
