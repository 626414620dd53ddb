pub mod calculator;
pub mod codon;
pub mod frequency_table;
pub mod progress;
pub mod sequence;

#[doc(hidden)]
pub mod _internal_test_data;
