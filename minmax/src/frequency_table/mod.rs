//! Codon usage tables: codon to amino acid mappings together with the
//! species-specific frequency of each codon.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;

use log::{debug, warn};

use crate::codon::{AminoAcid, Codon};
use crate::frequency_table::reader::{
    parse_line, FrequencyTableError, FrequencyTableReader, FrequencyTableResult,
    MalformedRecordKind,
};

pub mod reader;

const RECORD_FIELD_NUM: usize = 3;

/// A single entry of a codon usage table.
#[derive(Debug, Clone, PartialEq)]
pub struct CodonRecord {
    codon: Codon,
    amino_acid: AminoAcid,
    frequency: f64,
}

impl CodonRecord {
    /// Creates a new `CodonRecord`.
    ///
    /// # Panics
    /// This function panics if the frequency is negative, or is not finite.
    #[must_use]
    pub fn new<C, A>(codon: C, amino_acid: A, frequency: f64) -> Self
    where
        C: Into<Codon>,
        A: Into<AminoAcid>,
    {
        assert!(frequency.is_finite());
        assert!(frequency >= 0.0);

        Self {
            codon: codon.into(),
            amino_acid: amino_acid.into(),
            frequency,
        }
    }

    #[must_use]
    pub fn codon(&self) -> &Codon {
        &self.codon
    }

    #[must_use]
    pub fn amino_acid(&self) -> &AminoAcid {
        &self.amino_acid
    }

    #[must_use]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

impl FromStr for CodonRecord {
    type Err = MalformedRecordKind;

    /// Parses a `<codon> <amino acid> <frequency>` line.
    ///
    /// # Examples
    /// ```
    /// use minmax::frequency_table::CodonRecord;
    ///
    /// let record: CodonRecord = "GCC Ala 0.27".parse().unwrap();
    /// assert_eq!(record.codon().str(), "GCC");
    /// assert_eq!(record.amino_acid().str(), "Ala");
    /// assert_eq!(record.frequency(), 0.27);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != RECORD_FIELD_NUM {
            return Err(MalformedRecordKind::FieldCount(fields.len()));
        }

        let frequency = fields[2]
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| MalformedRecordKind::InvalidFrequency(fields[2].to_owned()))?;

        Ok(Self::new(fields[0], fields[1], frequency))
    }
}

/// Frequencies of every codon encoding a single amino acid, in the order
/// they were listed in the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SynonymFrequencies(Vec<f64>);

impl SynonymFrequencies {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(&mut self, frequency: f64) {
        self.0.push(frequency);
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Frequency of the most favored synonymous codon.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Frequency of the least favored synonymous codon.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Arithmetic mean of all synonymous codon frequencies.
    ///
    /// # Examples
    /// ```
    /// use minmax::frequency_table::SynonymFrequencies;
    ///
    /// let mut synonyms = SynonymFrequencies::new();
    /// synonyms.add(0.75);
    /// synonyms.add(0.25);
    /// assert_eq!(synonyms.mean(), 0.5);
    /// ```
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    /// Returns `true` if all synonymous codons share the same frequency, so no
    /// substitution could change the codon usage.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.max() == self.min()
    }
}

/// Read-only index built from a codon usage table.
///
/// Maps each codon to its frequency and amino acid, and each amino acid to
/// the frequencies of all its synonymous codons.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyIndex {
    frequencies: HashMap<Codon, f64>,
    amino_acids: HashMap<Codon, AminoAcid>,
    synonyms: HashMap<AminoAcid, SynonymFrequencies>,
}

impl FrequencyIndex {
    /// Builds the index out of a list of records.
    ///
    /// A codon listed more than once keeps the last frequency and amino acid,
    /// but every occurrence is counted as a synonym of its amino acid.
    ///
    /// # Examples
    /// ```
    /// use minmax::codon::Codon;
    /// use minmax::frequency_table::{CodonRecord, FrequencyIndex};
    ///
    /// let index = FrequencyIndex::from_records([
    ///     CodonRecord::new("AAA", "Lys", 0.74),
    ///     CodonRecord::new("AAG", "Lys", 0.26),
    /// ])
    /// .unwrap();
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.frequency(&Codon::from("AAG")), Some(0.26));
    /// ```
    pub fn from_records<I>(records: I) -> FrequencyTableResult<Self>
    where
        I: IntoIterator<Item = CodonRecord>,
    {
        let mut frequencies = HashMap::new();
        let mut amino_acids = HashMap::new();
        let mut synonyms: HashMap<AminoAcid, SynonymFrequencies> = HashMap::new();

        for record in records {
            synonyms
                .entry(record.amino_acid.clone())
                .or_default()
                .add(record.frequency);

            match frequencies.entry(record.codon.clone()) {
                Entry::Occupied(mut entry) => {
                    warn!(
                        "Codon `{}` is listed more than once; using the last frequency ({})",
                        record.codon, record.frequency
                    );
                    entry.insert(record.frequency);
                }
                Entry::Vacant(entry) => {
                    entry.insert(record.frequency);
                }
            }
            amino_acids.insert(record.codon, record.amino_acid);
        }

        if frequencies.is_empty() {
            return Err(FrequencyTableError::Empty);
        }

        debug!(
            "Built frequency index: {} codons, {} amino acids",
            frequencies.len(),
            synonyms.len()
        );

        Ok(Self {
            frequencies,
            amino_acids,
            synonyms,
        })
    }

    /// Parses the table out of a list of lines.
    ///
    /// Every malformed line is reported, not only the first one.
    ///
    /// # Examples
    /// ```
    /// use minmax::frequency_table::FrequencyIndex;
    /// use minmax::frequency_table::reader::FrequencyTableError;
    ///
    /// let result = FrequencyIndex::from_lines(["AAA Lys", "AAG Lys 0.26", "GGG Gly ?"]);
    /// match result {
    ///     Err(FrequencyTableError::MalformedRecords(records)) => assert_eq!(records.len(), 2),
    ///     _ => panic!("expected malformed records"),
    /// }
    /// ```
    pub fn from_lines<I, S>(lines: I) -> FrequencyTableResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let results = lines
            .into_iter()
            .enumerate()
            .filter_map(|(i, line)| parse_line(i + 1, line.as_ref()))
            .map(|result| result.map_err(FrequencyTableError::from));

        Self::from_results(results)
    }

    /// Reads and parses the table from given reader.
    pub fn from_reader<R: BufRead>(reader: R) -> FrequencyTableResult<Self> {
        Self::from_results(FrequencyTableReader::new(reader))
    }

    fn from_results<I>(results: I) -> FrequencyTableResult<Self>
    where
        I: IntoIterator<Item = FrequencyTableResult<CodonRecord>>,
    {
        let mut records = Vec::new();
        let mut malformed = Vec::new();

        for result in results {
            match result {
                Ok(record) => records.push(record),
                Err(FrequencyTableError::MalformedRecord(record)) => malformed.push(record),
                Err(e) => return Err(e),
            }
        }

        if !malformed.is_empty() {
            return Err(FrequencyTableError::MalformedRecords(malformed));
        }

        Self::from_records(records)
    }

    /// Returns the number of distinct codons in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    #[must_use]
    pub fn frequency(&self, codon: &Codon) -> Option<f64> {
        self.frequencies.get(codon).copied()
    }

    #[must_use]
    pub fn amino_acid(&self, codon: &Codon) -> Option<&AminoAcid> {
        self.amino_acids.get(codon)
    }

    #[must_use]
    pub fn synonyms(&self, amino_acid: &AminoAcid) -> Option<&SynonymFrequencies> {
        self.synonyms.get(amino_acid)
    }

    /// Returns the frequencies of all codons synonymous with given codon
    /// (including the codon itself).
    #[must_use]
    pub fn synonyms_of_codon(&self, codon: &Codon) -> Option<&SynonymFrequencies> {
        self.amino_acid(codon)
            .and_then(|amino_acid| self.synonyms(amino_acid))
    }

    pub fn codons(&self) -> impl Iterator<Item = &Codon> {
        self.frequencies.keys()
    }

    pub fn amino_acids(&self) -> impl Iterator<Item = &AminoAcid> {
        self.synonyms.keys()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use crate::_internal_test_data::{E_COLI_FREQUENCY_TABLE, E_COLI_FREQUENCY_TABLE_STR};
    use crate::codon::{AminoAcid, Codon};
    use crate::frequency_table::reader::{FrequencyTableError, MalformedRecordKind};
    use crate::frequency_table::{CodonRecord, FrequencyIndex, SynonymFrequencies};

    #[test]
    fn should_parse_record() {
        let record: CodonRecord = "  TTT   Phe 0.57  ".parse().unwrap();

        assert_eq!(record, CodonRecord::new("TTT", "Phe", 0.57));
    }

    #[test]
    fn should_reject_wrong_field_count() {
        assert_eq!(
            "TTT Phe".parse::<CodonRecord>().unwrap_err(),
            MalformedRecordKind::FieldCount(2)
        );
        assert_eq!(
            "TTT Phe 0.57 extra".parse::<CodonRecord>().unwrap_err(),
            MalformedRecordKind::FieldCount(4)
        );
    }

    #[test]
    fn should_reject_invalid_frequency() {
        for value in ["abc", "-0.5", "inf", "NaN", "0,5"] {
            let line = format!("TTT Phe {}", value);
            assert_eq!(
                line.parse::<CodonRecord>().unwrap_err(),
                MalformedRecordKind::InvalidFrequency(value.to_owned())
            );
        }
    }

    #[test]
    fn should_accept_scientific_frequency() {
        let record: CodonRecord = "TTT Phe 2.2e1".parse().unwrap();

        assert_abs_diff_eq!(record.frequency(), 22.0);
    }

    #[test]
    fn synonym_statistics() {
        let mut synonyms = SynonymFrequencies::new();
        for frequency in [0.2, 0.5, 0.1, 0.2] {
            synonyms.add(frequency);
        }

        assert_eq!(synonyms.len(), 4);
        assert_abs_diff_eq!(synonyms.max(), 0.5);
        assert_abs_diff_eq!(synonyms.min(), 0.1);
        assert_abs_diff_eq!(synonyms.mean(), 0.25);
        assert!(!synonyms.is_constant());
    }

    #[test]
    fn singleton_synonyms_are_constant() {
        let mut synonyms = SynonymFrequencies::new();
        synonyms.add(1.0);

        assert!(synonyms.is_constant());
        assert_abs_diff_eq!(synonyms.mean(), 1.0);
    }

    #[test]
    fn should_group_synonyms() {
        let index = FrequencyIndex::from_lines(["AAA A1 0.6", "CCC B1 1.0", "AAG A1 0.4"]).unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.amino_acids().count(), 2);
        assert_eq!(
            index.amino_acid(&Codon::from("AAG")),
            Some(&AminoAcid::from("A1"))
        );
        let synonyms = index.synonyms(&AminoAcid::from("A1")).unwrap();
        assert_eq!(synonyms.values(), &[0.6, 0.4]);
        assert_eq!(
            index.synonyms_of_codon(&Codon::from("CCC")).unwrap().values(),
            &[1.0]
        );
    }

    #[test_log::test]
    fn duplicate_codon_inflates_synonyms() {
        let index = FrequencyIndex::from_lines(["AAA A1 0.6", "AAG A1 0.4", "AAA A1 0.9"]).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.frequency(&Codon::from("AAA")), Some(0.9));
        let synonyms = index.synonyms(&AminoAcid::from("A1")).unwrap();
        assert_eq!(synonyms.len(), 3);
        assert_abs_diff_eq!(synonyms.max(), 0.9);
    }

    #[test]
    fn duplicate_codon_with_other_amino_acid_uses_last_mapping() {
        let index = FrequencyIndex::from_lines(["AAA A1 0.6", "AAA B1 0.3"]).unwrap();

        assert_eq!(
            index.amino_acid(&Codon::from("AAA")),
            Some(&AminoAcid::from("B1"))
        );
        assert_eq!(index.synonyms(&AminoAcid::from("A1")).unwrap().len(), 1);
        assert_eq!(index.synonyms(&AminoAcid::from("B1")).unwrap().len(), 1);
    }

    #[test]
    fn should_collect_all_malformed_lines() {
        let result = FrequencyIndex::from_lines(["AAA A1", "AAG A1 0.4", "", "CCC B1 one"]);

        let records = match result {
            Err(FrequencyTableError::MalformedRecords(records)) => records,
            other => panic!("unexpected result: {:?}", other),
        };
        assert_eq!(
            records.iter().map(|record| record.line_number()).collect_vec(),
            [1, 4]
        );
    }

    #[test]
    fn should_reject_empty_table() {
        assert!(matches!(
            FrequencyIndex::from_lines(["", "  "]),
            Err(FrequencyTableError::Empty)
        ));
        assert!(matches!(
            FrequencyIndex::from_records(Vec::new()),
            Err(FrequencyTableError::Empty)
        ));
    }

    #[test]
    fn should_read_full_table() {
        let index = FrequencyIndex::from_reader(E_COLI_FREQUENCY_TABLE_STR.as_bytes()).unwrap();

        assert_eq!(index, *E_COLI_FREQUENCY_TABLE);
        assert_eq!(index.len(), 64);
        assert_eq!(index.amino_acids().count(), 21);
        assert_eq!(index.synonyms(&AminoAcid::from("Leu")).unwrap().len(), 6);
        assert!(index
            .synonyms(&AminoAcid::from("Met"))
            .unwrap()
            .is_constant());
    }
}
