use std::convert::Infallible;
use std::io::BufRead;
use std::slice::Iter;
use std::str::FromStr;

use log::debug;

use crate::codon::{Codon, CODON_LEN};

const FASTA_HEADER_PREFIX: char = '>';

/// A builder for `CodonSequenceParams`.
#[derive(Debug, Clone)]
pub struct CodonSequenceParamsBuilder {
    skip_fasta_headers: bool,
}

impl CodonSequenceParamsBuilder {
    /// Returns a new instance of `CodonSequenceParamsBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            skip_fasta_headers: false,
        }
    }

    /// Ignore lines starting with `>`, so that a single-record FASTA file can
    /// be used as the input.
    pub fn skip_fasta_headers(&mut self, skip_fasta_headers: bool) -> &mut Self {
        self.skip_fasta_headers = skip_fasta_headers;
        self
    }

    /// Builds and returns [`CodonSequenceParams`].
    #[must_use]
    pub fn build(&self) -> CodonSequenceParams {
        CodonSequenceParams {
            skip_fasta_headers: self.skip_fasta_headers,
        }
    }
}

impl Default for CodonSequenceParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Codon sequence tokenizing params.
#[derive(Debug, Clone)]
pub struct CodonSequenceParams {
    skip_fasta_headers: bool,
}

impl CodonSequenceParams {
    /// Returns new builder for `CodonSequenceParams`.
    #[must_use]
    pub fn builder() -> CodonSequenceParamsBuilder {
        CodonSequenceParamsBuilder::new()
    }
}

impl Default for CodonSequenceParams {
    fn default() -> Self {
        CodonSequenceParamsBuilder::default().build()
    }
}

/// Ordered list of codons read from a (possibly line-wrapped) nucleotide
/// sequence.
///
/// The lines are concatenated (with the trailing whitespace stripped) and
/// split into non-overlapping codons starting at the first character. Up to
/// two trailing characters that do not form a full codon are dropped.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct CodonSequence {
    codons: Vec<Codon>,
    dropped_remainder: usize,
}

impl CodonSequence {
    /// Creates a new `CodonSequence` out of already tokenized codons.
    #[must_use]
    pub fn new<T: Into<Vec<Codon>>>(codons: T) -> Self {
        Self {
            codons: codons.into(),
            dropped_remainder: 0,
        }
    }

    /// Tokenizes given lines using default params.
    ///
    /// # Examples
    /// ```
    /// use minmax::sequence::CodonSequence;
    ///
    /// let seq = CodonSequence::from_lines(["ATGAA", "AGC  ", "TA"]);
    /// let codons: Vec<&str> = seq.iter().map(|codon| codon.str()).collect();
    /// assert_eq!(codons, ["ATG", "AAA", "GCT"]);
    /// assert_eq!(seq.dropped_remainder(), 1);
    /// ```
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_lines_with_params(lines, &CodonSequenceParams::default())
    }

    #[must_use]
    pub fn from_lines_with_params<I, S>(lines: I, params: &CodonSequenceParams) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut concatenated = String::new();
        for line in lines {
            let line = line.as_ref();
            if params.skip_fasta_headers && line.starts_with(FASTA_HEADER_PREFIX) {
                continue;
            }
            concatenated.push_str(line.trim_end());
        }

        Self::tokenize(&concatenated)
    }

    /// Reads and tokenizes a sequence from given reader using default params.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        Self::from_reader_with_params(reader, &CodonSequenceParams::default())
    }

    pub fn from_reader_with_params<R: BufRead>(
        reader: R,
        params: &CodonSequenceParams,
    ) -> std::io::Result<Self> {
        let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;

        Ok(Self::from_lines_with_params(lines, params))
    }

    fn tokenize(nucleotides: &str) -> Self {
        let chars: Vec<char> = nucleotides.chars().collect();
        let chunks = chars.chunks_exact(CODON_LEN);
        let dropped_remainder = chunks.remainder().len();

        let codons: Vec<Codon> = chunks
            .map(|chunk| Codon::new(chunk.iter().collect::<String>()))
            .collect();
        debug!(
            "Tokenized {} codons ({} trailing characters dropped)",
            codons.len(),
            dropped_remainder
        );

        Self {
            codons,
            dropped_remainder,
        }
    }

    #[must_use]
    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    /// Returns the number of codons in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    /// Number of trailing characters (0, 1 or 2) that did not form a full
    /// codon and were discarded.
    #[must_use]
    pub fn dropped_remainder(&self) -> usize {
        self.dropped_remainder
    }

    pub fn iter(&self) -> Iter<'_, Codon> {
        self.codons.iter()
    }
}

impl FromStr for CodonSequence {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_lines(s.lines()))
    }
}

impl<'a> IntoIterator for &'a CodonSequence {
    type Item = &'a Codon;
    type IntoIter = Iter<'a, Codon>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::codon::Codon;
    use crate::sequence::{CodonSequence, CodonSequenceParams};

    fn codon_strs(seq: &CodonSequence) -> Vec<&str> {
        seq.iter().map(|codon| codon.str()).collect_vec()
    }

    #[test]
    fn should_split_into_codons() {
        let seq: CodonSequence = "AAAAAGCCCAAAAAG".parse().unwrap();

        assert_eq!(codon_strs(&seq), ["AAA", "AAG", "CCC", "AAA", "AAG"]);
        assert_eq!(seq.dropped_remainder(), 0);
    }

    #[test]
    fn should_join_wrapped_lines() {
        let seq = CodonSequence::from_lines(["AA", "AA\n", "AGC\r\n", "CC \t"]);

        assert_eq!(codon_strs(&seq), ["AAA", "AAG", "CCC"]);
    }

    #[test]
    fn should_drop_partial_codon() {
        assert_eq!(CodonSequence::from_lines(["ATGA"]).dropped_remainder(), 1);
        assert_eq!(CodonSequence::from_lines(["ATGAC"]).dropped_remainder(), 2);
        assert_eq!(CodonSequence::from_lines(["ATGAC"]).len(), 1);
        assert!(CodonSequence::from_lines(["AT"]).is_empty());
    }

    #[test]
    fn should_keep_case_and_inner_characters() {
        let seq = CodonSequence::from_lines(["a TgNx-"]);

        assert_eq!(codon_strs(&seq), ["a T", "gNx"]);
        assert_eq!(seq.dropped_remainder(), 1);
    }

    #[test]
    fn should_split_by_characters() {
        let seq = CodonSequence::from_lines(["ÄÖÜabc"]);

        assert_eq!(codon_strs(&seq), ["ÄÖÜ", "abc"]);
    }

    #[test]
    fn empty_input_gives_empty_sequence() {
        let seq = CodonSequence::from_lines(Vec::<String>::new());

        assert!(seq.is_empty());
        assert_eq!(seq, CodonSequence::default());
    }

    #[test]
    fn fasta_headers_are_kept_by_default() {
        let seq = CodonSequence::from_lines([">ab", "ATG"]);

        assert_eq!(codon_strs(&seq), [">ab", "ATG"]);
    }

    #[test]
    fn should_skip_fasta_headers() {
        let params = CodonSequenceParams::builder()
            .skip_fasta_headers(true)
            .build();
        let seq = CodonSequence::from_lines_with_params([">gene1 test", "ATGAAA", "GGC"], &params);

        assert_eq!(codon_strs(&seq), ["ATG", "AAA", "GGC"]);
    }

    #[test]
    fn should_read_from_reader() {
        let seq = CodonSequence::from_reader("ATGAA\nAGGC\n".as_bytes()).unwrap();

        assert_eq!(
            seq.codons(),
            [Codon::from("ATG"), Codon::from("AAA"), Codon::from("GGC")]
        );
    }
}
