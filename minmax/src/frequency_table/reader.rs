use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io::BufRead;

use crate::frequency_table::CodonRecord;

/// The reason why a single line of a codon usage table could not be parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MalformedRecordKind {
    /// The line did not split into exactly three whitespace-separated fields.
    FieldCount(usize),
    /// The frequency field is not a finite, non-negative decimal number.
    InvalidFrequency(String),
}

impl Display for MalformedRecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedRecordKind::FieldCount(count) => {
                write!(f, "expected 3 fields, found {}", count)
            }
            MalformedRecordKind::InvalidFrequency(value) => {
                write!(f, "invalid frequency: `{}`", value)
            }
        }
    }
}

/// A line of a codon usage table that could not be parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MalformedRecord {
    line_number: usize,
    line: String,
    kind: MalformedRecordKind,
}

impl MalformedRecord {
    #[must_use]
    pub fn new<T: Into<String>>(line_number: usize, line: T, kind: MalformedRecordKind) -> Self {
        Self {
            line_number,
            line: line.into(),
            kind,
        }
    }

    /// 1-based number of the offending line.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    #[must_use]
    pub fn kind(&self) -> &MalformedRecordKind {
        &self.kind
    }
}

impl Display for MalformedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} (`{}`)", self.line_number, self.kind, self.line)
    }
}

/// Error occurring during reading a codon usage table.
#[derive(Debug)]
pub enum FrequencyTableError {
    /// I/O error occurred when reading the table.
    IoError(std::io::Error),
    /// A single line of the table is malformed.
    MalformedRecord(MalformedRecord),
    /// One or more lines of the table are malformed.
    MalformedRecords(Vec<MalformedRecord>),
    /// The table does not contain any records.
    Empty,
}

impl From<std::io::Error> for FrequencyTableError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl From<MalformedRecord> for FrequencyTableError {
    fn from(record: MalformedRecord) -> Self {
        Self::MalformedRecord(record)
    }
}

impl Display for FrequencyTableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyTableError::IoError(e) => write!(f, "IO error: {}", e),
            FrequencyTableError::MalformedRecord(record) => {
                write!(f, "Malformed record at {}", record)
            }
            FrequencyTableError::MalformedRecords(records) => {
                write!(f, "{} malformed record(s):", records.len())?;
                for record in records {
                    write!(f, "\n  {}", record)?;
                }
                Ok(())
            }
            FrequencyTableError::Empty => write!(f, "Frequency table is empty"),
        }
    }
}

impl Error for FrequencyTableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FrequencyTableError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a codon usage table reading operation.
pub type FrequencyTableResult<T> = Result<T, FrequencyTableError>;

/// Parses a single line of a codon usage table.
///
/// Returns `None` for blank lines.
pub(super) fn parse_line(line_number: usize, line: &str) -> Option<Result<CodonRecord, MalformedRecord>> {
    if line.trim().is_empty() {
        return None;
    }

    let result = line
        .parse::<CodonRecord>()
        .map_err(|kind| MalformedRecord::new(line_number, line.trim_end(), kind));
    Some(result)
}

/// Line-oriented codon usage table reader, deserializing each line into a
/// [`CodonRecord`].
///
/// Each non-blank line has the form `<codon> <amino acid> <frequency>`.
/// Malformed lines do not stop the reader; only I/O errors do.
#[derive(Debug)]
pub struct FrequencyTableReader<R> {
    reader: R,
    line_number: usize,
    buffer: String,
    failed: bool,
}

impl<R: BufRead> FrequencyTableReader<R> {
    /// Creates new `FrequencyTableReader` instance.
    ///
    /// # Examples
    /// ```
    /// use minmax::frequency_table::reader::FrequencyTableReader;
    ///
    /// let table = "AAA Lys 0.74\nAAG Lys 0.26\n";
    /// let reader = FrequencyTableReader::new(table.as_bytes());
    /// assert_eq!(reader.into_iter().count(), 2);
    /// ```
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::with_capacity(64),
            failed: false,
        }
    }

    /// Reads the next record, skipping blank lines. Returns `None` once the
    /// end of input has been reached.
    pub fn read_record(&mut self) -> Option<FrequencyTableResult<CodonRecord>> {
        if self.failed {
            return None;
        }

        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
            self.line_number += 1;

            if let Some(result) = parse_line(self.line_number, &self.buffer) {
                return Some(result.map_err(FrequencyTableError::from));
            }
        }
    }
}

impl<R: BufRead> Iterator for FrequencyTableReader<R> {
    type Item = FrequencyTableResult<CodonRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io::ErrorKind::NotFound;

    use approx::assert_abs_diff_eq;

    use crate::codon::{AminoAcid, Codon};
    use crate::frequency_table::reader::{
        FrequencyTableError, FrequencyTableReader, MalformedRecord, MalformedRecordKind,
    };

    #[test]
    fn should_read_records() {
        let reader = FrequencyTableReader::new("AAA Lys 0.74\nAAG\tLys   0.26\n".as_bytes());
        let records: Result<Vec<_>, _> = reader.collect();
        let records = records.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].codon(), &Codon::from("AAG"));
        assert_eq!(records[1].amino_acid(), &AminoAcid::from("Lys"));
        assert_abs_diff_eq!(records[1].frequency(), 0.26);
    }

    #[test]
    fn should_skip_blank_lines() {
        let reader = FrequencyTableReader::new("\nAAA Lys 0.74\n   \n\nAAG Lys 0.26".as_bytes());

        assert_eq!(reader.filter(Result::is_ok).count(), 2);
    }

    #[test]
    fn should_continue_after_malformed_line() {
        let reader = FrequencyTableReader::new("AAA Lys\nAAG Lys 0.26\nGGG Gly x\n".as_bytes());
        let results: Vec<_> = reader.collect();

        assert_eq!(results.len(), 3);
        assert!(matches!(
            &results[0],
            Err(FrequencyTableError::MalformedRecord(record))
                if record.line_number() == 1 && record.kind() == &MalformedRecordKind::FieldCount(2)
        ));
        assert!(results[1].is_ok());
        assert!(matches!(
            &results[2],
            Err(FrequencyTableError::MalformedRecord(record))
                if record.line_number() == 3 && record.line() == "GGG Gly x"
        ));
    }

    #[test]
    fn read_returns_nothing_for_empty_input() {
        let reader = FrequencyTableReader::new("".as_bytes());

        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            format!("{}", FrequencyTableError::from(std::io::Error::from(NotFound))),
            "IO error: entity not found"
        );
        assert_eq!(
            format!("{}", FrequencyTableError::Empty),
            "Frequency table is empty"
        );
        let record = MalformedRecord::new(4, "AAA Lys", MalformedRecordKind::FieldCount(2));
        assert_eq!(
            format!("{}", FrequencyTableError::from(record.clone())),
            "Malformed record at line 4: expected 3 fields, found 2 (`AAA Lys`)"
        );
        let other = MalformedRecord::new(
            7,
            "AAG Lys abc",
            MalformedRecordKind::InvalidFrequency("abc".to_owned()),
        );
        assert_eq!(
            format!(
                "{}",
                FrequencyTableError::MalformedRecords(vec![record, other])
            ),
            "2 malformed record(s):\n  line 4: expected 3 fields, found 2 (`AAA Lys`)\n  line 7: invalid frequency: `abc` (`AAG Lys abc`)"
        );
    }

    #[test]
    fn test_error_source() {
        assert!(FrequencyTableError::from(std::io::Error::from(NotFound))
            .source()
            .is_some());
        assert!(FrequencyTableError::Empty.source().is_none());
        assert!(FrequencyTableError::MalformedRecords(Vec::new())
            .source()
            .is_none());
    }
}
