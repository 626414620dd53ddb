use lazy_static::lazy_static;

use crate::frequency_table::FrequencyIndex;
use crate::sequence::CodonSequence;

/// Codon usage of Escherichia coli K-12, as the fraction of each codon among
/// its synonyms.
pub const E_COLI_FREQUENCY_TABLE_STR: &str = "\
TTT Phe 0.57
TTC Phe 0.43
TTA Leu 0.13
TTG Leu 0.13
CTT Leu 0.10
CTC Leu 0.10
CTA Leu 0.04
CTG Leu 0.50
ATT Ile 0.51
ATC Ile 0.42
ATA Ile 0.07
ATG Met 1.00
GTT Val 0.26
GTC Val 0.22
GTA Val 0.15
GTG Val 0.37
TCT Ser 0.15
TCC Ser 0.15
TCA Ser 0.12
TCG Ser 0.15
AGT Ser 0.15
AGC Ser 0.28
CCT Pro 0.16
CCC Pro 0.12
CCA Pro 0.19
CCG Pro 0.53
ACT Thr 0.17
ACC Thr 0.44
ACA Thr 0.13
ACG Thr 0.27
GCT Ala 0.16
GCC Ala 0.27
GCA Ala 0.21
GCG Ala 0.36
TAT Tyr 0.57
TAC Tyr 0.43
TAA End 0.64
TAG End 0.07
TGA End 0.29
CAT His 0.57
CAC His 0.43
CAA Gln 0.35
CAG Gln 0.65
AAT Asn 0.45
AAC Asn 0.55
AAA Lys 0.76
AAG Lys 0.24
GAT Asp 0.63
GAC Asp 0.37
GAA Glu 0.69
GAG Glu 0.31
TGT Cys 0.45
TGC Cys 0.55
TGG Trp 1.00
CGT Arg 0.38
CGC Arg 0.40
CGA Arg 0.06
CGG Arg 0.10
AGA Arg 0.04
AGG Arg 0.02
GGT Gly 0.34
GGC Gly 0.40
GGA Gly 0.11
GGG Gly 0.15
";

lazy_static! {
    pub static ref E_COLI_FREQUENCY_TABLE: FrequencyIndex =
        FrequencyIndex::from_reader(E_COLI_FREQUENCY_TABLE_STR.as_bytes())
            .expect("Invalid test frequency table");
}

/// A 147-codon fragment of the E. coli lacZ gene, wrapped at 60 characters.
pub const LAC_Z_FRAGMENT_STR: &str = "\
ATGACCATGATTACGGATTCACTGGCCGTCGTTTTACAACGTCGTGACTGGGAAAACCCT
GGCGTTACCCAACTTAATCGCCTTGCAGCACATCCCCCTTTCGCCAGCTGGCGTAATAGC
GAAGAGGCCCGCACCGATCGCCCTTCCCAACAGTTGCGCAGCCTGAATGGCGAATGGCGC
TTTGCCTGGTTTCCGGCACCAGAAGCGGTGCCGGAAAGCTGGCTGGAGTGCGATCTTCCT
GAGGCCGATACTGTCGTCGTCCCCTCAAACTGGCAGATGCACGGTTACGATGCGCCCATC
TACACCAACGTGACCTATCCCATTACGGTCAATCCGCCGTTTGTTCCCACGGAGAATCCG
ACGGGTTGTTACTCGCTCACATTTAATGTTGATGAAAGCTGGCTACAGGAAGGCCAGACG
CGAATTATTTTTGATGGCGTT
";

pub const LAC_Z_FRAGMENT_CODON_NUM: usize = 147;

lazy_static! {
    pub static ref LAC_Z_FRAGMENT: CodonSequence =
        CodonSequence::from_reader(LAC_Z_FRAGMENT_STR.as_bytes())
            .expect("Invalid test sequence");
}

/// Two amino acids: `A1` with two codons (mean 0.5) and `B1` with a single
/// codon.
pub const TWO_AMINO_ACID_TABLE_STR: &str = "\
AAA A1 0.6
AAG A1 0.4
CCC B1 1.0
";

/// Every amino acid's synonyms share the same frequency.
pub const UNIFORM_TABLE_STR: &str = "\
AAA Lys 0.5
AAG Lys 0.5
GAT Asp 0.5
GAC Asp 0.5
ATG Met 1.0
";

lazy_static! {
    pub static ref TWO_AMINO_ACID_TABLE: FrequencyIndex =
        FrequencyIndex::from_reader(TWO_AMINO_ACID_TABLE_STR.as_bytes())
            .expect("Invalid test frequency table");
    pub static ref UNIFORM_TABLE: FrequencyIndex =
        FrequencyIndex::from_reader(UNIFORM_TABLE_STR.as_bytes())
            .expect("Invalid test frequency table");
    /// About 30k codons made of repeated copies of [`LAC_Z_FRAGMENT`].
    pub static ref SEQ_30K_CODONS: CodonSequence = CodonSequence::from_lines(
        std::iter::repeat(LAC_Z_FRAGMENT_STR)
            .take(200)
            .flat_map(str::lines)
    );
}
