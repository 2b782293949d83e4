use std::fmt::Display;
use std::str::FromStr;

use eyre::{eyre, Report};
use serde::{Deserialize, Serialize};

/// Chromosome sizes of the UCSC hg19 human assembly.
const HG19: [(&str, u64); 24] = [
    ("chr1", 249_250_621),
    ("chr2", 243_199_373),
    ("chr3", 198_022_430),
    ("chr4", 191_154_276),
    ("chr5", 180_915_260),
    ("chr6", 171_115_067),
    ("chr7", 159_138_663),
    ("chr8", 146_364_022),
    ("chr9", 141_213_431),
    ("chr10", 135_534_747),
    ("chr11", 135_006_516),
    ("chr12", 133_851_895),
    ("chr13", 115_169_878),
    ("chr14", 107_349_540),
    ("chr15", 102_531_392),
    ("chr16", 90_354_753),
    ("chr17", 81_195_210),
    ("chr18", 78_077_248),
    ("chr19", 59_128_983),
    ("chr20", 63_025_520),
    ("chr21", 48_129_895),
    ("chr22", 51_304_566),
    ("chrX", 155_270_560),
    ("chrY", 59_373_566),
];

/// Chromosome sizes of the UCSC hg38 human assembly.
const HG38: [(&str, u64); 24] = [
    ("chr1", 248_956_422),
    ("chr2", 242_193_529),
    ("chr3", 198_295_559),
    ("chr4", 190_214_555),
    ("chr5", 181_538_259),
    ("chr6", 170_805_979),
    ("chr7", 159_345_973),
    ("chr8", 145_138_636),
    ("chr9", 138_394_717),
    ("chr10", 133_797_422),
    ("chr11", 135_086_622),
    ("chr12", 133_275_309),
    ("chr13", 114_364_328),
    ("chr14", 107_043_718),
    ("chr15", 101_991_189),
    ("chr16", 90_338_345),
    ("chr17", 83_257_441),
    ("chr18", 80_373_285),
    ("chr19", 58_617_616),
    ("chr20", 64_444_167),
    ("chr21", 46_709_983),
    ("chr22", 50_818_468),
    ("chrX", 156_040_895),
    ("chrY", 57_227_415),
];

/// Chromosome sizes of the UCSC mm10 mouse assembly.
const MM10: [(&str, u64); 21] = [
    ("chr1", 195_471_971),
    ("chr2", 182_113_224),
    ("chr3", 160_039_680),
    ("chr4", 156_508_116),
    ("chr5", 151_834_684),
    ("chr6", 149_736_546),
    ("chr7", 145_441_459),
    ("chr8", 129_401_213),
    ("chr9", 124_595_110),
    ("chr10", 130_694_993),
    ("chr11", 122_082_543),
    ("chr12", 120_129_022),
    ("chr13", 120_421_639),
    ("chr14", 124_902_244),
    ("chr15", 104_043_685),
    ("chr16", 98_207_768),
    ("chr17", 94_987_271),
    ("chr18", 90_702_639),
    ("chr19", 61_431_566),
    ("chrX", 171_031_299),
    ("chrY", 91_744_698),
];

/// A supported reference genome assembly. The copy-number pipeline works
/// against the canonical chromosome set only: the numbered autosomes plus,
/// optionally, the two sex chromosomes.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Assembly {
    Hg19,
    Hg38,
    Mm10,
}

impl Assembly {
    /// The string key of the assembly ("hg19", "hg38", "mm10").
    pub fn key(&self) -> &'static str {
        match self {
            Self::Hg19 => "hg19",
            Self::Hg38 => "hg38",
            Self::Mm10 => "mm10",
        }
    }

    /// Number of autosomes in the canonical chromosome set.
    pub fn autosomes(&self) -> usize {
        match self {
            Self::Hg19 | Self::Hg38 => 22,
            Self::Mm10 => 19,
        }
    }

    /// Ordered (name, length) table of the selected chromosomes: all
    /// autosomes in genomic order, then chrX and chrY when `include_sex`.
    pub fn chromosomes(&self, include_sex: bool) -> Vec<(&'static str, u64)> {
        let table: &[(&str, u64)] = match self {
            Self::Hg19 => &HG19,
            Self::Hg38 => &HG38,
            Self::Mm10 => &MM10,
        };
        let count = self.autosomes() + if include_sex { 2 } else { 0 };
        table[..count].to_vec()
    }

    /// Total length of the selected chromosomes.
    pub fn genome_length(&self, include_sex: bool) -> u64 {
        self.chromosomes(include_sex)
            .iter()
            .map(|(_, length)| length)
            .sum()
    }
}

impl Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Assembly {
    type Err = Report;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key.to_ascii_lowercase().as_str() {
            "hg19" => Ok(Self::Hg19),
            "hg38" => Ok(Self::Hg38),
            "mm10" => Ok(Self::Mm10),
            _ => Err(eyre!(
                "Unknown assembly '{key}', expected one of: hg19, hg38, mm10"
            )),
        }
    }
}

impl TryFrom<&str> for Assembly {
    type Error = Report;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        key.parse()
    }
}
