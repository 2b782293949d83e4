use std::io;
use std::slice::Iter;

use derive_getters::{Dissolve, Getters};
use derive_more::Display;
use eyre::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::loc::{chrom, Interval};

/// A single fixed-width genomic bin: one chromosome plus a half-open interval.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug, Display, Dissolve, Getters)]
#[display("{chromosome}:{interval}")]
pub struct GenomicBin {
    chromosome: String,
    interval: Interval<u64>,
}

impl GenomicBin {
    /// The chromosome name is normalized to the canonical 'chr'-prefixed form.
    pub fn new(chromosome: impl AsRef<str>, interval: Interval<u64>) -> Self {
        Self {
            chromosome: chrom::normalize(chromosome.as_ref()),
            interval,
        }
    }
}

/// An ordered, immutable set of genomic bins tiled across a reference
/// assembly. Created once per pipeline run and consumed read-only by all
/// downstream analysis, including the heatmap renderer.
///
/// Invariants enforced at construction:
/// - at least one bin;
/// - bins sorted by chromosome rank, then by start position;
/// - within a chromosome, consecutive bins abut exactly (no overlap, no gap).
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Dissolve)]
pub struct GenomicBins {
    records: Vec<GenomicBin>,
}

impl GenomicBins {
    pub fn new(records: Vec<GenomicBin>) -> Result<Self> {
        ensure!(!records.is_empty(), "A bin set must contain at least one bin");
        for (prev, next) in records.iter().zip(records.iter().skip(1)) {
            if prev.chromosome() == next.chromosome() {
                ensure!(
                    prev.interval().end() == next.interval().start(),
                    "Bins on {} must abut: {} is followed by {}",
                    prev.chromosome(),
                    prev.interval(),
                    next.interval()
                );
            } else {
                ensure!(
                    chrom::compare(prev.chromosome(), next.chromosome()).is_lt(),
                    "Chromosomes must appear in genomic order: {} is followed by {}",
                    prev.chromosome(),
                    next.chromosome()
                );
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, ind: usize) -> Option<&GenomicBin> {
        self.records.get(ind)
    }

    pub fn iter(&self) -> Iter<'_, GenomicBin> {
        self.records.iter()
    }

    pub fn records(&self) -> &[GenomicBin] {
        &self.records
    }

    /// Run-length view of consecutive identical chromosome labels:
    /// ordered (chromosome, number of bins) pairs. This is the source for
    /// chromosome separators and band labels in the heatmap.
    pub fn chromosome_runs(&self) -> Vec<(&str, usize)> {
        let mut runs: Vec<(&str, usize)> = Vec::new();
        for bin in &self.records {
            match runs.last_mut() {
                Some((chromosome, count)) if *chromosome == bin.chromosome().as_str() => {
                    *count += 1
                }
                _ => runs.push((bin.chromosome(), 1)),
            }
        }
        runs
    }

    /// Serialize the layout as three-column BED records.
    pub fn write_bed(&self, writer: &mut impl io::Write) -> Result<()> {
        for bin in &self.records {
            writeln!(
                writer,
                "{}\t{}\t{}",
                bin.chromosome(),
                bin.interval().start(),
                bin.interval().end()
            )?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a GenomicBins {
    type Item = &'a GenomicBin;
    type IntoIter = Iter<'a, GenomicBin>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
impl GenomicBins {
    /// Two chromosomes, three 100 bp bins each, the last one truncated.
    pub fn dummy() -> Self {
        let mut records = Vec::new();
        for chromosome in ["chr1", "chr2"] {
            for (start, end) in [(0, 100), (100, 200), (200, 250)] {
                records.push(GenomicBin::new(
                    chromosome,
                    Interval::new(start, end).unwrap(),
                ));
            }
        }
        Self::new(records).unwrap()
    }
}
