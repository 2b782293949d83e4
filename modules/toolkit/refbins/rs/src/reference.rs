use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use scnv_core_rs::bins::GenomicBins;
use scnv_core_rs::genome::Assembly;

/// Output of the bin layout generator: the caller-supplied sequencing
/// sources and sample names, passed through untouched, plus the bin layout
/// computed for the requested assembly.
///
/// The paths and names are opaque here; pairing them up and reading the
/// actual data is the concern of the downstream inference pipeline.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Constructor, Dissolve, Getters)]
pub struct Reference {
    paths: Vec<String>,
    names: Vec<String>,
    assembly: Assembly,
    bins: GenomicBins,
}

#[cfg(test)]
impl Reference {
    pub fn dummy() -> Self {
        use scnv_core_rs::bins::GenomicBin;
        use scnv_core_rs::loc::Interval;

        let bins = GenomicBins::new(
            ["chr1", "chr2"]
                .into_iter()
                .flat_map(|chromosome| {
                    [(0, 100), (100, 200), (200, 250)].map(|(start, end)| {
                        GenomicBin::new(chromosome, Interval::new(start, end).unwrap())
                    })
                })
                .collect(),
        )
        .unwrap();

        Self::new(
            vec!["run1.bam".to_owned(), "run2.bam".to_owned()],
            vec!["cellA".to_owned(), "cellB".to_owned()],
            Assembly::Hg19,
            bins,
        )
    }
}
