use eyre::{ensure, Result};
use log::debug;

use scnv_core_rs::bins::{GenomicBin, GenomicBins};
use scnv_core_rs::genome::Assembly;
use scnv_core_rs::loc::Interval;

use crate::reference::Reference;

/// Derive a fixed-width bin layout from a reference genome assembly.
///
/// `paths` and `names` identify the sequencing sources and samples of the
/// run; they are not interpreted here and come back untouched in the
/// returned [`Reference`]. The layout covers the canonical chromosome set
/// of the assembly (22 autosomes for human, 19 for mouse, plus chrX/chrY
/// when `include_sex`), tiled into contiguous `width_kb`-kilobase bins.
/// The last bin of each chromosome is truncated at the chromosome end.
///
/// Fails without computing anything if the assembly key is unknown or the
/// bin width is zero.
pub fn reference_bins(
    paths: impl IntoIterator<Item = impl Into<String>>,
    names: impl IntoIterator<Item = impl Into<String>>,
    assembly: &str,
    width_kb: u64,
    include_sex: bool,
) -> Result<Reference> {
    let assembly: Assembly = assembly.parse()?;
    ensure!(width_kb > 0, "Bin width must be a positive number of kilobases");

    let width = width_kb * 1_000;
    let mut records = Vec::new();
    for (chromosome, length) in assembly.chromosomes(include_sex) {
        let mut start = 0;
        while start < length {
            let end = (start + width).min(length);
            records.push(GenomicBin::new(chromosome, Interval::new(start, end)?));
            start = end;
        }
    }
    debug!(
        "Tiled {} into {} bins of {} kb (sex chromosomes: {})",
        assembly,
        records.len(),
        width_kb,
        include_sex
    );

    let bins = GenomicBins::new(records)?;
    Ok(Reference::new(
        paths.into_iter().map(Into::into).collect(),
        names.into_iter().map(Into::into).collect(),
        assembly,
        bins,
    ))
}
