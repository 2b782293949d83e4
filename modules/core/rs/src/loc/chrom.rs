use std::cmp::Ordering;

/// Position of a chromosome in the conventional karyotype order.
/// Numbered autosomes come first, then chrX and chrY, then everything else
/// (scaffolds, patches) in lexicographic order.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Rank {
    Numbered(u32),
    X,
    Y,
    Other(String),
}

/// Normalize a chromosome name to the canonical 'chr'-prefixed form.
/// The payload is kept as-is ("1" -> "chr1", "X" -> "chrX", "chrX" -> "chrX");
/// only the prefix spelling is canonicalized.
pub fn normalize(name: &str) -> String {
    let payload = strip_prefix(name);
    format!("chr{payload}")
}

/// Total order used for genomic sorting of chromosome names.
pub fn rank(name: &str) -> Rank {
    let payload = strip_prefix(name);
    if let Ok(number) = payload.parse::<u32>() {
        return Rank::Numbered(number);
    }
    match payload {
        "X" | "x" => Rank::X,
        "Y" | "y" => Rank::Y,
        _ => Rank::Other(payload.to_owned()),
    }
}

/// Compare two chromosome names by genomic order.
pub fn compare(left: &str, right: &str) -> Ordering {
    rank(left).cmp(&rank(right))
}

fn strip_prefix(name: &str) -> &str {
    if name.len() >= 3 && name[..3].eq_ignore_ascii_case("chr") {
        &name[3..]
    } else {
        name
    }
}
