//! Hierarchical clustering of cells by their copy-number profiles.
//!
//! The renderer only needs a display permutation and the merge tree for
//! the optional dendrogram panel, so the implementation is a plain
//! agglomerative pass over a working distance matrix: Euclidean distances
//! between cell profiles, average linkage via the Lance-Williams update.

use ndarray::Array2;
use rayon::prelude::*;

/// One agglomeration step. Leaves are nodes `0..n_leaves`; the node
/// created by merge `k` is `n_leaves + k`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub height: f64,
}

/// Merge tree plus the leaf order used to display cells.
#[derive(Clone, PartialEq, Debug)]
pub struct Dendrogram {
    n_leaves: usize,
    merges: Vec<Merge>,
    order: Vec<usize>,
}

impl Dendrogram {
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Permutation of the original cell indices in display order. Applied
    /// consistently to every per-cell panel of the heatmap.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Height of the final merge (0 when there is a single leaf).
    pub fn max_height(&self) -> f64 {
        self.merges.last().map_or(0.0, |merge| merge.height)
    }
}

/// Cluster the columns (cells) of a bins-by-cells matrix.
pub fn cluster_columns(matrix: &Array2<i32>) -> Dendrogram {
    let profiles: Vec<Vec<f64>> = matrix
        .columns()
        .into_iter()
        .map(|column| column.iter().map(|&v| v as f64).collect())
        .collect();
    agglomerate(pairwise_distances(&profiles))
}

fn euclidean(left: &[f64], right: &[f64]) -> f64 {
    left.iter()
        .zip(right)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

fn pairwise_distances(profiles: &[Vec<f64>]) -> Vec<Vec<f64>> {
    profiles
        .par_iter()
        .map(|left| profiles.iter().map(|right| euclidean(left, right)).collect())
        .collect()
}

struct Cluster {
    node: usize,
    members: Vec<usize>,
}

fn agglomerate(mut dist: Vec<Vec<f64>>) -> Dendrogram {
    let n = dist.len();
    let mut clusters: Vec<Option<Cluster>> = (0..n)
        .map(|i| {
            Some(Cluster {
                node: i,
                members: vec![i],
            })
        })
        .collect();
    let mut active: Vec<usize> = (0..n).collect();
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    while active.len() > 1 {
        // Closest pair of active clusters; ties resolve to the first pair
        // in scan order, keeping the result deterministic.
        let (mut best, mut slot_a, mut slot_b) = (f64::INFINITY, active[0], active[1]);
        for (i, &a) in active.iter().enumerate() {
            for &b in &active[i + 1..] {
                if dist[a][b] < best {
                    (best, slot_a, slot_b) = (dist[a][b], a, b);
                }
            }
        }

        // Lance-Williams average-linkage update of the surviving slot
        let size_a = clusters[slot_a].as_ref().unwrap().members.len() as f64;
        let size_b = clusters[slot_b].as_ref().unwrap().members.len() as f64;
        for &c in &active {
            if c == slot_a || c == slot_b {
                continue;
            }
            let updated = (dist[slot_a][c] * size_a + dist[slot_b][c] * size_b) / (size_a + size_b);
            dist[slot_a][c] = updated;
            dist[c][slot_a] = updated;
        }

        let absorbed = clusters[slot_b].take().unwrap();
        let survivor = clusters[slot_a].as_mut().unwrap();
        merges.push(Merge {
            left: survivor.node,
            right: absorbed.node,
            height: best,
        });
        survivor.members.extend(absorbed.members);
        survivor.node = n + merges.len() - 1;
        active.retain(|&slot| slot != slot_b);
    }

    let order = clusters[active[0]].take().unwrap().members;
    Dendrogram {
        n_leaves: n,
        merges,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use ndarray::array;

    #[test]
    fn test_single_cell() {
        let matrix = array![[2], [2], [3]];
        let dendrogram = cluster_columns(&matrix);
        assert_eq!(dendrogram.order(), &[0]);
        assert!(dendrogram.merges().is_empty());
        assert_eq!(dendrogram.max_height(), 0.0);
    }

    #[test]
    fn test_order_is_a_permutation() {
        let matrix = array![
            [2, 0, 2, 7, 2],
            [2, 0, 3, 7, 2],
            [1, 0, 2, 6, 1],
            [2, 1, 2, 7, 2]
        ];
        let dendrogram = cluster_columns(&matrix);
        assert_eq!(dendrogram.n_leaves(), 5);
        assert_eq!(dendrogram.merges().len(), 4);
        assert_eq!(
            dendrogram.order().iter().copied().sorted().collect_vec(),
            (0..5).collect_vec()
        );
    }

    #[test]
    fn test_identical_profiles_are_adjacent() {
        // Columns 0 and 3 are identical, far away from everything else
        let matrix = array![
            [0, 7, 4, 0],
            [0, 7, 5, 0],
            [0, 6, 4, 0],
        ];
        let dendrogram = cluster_columns(&matrix);

        let order = dendrogram.order();
        let zero = order.iter().position(|&c| c == 0).unwrap();
        let three = order.iter().position(|&c| c == 3).unwrap();
        assert_eq!(zero.abs_diff(three), 1);

        // Their merge comes first and at height zero
        assert_eq!(
            dendrogram.merges()[0],
            Merge {
                left: 0,
                right: 3,
                height: 0.0
            }
        );
    }

    #[test]
    fn test_two_blocks() {
        // Two tight groups: {0, 2} all-zero, {1, 3} all-seven
        let matrix = array![[0, 7, 0, 7], [0, 7, 0, 7]];
        let dendrogram = cluster_columns(&matrix);

        let order = dendrogram.order();
        let group = |cell: usize| order.iter().position(|&c| c == cell).unwrap() / 2;
        assert_eq!(group(0), group(2));
        assert_eq!(group(1), group(3));
        assert_ne!(group(0), group(1));

        // The last merge joins the two groups at their separation
        let top = dendrogram.merges().last().unwrap();
        assert!((top.height - (2.0 * 49.0f64).sqrt()).abs() < 1e-9);
        assert_eq!(dendrogram.max_height(), top.height);
    }

    #[test]
    fn test_heights_are_monotone() {
        let matrix = array![
            [1, 4, 1, 7, 0, 4],
            [2, 4, 1, 7, 0, 5],
            [1, 3, 1, 6, 1, 4]
        ];
        let dendrogram = cluster_columns(&matrix);
        assert!(dendrogram
            .merges()
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.height <= b.height));
    }
}
