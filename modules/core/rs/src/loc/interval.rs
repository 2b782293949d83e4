use std::fmt::Display;
use std::ops::Range;

use crate::num::PrimInt;
use eyre::{eyre, Report, Result};
use serde::{Deserialize, Serialize};

/// Interval is a half-open genomic region [start, end).
/// It's not represented as a Rust-native Range for a couple of reasons:
/// - Prohibit 'empty' intervals (start == end) or intervals with negative length (start > end)
/// - Implement custom methods (e.g. contains, intersects, touches).
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

#[allow(clippy::len_without_is_empty)]
impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(eyre!("Invalid interval: start >= end"))
        }
    }

    /// Start position of the interval.
    #[inline(always)]
    pub fn start(&self) -> Idx {
        self.start
    }

    /// End position of the interval.
    #[inline(always)]
    pub fn end(&self) -> Idx {
        self.end
    }

    /// Length of the interval.
    pub fn len(&self) -> Idx {
        self.end - self.start
    }

    /// Check if the interval contains a given position.
    pub fn contains(&self, pos: Idx) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if the interval intersects with another interval.
    /// The condition is strict and doesn't allow touching intervals.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if the interval touches another interval.
    /// The condition is strict and should not allow overlapping intervals.
    pub fn touches(&self, other: &Self) -> bool {
        self.start == other.end || self.end == other.start
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}

impl<Idx: PrimInt + Display> Display for Interval<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<Idx: PrimInt> TryFrom<(Idx, Idx)> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: (Idx, Idx)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1)
    }
}

impl<Idx: PrimInt> From<Interval<Idx>> for (Idx, Idx) {
    fn from(interval: Interval<Idx>) -> Self {
        (interval.start, interval.end)
    }
}

impl<Idx: PrimInt> TryFrom<Range<Idx>> for Interval<Idx> {
    type Error = Report;

    fn try_from(value: Range<Idx>) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl<Idx: PrimInt> From<Interval<Idx>> for Range<Idx> {
    fn from(interval: Interval<Idx>) -> Self {
        interval.start..interval.end
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct() {
        assert_eq!(
            Interval::new(0, 10).unwrap(),
            Interval { start: 0, end: 10 }
        );
        assert!(Interval::new(1, 0).is_err());
        assert!(Interval::new(0, 0).is_err());
    }

    #[test]
    fn test_len() {
        assert_eq!(Interval::new(0, 10).unwrap().len(), 10);
        assert_eq!(Interval::new(0, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_contains() {
        let interval = Interval::new(1, 10).unwrap();
        assert!(!interval.contains(0));
        assert!(interval.contains(1));
        assert!(interval.contains(5));
        assert!(interval.contains(9));
        assert!(!interval.contains(10));
        assert!(!interval.contains(11));
    }

    #[test]
    fn test_intersects() {
        let interval = Interval::new(1, 10).unwrap();
        assert!(!interval.intersects(&Interval::new(0, 1).unwrap()));
        assert!(interval.intersects(&Interval::new(0, 2).unwrap()));
        assert!(interval.intersects(&Interval::new(5, 9).unwrap()));
        assert!(interval.intersects(&Interval::new(9, 10).unwrap()));
        assert!(!interval.intersects(&Interval::new(10, 11).unwrap()));
    }

    #[test]
    fn test_touches() {
        let interval = Interval::new(1, 10).unwrap();
        assert!(interval.touches(&Interval::new(0, 1).unwrap()));
        assert!(!interval.touches(&Interval::new(0, 2).unwrap()));
        assert!(!interval.touches(&Interval::new(5, 9).unwrap()));
        assert!(interval.touches(&Interval::new(10, 11).unwrap()));
    }

    #[test]
    fn test_intersection() {
        let interval = Interval::new(1, 10).unwrap();
        assert_eq!(interval.intersection(&Interval::new(0, 1).unwrap()), None);
        assert_eq!(
            interval.intersection(&Interval::new(0, 2).unwrap()),
            Some(Interval { start: 1, end: 2 })
        );
        assert_eq!(
            interval.intersection(&Interval::new(9, 11).unwrap()),
            Some(Interval { start: 9, end: 10 })
        );
        assert_eq!(interval.intersection(&Interval::new(10, 11).unwrap()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::new(5, 25).unwrap().to_string(), "[5, 25)");
    }

    #[test]
    fn test_conversions() {
        let interval = Interval::new(1u64, 10).unwrap();
        assert_eq!(Interval::try_from((1u64, 10)).unwrap(), interval);
        assert_eq!(Interval::try_from(1u64..10).unwrap(), interval);
        assert_eq!(<(u64, u64)>::from(interval), (1, 10));
        assert_eq!(Range::from(interval), 1..10);
        assert!(Interval::try_from((10u64, 1)).is_err());
    }
}
