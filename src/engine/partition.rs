//! Even, contiguous index-range partitioning for fixed worker pools.

use std::ops::Range;

/// Split `0..len` into `parts` contiguous, disjoint ranges.
///
/// Range `i` is `[i*len/parts, (i+1)*len/parts)`, so sizes differ by at most
/// one and the ranges cover `0..len` exactly. When `parts > len` some ranges
/// are empty. `parts == 0` yields no ranges.
///
/// # Example
///
/// ```rust
/// use parallels::engine::partition::even_ranges;
///
/// assert_eq!(even_ranges(10, 3), vec![0..3, 3..6, 6..10]);
/// ```
#[must_use]
pub fn even_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    (0..parts)
        .map(|i| (i * len / parts)..((i + 1) * len / parts))
        .collect()
}

/// Split a mutable slice into consecutive chunks of the given lengths.
///
/// Lengths must sum to at most `slice.len()`; trailing elements beyond the
/// sum are left out.
pub(crate) fn split_by_lengths<'a, T>(
    mut slice: &'a mut [T],
    lengths: impl IntoIterator<Item = usize>,
) -> Vec<&'a mut [T]> {
    let mut chunks = Vec::new();
    for len in lengths {
        let (head, tail) = std::mem::take(&mut slice).split_at_mut(len);
        chunks.push(head);
        slice = tail;
    }
    chunks
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ranges are contiguous, disjoint and cover exactly 0..len.
        #[test]
        fn prop_ranges_cover_exactly(len in 0usize..10_000, parts in 1usize..64) {
            let ranges = even_ranges(len, parts);
            prop_assert_eq!(ranges.len(), parts);
            let mut next = 0;
            for r in &ranges {
                prop_assert_eq!(r.start, next);
                prop_assert!(r.end >= r.start);
                next = r.end;
            }
            prop_assert_eq!(next, len);
        }

        /// Sizes never differ by more than one.
        #[test]
        fn prop_balanced(len in 0usize..10_000, parts in 1usize..64) {
            let sizes: Vec<usize> = even_ranges(len, parts).iter().map(ExactSizeIterator::len).collect();
            let min = sizes.iter().copied().min().unwrap_or(0);
            let max = sizes.iter().copied().max().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
