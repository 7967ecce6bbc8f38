//! Binary search over a sorted ring

/// Index of the first position `>= hash`, wrapping to index 0 when `hash`
/// lies above every position. `None` for an empty ring.
///
/// `positions` must be sorted ascending without duplicates.
pub fn ring_search(positions: &[u32], hash: u32) -> Option<usize> {
    let last = positions.len().checked_sub(1)?;

    if hash <= positions[0] || hash > positions[last] {
        return Some(0);
    }

    // positions[lo] < hash <= positions[hi]
    let (mut lo, mut hi) = (0, last);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if positions[mid] >= hash {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    Some(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RING: [u32; 3] = [10, 50, 90];

    #[test]
    fn test_empty() {
        assert_eq!(ring_search(&[], 42), None);
    }

    #[test]
    fn test_single_position() {
        assert_eq!(ring_search(&[7], 0), Some(0));
        assert_eq!(ring_search(&[7], 7), Some(0));
        assert_eq!(ring_search(&[7], u32::MAX), Some(0));
    }

    #[test]
    fn test_wraparound() {
        assert_eq!(ring_search(&RING, 95), Some(0));
        assert_eq!(ring_search(&RING, u32::MAX), Some(0));
        assert_eq!(ring_search(&RING, 0), Some(0));
    }

    #[test]
    fn test_inclusive_boundaries() {
        assert_eq!(ring_search(&RING, 10), Some(0));
        assert_eq!(ring_search(&RING, 50), Some(1));
        assert_eq!(ring_search(&RING, 90), Some(2));
    }

    #[test]
    fn test_between_positions() {
        assert_eq!(ring_search(&RING, 11), Some(1));
        assert_eq!(ring_search(&RING, 30), Some(1));
        assert_eq!(ring_search(&RING, 51), Some(2));
        assert_eq!(ring_search(&RING, 89), Some(2));
    }

    #[test]
    fn test_matches_partition_point() {
        let positions: Vec<u32> = (0..257).map(|i| i * 1_000 + 3).collect();
        for hash in (0..260_000).step_by(97) {
            let expected = positions.partition_point(|&p| p < hash) % positions.len();
            assert_eq!(ring_search(&positions, hash), Some(expected), "hash {}", hash);
        }
    }
}
