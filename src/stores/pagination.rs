//! Page windows over a materialized snapshot.

/// Returns the records of page `page` (zero based) when `snapshot` is split
/// into pages of `size` records.
///
/// A page past the end, or a `size` of zero, yields an empty page. The last
/// page may be partial.
pub fn paginate<T>(snapshot: Vec<T>, page: usize, size: usize) -> Vec<T> {
    let start = page.saturating_mul(size);
    if size == 0 || start >= snapshot.len() {
        return Vec::new();
    }
    snapshot.into_iter().skip(start).take(size).collect()
}

/// Number of pages needed for `total` records.
#[cfg(test)]
pub(crate) fn page_count(total: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    total.div_ceil(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        assert_eq!(paginate((0..25).collect(), 0, 10), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_partial_tail() {
        assert_eq!(paginate((0..25).collect(), 2, 10), vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        assert!(paginate((0..25).collect::<Vec<_>>(), 3, 10).is_empty());
        assert!(paginate((0..20).collect::<Vec<_>>(), 2, 10).is_empty());
    }

    #[test]
    fn test_zero_size_is_empty() {
        assert!(paginate((0..25).collect::<Vec<_>>(), 0, 0).is_empty());
        assert!(paginate((0..25).collect::<Vec<_>>(), 7, 0).is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(paginate(Vec::<u8>::new(), 0, 10).is_empty());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        assert!(paginate((0..5).collect::<Vec<_>>(), usize::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn test_pages_concatenate_to_snapshot() {
        let snapshot: Vec<u32> = (0..97).collect();
        for size in 1..=20 {
            let pages: Vec<u32> = (0..page_count(snapshot.len(), size))
                .flat_map(|page| paginate(snapshot.clone(), page, size))
                .collect();
            assert_eq!(pages, snapshot, "size {size}");
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(11, 0), 0);
    }
}
