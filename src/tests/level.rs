use super::SizeClusterer;
use crate::outline::{HeadingCandidate, OutlineEntry};

#[test]
fn test_equal_sizes_share_a_level() {
    let levels = SizeClusterer::default().levels(&[20, 20, 14, 20]);

    assert_eq!(levels[0], levels[1]);
    assert_eq!(levels[0], levels[3]);
    assert!(levels[2] > levels[0], "14 should nest under 20: {levels:?}");
    assert_eq!(levels, vec![1, 1, 2, 1]);
}

#[test]
fn test_one_unit_larger_joins_existing_cluster() {
    // 21 is within tolerance of 20, so it reuses that cluster
    let levels = SizeClusterer::default().levels(&[20, 21, 14]);
    assert_eq!(levels, vec![1, 1, 2]);
}

#[test]
fn test_one_unit_smaller_starts_deeper_cluster() {
    // Tolerance only looks downwards: 19 is not absorbed by an existing 20
    let levels = SizeClusterer::default().levels(&[20, 19]);
    assert_eq!(levels, vec![1, 2]);
}

#[test]
fn test_later_larger_size_renumbers_earlier_headings() {
    // The 24 only shows up after 18 and 12 were already emitted
    let levels = SizeClusterer::default().levels(&[18, 12, 24, 18, 12]);
    assert_eq!(levels, vec![2, 3, 1, 2, 3]);
}

#[test]
fn test_size_between_clusters_is_inserted_between_them() {
    let levels = SizeClusterer::default().levels(&[24, 12, 18, 12, 24]);
    assert_eq!(levels, vec![1, 3, 2, 3, 1]);
}

#[test]
fn test_zero_tolerance_separates_adjacent_sizes() {
    let levels = SizeClusterer::new(0).levels(&[20, 21]);
    assert_eq!(levels, vec![2, 1]);
}

#[test]
fn test_wider_tolerance_merges_more() {
    let levels = SizeClusterer::new(3).levels(&[14, 17, 12]);
    assert_eq!(levels, vec![1, 1, 2]);
}

#[test]
fn test_assign_drops_unsized_headings() {
    let candidates = vec![
        HeadingCandidate::sized("Title", Some(30)),
        HeadingCandidate::sized("Caption", None),
        HeadingCandidate::sized("Chapter", Some(20)),
        HeadingCandidate::sized("Flat", Some(0)),
        HeadingCandidate::sized("Section", Some(14)),
    ];

    let entries = SizeClusterer::default().assign(candidates);

    assert_eq!(
        entries,
        vec![
            OutlineEntry::new(1, "Title"),
            OutlineEntry::new(2, "Chapter"),
            OutlineEntry::new(3, "Section"),
        ]
    );
}

#[test]
fn test_empty_input() {
    assert!(SizeClusterer::default().levels(&[]).is_empty());
    assert!(SizeClusterer::default().assign(Vec::new()).is_empty());
}
