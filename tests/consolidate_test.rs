use pdf_compare::diff::regions::{Region, consolidate};

#[test]
fn test_consolidate_empty_input() {
    let merged = consolidate(&[], 50);
    assert!(merged.is_empty());
}

#[test]
fn test_consolidate_merges_regions_within_distance() {
    // Horizontal gap of 10 is below the merge distance.
    let a = Region::new(0, 0, 20, 20);
    let b = Region::new(30, 0, 20, 20);

    let merged = consolidate(&[a, b], 50);
    assert_eq!(merged.len(), 1, "regions within distance should merge");
    assert_eq!(merged[0], Region::new(0, 0, 50, 20), "bounds should be the union of both");
}

#[test]
fn test_consolidate_keeps_distant_regions_separate() {
    let a = Region::new(0, 0, 10, 10);
    let b = Region::new(500, 500, 10, 10);

    let merged = consolidate(&[a, b], 50);
    assert_eq!(merged.len(), 2, "distant regions should stay separate");
}

#[test]
fn test_consolidate_is_idempotent() {
    let regions = vec![
        Region::new(0, 0, 20, 20),
        Region::new(25, 0, 20, 20),
        Region::new(300, 300, 10, 10),
        Region::new(320, 320, 10, 10),
        Region::new(900, 0, 5, 5),
    ];

    let once = consolidate(&regions, 30);
    let twice = consolidate(&once, 30);
    assert_eq!(once, twice, "consolidating its own output must be a fixpoint");
}

#[test]
fn test_consolidate_transitive_chain_collapses() {
    // Each neighbor is within distance of the next; a single greedy
    // pass would leave the chain partially merged, the fixpoint
    // iteration must collapse it fully.
    let regions = vec![
        Region::new(0, 0, 10, 10),
        Region::new(100, 0, 10, 10),
        Region::new(50, 0, 10, 10),
    ];

    let merged = consolidate(&regions, 45);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0], Region::new(0, 0, 110, 10));
}

#[test]
fn test_consolidate_covers_every_input_region() {
    let regions = vec![
        Region::new(3, 7, 11, 13),
        Region::new(40, 40, 6, 6),
        Region::new(44, 50, 9, 2),
        Region::new(200, 10, 30, 30),
    ];

    let merged = consolidate(&regions, 20);
    for input in &regions {
        assert!(
            merged.iter().any(|out| out.contains(input)),
            "input region {input:?} must be contained in some output region"
        );
    }
}

#[test]
fn test_consolidate_is_stable() {
    let regions = vec![
        Region::new(0, 0, 20, 20),
        Region::new(25, 0, 20, 20),
        Region::new(300, 300, 10, 10),
    ];

    let first = consolidate(&regions, 30);
    let second = consolidate(&regions, 30);
    assert_eq!(first, second, "same input must produce the same output");
}

#[test]
fn test_region_area_and_union() {
    let a = Region::new(10, 10, 5, 4);
    assert_eq!(a.area(), 20);

    let b = Region::new(0, 12, 8, 8);
    let u = a.union(&b);
    assert_eq!(u, Region::new(0, 10, 15, 10));
    assert!(u.contains(&a));
    assert!(u.contains(&b));
}
