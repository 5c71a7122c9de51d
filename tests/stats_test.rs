use std::path::Path;

use pdf_compare::stats::StatisticsAccumulator;

fn accumulator(total_pages: u32) -> StatisticsAccumulator {
    StatisticsAccumulator::new(
        total_pages,
        Path::new("drawings/plan_new.pdf"),
        Path::new("drawings/plan_old.pdf"),
        Path::new("drawings/plan_new.pdf"),
    )
}

#[test]
fn test_total_equals_sum_of_page_counts() {
    let mut stats = accumulator(5);
    stats.record(0, 3);
    stats.record(1, 0);
    stats.record(2, 7);
    stats.record(4, 1);

    assert_eq!(stats.total_changes(), 11);

    let report = stats.finalize();
    assert!(report.contains("Total Differences: 11"));
}

#[test]
fn test_report_shape() {
    let mut stats = accumulator(3);
    stats.record(1, 2);

    let report = stats.finalize();
    assert!(report.starts_with("Document Comparison Report\n"));
    assert!(report.contains("Total Pages: 3"));
    assert!(report.contains("Files Compared:"));
    assert!(report.contains("    drawings/plan_new.pdf"));
    assert!(report.contains("    drawings/plan_old.pdf"));
    assert!(report.contains("Main Page: drawings/plan_new.pdf"));
    assert!(report.contains("Pages with differences:"));
    assert!(report.contains("    Page 2 Changes: 2"), "page numbers are 1-based");
}

#[test]
fn test_pages_without_changes_are_omitted() {
    let mut stats = accumulator(4);
    stats.record(0, 0);
    stats.record(1, 0);

    let report = stats.finalize();
    assert_eq!(stats.total_changes(), 0);
    assert!(report.contains("Total Differences: 0"));
    assert!(!report.contains("Page 1 Changes"));
    assert!(!report.contains("Page 2 Changes"));
}

#[test]
fn test_per_page_lines_in_ascending_order() {
    // Recording order must not matter for the rendered report.
    let mut stats = accumulator(10);
    stats.record(7, 1);
    stats.record(2, 4);
    stats.record(5, 2);

    let report = stats.finalize();
    let page3 = report.find("Page 3 Changes: 4").expect("page 3 line");
    let page6 = report.find("Page 6 Changes: 2").expect("page 6 line");
    let page8 = report.find("Page 8 Changes: 1").expect("page 8 line");
    assert!(page3 < page6 && page6 < page8, "lines must be in ascending page order");
}
