use image::{Rgb, RgbImage};
use pdf_compare::config::settings::Settings;
use pdf_compare::config::{Configuration, MainPage};
use pdf_compare::diff::ArtifactKind;
use pdf_compare::diff::analyzer::analyze;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

fn config_with(mutate: impl FnOnce(&mut Settings)) -> Configuration {
    let mut settings = Settings::default();
    mutate(&mut settings);
    Configuration::from_settings(&settings).expect("valid test settings")
}

fn white_page(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, WHITE)
}

fn fill_rect(image: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            image.put_pixel(x, y, color);
        }
    }
}

#[test]
fn test_identical_pages_yield_no_changes() {
    let mut page = white_page(60, 60);
    fill_rect(&mut page, 10, 10, 20, 20, BLACK);

    let config = config_with(|_| {});
    let set = analyze(0, &page, &page.clone(), &config, (1.0, 1.0)).expect("analyze");

    assert_eq!(set.change_count, 0, "identical bitmaps must report zero changes");

    let difference = set
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Difference)
        .expect("difference artifact included by default");
    assert!(
        difference.image.pixels().all(|p| *p == WHITE),
        "difference of identical pages must be entirely white"
    );

    let markup = set
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Markup)
        .expect("markup artifact included by default");
    assert_eq!(
        markup.image, page,
        "markup with no changes must be the unmodified primary page"
    );
}

#[test]
fn test_difference_colors_removed_material_blue() {
    // Content present only in the primary page.
    let mut primary = white_page(40, 40);
    fill_rect(&mut primary, 10, 10, 10, 10, BLACK);
    let secondary = white_page(40, 40);

    let config = config_with(|_| {});
    let set = analyze(0, &primary, &secondary, &config, (1.0, 1.0)).expect("analyze");

    let difference = &set
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Difference)
        .unwrap()
        .image;

    let p = difference.get_pixel(15, 15);
    assert_eq!(p.0[2], 255, "removed material keeps a full blue channel");
    assert!(p.0[0] < 255, "removed material must not be white");
    assert_eq!(p.0[0], p.0[1], "removed material is a blue colorization");
    assert_eq!(*difference.get_pixel(35, 35), WHITE, "unchanged area stays white");
}

#[test]
fn test_difference_colors_added_material_red() {
    // Content present only in the secondary page.
    let primary = white_page(40, 40);
    let mut secondary = white_page(40, 40);
    fill_rect(&mut secondary, 10, 10, 10, 10, BLACK);

    let config = config_with(|_| {});
    let set = analyze(0, &primary, &secondary, &config, (1.0, 1.0)).expect("analyze");

    let difference = &set
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Difference)
        .unwrap()
        .image;

    let p = difference.get_pixel(15, 15);
    assert_eq!(p.0[0], 255, "added material keeps a full red channel");
    assert!(p.0[1] < 255, "added material must not be white");
    assert_eq!(p.0[1], p.0[2], "added material is a red colorization");
}

#[test]
fn test_overlay_paints_secondary_only_content_red() {
    let mut primary = white_page(40, 40);
    fill_rect(&mut primary, 0, 0, 5, 5, BLACK);
    let mut secondary = white_page(40, 40);
    fill_rect(&mut secondary, 20, 20, 5, 5, Rgb([0, 128, 0]));

    let config = config_with(|_| {});
    let set = analyze(0, &primary, &secondary, &config, (1.0, 1.0)).expect("analyze");

    let overlay = &set
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Overlay)
        .unwrap()
        .image;

    assert_eq!(
        *overlay.get_pixel(22, 22),
        Rgb([255, 0, 0]),
        "secondary-only content must be painted in the highlight color"
    );
    assert_eq!(
        *overlay.get_pixel(2, 2),
        BLACK,
        "primary content must be kept as-is"
    );
    assert_eq!(*overlay.get_pixel(35, 5), WHITE, "blank area stays white");
}

#[test]
fn test_blank_secondary_page_overlay_is_primary_content_only() {
    // A missing trailing page rasterizes as blank white; the overlay is
    // then the primary page's own content over white.
    let mut primary = white_page(30, 30);
    fill_rect(&mut primary, 5, 5, 8, 8, BLACK);
    let secondary = white_page(30, 30);

    let config = config_with(|_| {});
    let set = analyze(2, &primary, &secondary, &config, (1.0, 1.0)).expect("analyze");
    assert_eq!(set.page_index, 2);

    let overlay = &set
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Overlay)
        .unwrap()
        .image;
    assert_eq!(*overlay.get_pixel(8, 8), BLACK);
    assert_eq!(*overlay.get_pixel(25, 25), WHITE);
}

#[test]
fn test_min_area_controls_significance() {
    // One changed region: 10x5 raw, grows by one pixel on each side
    // after dilation, so the consolidated area is 12x7 = 84.
    let primary = white_page(100, 100);
    let mut secondary = white_page(100, 100);
    fill_rect(&mut secondary, 40, 40, 10, 5, BLACK);

    let strict = config_with(|s| s.min_area = 100);
    let set = analyze(0, &primary, &secondary, &strict, (1.0, 1.0)).expect("analyze");
    assert_eq!(set.change_count, 0, "region below minimum area is not significant");

    let lenient = config_with(|s| s.min_area = 20);
    let set = analyze(0, &primary, &secondary, &lenient, (1.0, 1.0)).expect("analyze");
    assert_eq!(set.change_count, 1, "region above minimum area is significant");
}

#[test]
fn test_nearby_changes_consolidate_into_one_region() {
    let primary = white_page(200, 100);
    let mut secondary = white_page(200, 100);
    // Two squares with a 12-pixel horizontal gap, below merge_distance.
    fill_rect(&mut secondary, 20, 20, 10, 10, BLACK);
    fill_rect(&mut secondary, 42, 20, 10, 10, BLACK);

    let config = config_with(|s| {
        s.merge_distance = 50;
        s.min_area = 20;
    });
    let set = analyze(0, &primary, &secondary, &config, (1.0, 1.0)).expect("analyze");
    assert_eq!(set.change_count, 1, "nearby regions must merge into one change");

    let distant = config_with(|s| {
        s.merge_distance = 5;
        s.min_area = 20;
    });
    let set = analyze(0, &primary, &secondary, &distant, (1.0, 1.0)).expect("analyze");
    assert_eq!(set.change_count, 2, "a small merge distance keeps them separate");
}

#[test]
fn test_markup_highlights_change_region() {
    let primary = white_page(100, 100);
    let mut secondary = white_page(100, 100);
    fill_rect(&mut secondary, 40, 40, 20, 20, BLACK);

    let config = config_with(|s| s.min_area = 20);
    let set = analyze(0, &primary, &secondary, &config, (1.0, 1.0)).expect("analyze");
    assert_eq!(set.change_count, 1);

    let markup = &set
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Markup)
        .unwrap()
        .image;
    assert_ne!(
        *markup.get_pixel(50, 50),
        WHITE,
        "change region must be highlighted on the markup page"
    );
    assert_eq!(
        *markup.get_pixel(5, 5),
        WHITE,
        "area outside the change region stays untouched"
    );
}

#[test]
fn test_canonical_artifact_order_and_inclusion() {
    let page = white_page(20, 20);

    let all = config_with(|s| {
        s.new_copy = true;
        s.old_copy = true;
    });
    let set = analyze(0, &page, &page.clone(), &all, (1.0, 1.0)).expect("analyze");
    let kinds: Vec<ArtifactKind> = set.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ArtifactKind::NewCopy,
            ArtifactKind::OldCopy,
            ArtifactKind::Markup,
            ArtifactKind::Difference,
            ArtifactKind::Overlay,
        ],
        "artifacts must follow the canonical order"
    );

    let old_primary = config_with(|s| {
        s.new_copy = true;
        s.old_copy = true;
        s.main_page = MainPage::Old;
    });
    let set = analyze(0, &page, &page.clone(), &old_primary, (1.0, 1.0)).expect("analyze");
    let kinds: Vec<ArtifactKind> = set.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds[..2],
        [ArtifactKind::OldCopy, ArtifactKind::NewCopy],
        "primary copy comes first when the old document is primary"
    );

    let minimal = config_with(|s| {
        s.markup = false;
        s.difference = false;
    });
    let set = analyze(0, &page, &page.clone(), &minimal, (1.0, 1.0)).expect("analyze");
    let kinds: Vec<ArtifactKind> = set.artifacts.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ArtifactKind::Overlay], "flags control inclusion");
    assert_eq!(set.change_count, 0, "no markup means no counted regions");
}

#[test]
fn test_disabled_scaling_normalizes_artifact_size() {
    let primary = white_page(100, 100);
    let secondary = white_page(100, 100);

    let config = config_with(|s| {
        s.scale_output = false;
        s.dpi = 50;
    });
    let set = analyze(0, &primary, &secondary, &config, (1.0, 1.0)).expect("analyze");
    for artifact in &set.artifacts {
        assert_eq!(
            artifact.image.dimensions(),
            (50, 50),
            "artifacts must be resized to page size * dpi when scaling is off"
        );
    }
}

#[test]
fn test_size_mismatch_is_tolerated() {
    let mut primary = white_page(40, 40);
    fill_rect(&mut primary, 0, 0, 4, 4, BLACK);
    let secondary = white_page(20, 20);

    let config = config_with(|s| s.scale_output = false);
    let set = analyze(0, &primary, &secondary, &config, (40.0 / 300.0, 40.0 / 300.0))
        .expect("mismatched sizes must not fail the page");
    assert!(!set.artifacts.is_empty());
}
