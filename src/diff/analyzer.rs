use image::{GrayImage, Luma, Rgb, RgbImage, imageops};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use imageproc::rect::Rect;
use tracing::warn;

use crate::config::Configuration;
use crate::config::MainPage;
use crate::diff::regions::{self, Region};
use crate::diff::{ArtifactKind, DiffArtifactSet, PageArtifact};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const HIGHLIGHT: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_OUTLINE: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_FILL: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_FILL_ALPHA: u16 = 64;

/// Compare two same-size page bitmaps and build the requested artifact
/// images plus the significant-change count for the page.
///
/// `primary` is the bitmap of the configured main document; `secondary`
/// is the other side. If the bitmaps differ in size (possible only when
/// scaling is disabled), the secondary is resized to match and a
/// warning is logged; results may be visually misaligned.
///
/// `page_size` is the resolved target page size in inches, used to
/// normalize artifact dimensions when output scaling is disabled.
pub fn analyze(
    page_index: u32,
    primary: &RgbImage,
    secondary: &RgbImage,
    config: &Configuration,
    page_size: (f32, f32),
) -> crate::error::Result<DiffArtifactSet> {
    let resized;
    let secondary = if secondary.dimensions() == primary.dimensions() {
        secondary
    } else {
        warn!(
            "Page {} sizes don't match and the 'Scale Pages' setting is off, \
             attempting to match page sizes... results may be inaccurate.",
            page_index + 1
        );
        let (w, h) = primary.dimensions();
        resized = imageops::resize(secondary, w, h, imageops::FilterType::Triangle);
        &resized
    };

    let include = &config.include;

    let overlay = include
        .overlay
        .then(|| build_overlay(primary, secondary));

    let difference = include
        .difference
        .then(|| build_difference(primary, secondary));

    let mut change_count = 0u32;
    let markup = if include.markup {
        let (image, count) = build_markup(primary, secondary, config);
        change_count = count;
        Some(image)
    } else {
        None
    };

    // Canonical order: primary copy, secondary copy, markup, difference,
    // overlay. The primary/secondary labels follow the main-page flag.
    let (primary_kind, secondary_kind) = match config.main_page {
        MainPage::New => (ArtifactKind::NewCopy, ArtifactKind::OldCopy),
        MainPage::Old => (ArtifactKind::OldCopy, ArtifactKind::NewCopy),
    };
    let include_primary = match config.main_page {
        MainPage::New => include.new_copy,
        MainPage::Old => include.old_copy,
    };
    let include_secondary = match config.main_page {
        MainPage::New => include.old_copy,
        MainPage::Old => include.new_copy,
    };

    let mut artifacts = Vec::new();
    if include_primary {
        artifacts.push(PageArtifact {
            kind: primary_kind,
            image: primary.clone(),
        });
    }
    if include_secondary {
        artifacts.push(PageArtifact {
            kind: secondary_kind,
            image: secondary.clone(),
        });
    }
    if let Some(image) = markup {
        artifacts.push(PageArtifact {
            kind: ArtifactKind::Markup,
            image,
        });
    }
    if let Some(image) = difference {
        artifacts.push(PageArtifact {
            kind: ArtifactKind::Difference,
            image,
        });
    }
    if let Some(image) = overlay {
        artifacts.push(PageArtifact {
            kind: ArtifactKind::Overlay,
            image,
        });
    }

    // With scaling disabled the comparison ran at native resolution;
    // normalize the output size here so thresholds and areas were
    // applied to unscaled pixels.
    if !config.scale_output {
        let target_w = (page_size.0 * config.dpi as f32) as u32;
        let target_h = (page_size.1 * config.dpi as f32) as u32;
        if target_w > 0 && target_h > 0 {
            for artifact in &mut artifacts {
                if artifact.image.dimensions() != (target_w, target_h) {
                    artifact.image = imageops::resize(
                        &artifact.image,
                        target_w,
                        target_h,
                        imageops::FilterType::Triangle,
                    );
                }
            }
        }
    }

    Ok(DiffArtifactSet {
        page_index,
        artifacts,
        change_count,
    })
}

/// Content unique to the secondary page painted in the highlight color
/// over the primary page's content.
fn build_overlay(primary: &RgbImage, secondary: &RgbImage) -> RgbImage {
    let (w, h) = primary.dimensions();
    let mut out = RgbImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let a = *primary.get_pixel(x, y);
            let b = *secondary.get_pixel(x, y);
            let pixel = if a == WHITE {
                if b == WHITE { b } else { HIGHLIGHT }
            } else {
                a
            };
            out.put_pixel(x, y, pixel);
        }
    }
    out
}

/// Directional color-coded difference: material present only in the
/// primary page is blue ("removed"), material present only in the
/// secondary page is red ("added"), unchanged content is white. The
/// added layer wins at coincident non-white pixels.
fn build_difference(primary: &RgbImage, secondary: &RgbImage) -> RgbImage {
    let (w, h) = primary.dimensions();
    let mut out = RgbImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let a = primary.get_pixel(x, y).0;
            let b = secondary.get_pixel(x, y).0;
            // Inverted one-directional deltas: 255 means no change.
            // Dark material on a light background shows up in the
            // bright-minus-dark direction, so B - A flags content
            // present only in the primary page.
            let removed = 255 - subtract_luma(b, a);
            let added = 255 - subtract_luma(a, b);
            let pixel = if added < 255 {
                Rgb([255, added, added])
            } else if removed < 255 {
                Rgb([removed, removed, 255])
            } else {
                WHITE
            };
            out.put_pixel(x, y, pixel);
        }
    }
    out
}

/// Grayscale luminance of the channel-wise saturating difference a - b.
fn subtract_luma(a: [u8; 3], b: [u8; 3]) -> u8 {
    let r = a[0].saturating_sub(b[0]) as u32;
    let g = a[1].saturating_sub(b[1]) as u32;
    let bl = a[2].saturating_sub(b[2]) as u32;
    ((299 * r + 587 * g + 114 * bl) / 1000) as u8
}

/// Copy of the primary page with translucent highlight boxes around
/// consolidated change regions. Returns the image and the number of
/// significant regions.
fn build_markup(
    primary: &RgbImage,
    secondary: &RgbImage,
    config: &Configuration,
) -> (RgbImage, u32) {
    let mask = change_mask(primary, secondary, config.threshold);
    // Bridge near-adjacent changes before contour extraction.
    let mask = dilate(&mask, Norm::LInf, 1);

    let raw = regions::bounding_regions(&mask);
    let consolidated = regions::consolidate(&raw, config.merge_distance);
    let significant: Vec<Region> = consolidated
        .into_iter()
        .filter(|r| r.area() >= config.min_area as u64)
        .collect();

    let mut marked = primary.clone();
    let outline_width = (config.dpi / 100).max(1);
    for region in &significant {
        highlight_region(&mut marked, region, outline_width);
    }

    (marked, significant.len() as u32)
}

/// Binary mask of pixels whose absolute grayscale difference meets the
/// threshold.
fn change_mask(primary: &RgbImage, secondary: &RgbImage, threshold: u8) -> GrayImage {
    let (w, h) = primary.dimensions();
    let mut mask = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let a = primary.get_pixel(x, y).0;
            let b = secondary.get_pixel(x, y).0;
            let delta = absdiff_luma(a, b);
            if delta >= threshold {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }
    mask
}

fn absdiff_luma(a: [u8; 3], b: [u8; 3]) -> u8 {
    let r = a[0].abs_diff(b[0]) as u32;
    let g = a[1].abs_diff(b[1]) as u32;
    let bl = a[2].abs_diff(b[2]) as u32;
    ((299 * r + 587 * g + 114 * bl) / 1000) as u8
}

/// Translucent green fill plus a red outline whose width scales with
/// DPI so it stays visually proportionate at any resolution.
fn highlight_region(image: &mut RgbImage, region: &Region, outline_width: u32) {
    let (img_w, img_h) = image.dimensions();
    let x1 = (region.x + region.width).min(img_w);
    let y1 = (region.y + region.height).min(img_h);

    for y in region.y..y1 {
        for x in region.x..x1 {
            let pixel = image.get_pixel_mut(x, y);
            *pixel = blend(*pixel, BOX_FILL, BOX_FILL_ALPHA);
        }
    }

    for t in 0..outline_width {
        if region.width <= 2 * t || region.height <= 2 * t {
            break;
        }
        let rect = Rect::at((region.x + t) as i32, (region.y + t) as i32)
            .of_size(region.width - 2 * t, region.height - 2 * t);
        draw_hollow_rect_mut(image, rect, BOX_OUTLINE);
    }
}

fn blend(base: Rgb<u8>, over: Rgb<u8>, alpha: u16) -> Rgb<u8> {
    let mut out = [0u8; 3];
    for i in 0..3 {
        let v = (base.0[i] as u16 * (255 - alpha) + over.0[i] as u16 * alpha) / 255;
        out[i] = v as u8;
    }
    Rgb(out)
}
