use image::GrayImage;
use imageproc::contours::{self, BorderType};

/// Axis-aligned candidate change region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Bounding union of two regions.
    pub fn union(&self, other: &Region) -> Region {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        Region::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// True if the other region is contained in this one.
    pub fn contains(&self, other: &Region) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.x + self.width >= other.x + other.width
            && self.y + self.height >= other.y + other.height
    }

    /// True if the gap between the two regions is within `distance`
    /// along both axes. Overlapping regions have a negative gap.
    fn within_distance(&self, other: &Region, distance: u32) -> bool {
        let gap_x = (self.x.max(other.x) as i64)
            - ((self.x + self.width).min(other.x + other.width) as i64);
        let gap_y = (self.y.max(other.y) as i64)
            - ((self.y + self.height).min(other.y + other.height) as i64);
        gap_x <= distance as i64 && gap_y <= distance as i64
    }
}

/// Extract bounding rectangles of connected foreground regions from a
/// binary mask. Only outer contours are considered; contours without
/// points are discarded.
pub fn bounding_regions(mask: &GrayImage) -> Vec<Region> {
    let contours = contours::find_contours::<i32>(mask);
    let mut regions = Vec::new();

    for contour in contours {
        if contour.border_type != BorderType::Outer || contour.points.is_empty() {
            continue;
        }
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for point in &contour.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        regions.push(Region::new(
            min_x as u32,
            min_y as u32,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        ));
    }

    regions
}

/// Merge nearby regions into a minimal set of distinct change regions.
///
/// Greedy proximity merge: each region is merged into the first already
/// accepted region within `merge_distance` along both axes, otherwise
/// accepted as new. The pass repeats until no merge occurs, so the
/// result is a fixpoint: consolidating the output again yields the same
/// set, and every input region is contained in exactly one output
/// region's bounds.
pub fn consolidate(regions: &[Region], merge_distance: u32) -> Vec<Region> {
    let mut current: Vec<Region> = regions.to_vec();

    loop {
        let mut accepted: Vec<Region> = Vec::new();
        let mut merged_any = false;

        for region in &current {
            match accepted
                .iter_mut()
                .find(|existing| existing.within_distance(region, merge_distance))
            {
                Some(existing) => {
                    *existing = existing.union(region);
                    merged_any = true;
                }
                None => accepted.push(*region),
            }
        }

        if !merged_any {
            return accepted;
        }
        current = accepted;
    }
}
