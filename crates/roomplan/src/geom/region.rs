use nalgebra::Vector2;
use std::fmt;

use crate::model::{BBox, Orientation};

/// Numerical tolerance for containment and positive-area tests.
pub const EPS: f64 = 1e-9;

/// Closed axis-aligned rectangle `[min.x, max.x] × [min.y, max.y]`.
///
/// Invariants:
/// - `min <= max` componentwise; zero-width strips are allowed (corridors
///   clipped away by a wall) but never produced by `to_region`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

/// A bbox with a non-positive side cannot become a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegenerateBox {
    pub w: i32,
    pub h: i32,
}

impl fmt::Display for DegenerateBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width and height must be positive (got {} x {})",
            self.w, self.h
        )
    }
}

impl std::error::Error for DegenerateBox {}

/// Build the region covered by `bbox`.
pub fn to_region(bbox: &BBox) -> Result<Region, DegenerateBox> {
    if bbox.w <= 0 || bbox.h <= 0 {
        return Err(DegenerateBox {
            w: bbox.w,
            h: bbox.h,
        });
    }
    let min = Vector2::new(f64::from(bbox.x), f64::from(bbox.y));
    let size = Vector2::new(f64::from(bbox.w), f64::from(bbox.h));
    Ok(Region::new(min, min + size))
}

impl Region {
    #[inline]
    pub fn new(min: Vector2<f64>, max: Vector2<f64>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        (self.min + self.max) / 2.0
    }

    /// True if `other` lies inside `self` (boundary included).
    pub fn contains(&self, other: &Region) -> bool {
        other.min.x >= self.min.x - EPS
            && other.min.y >= self.min.y - EPS
            && other.max.x <= self.max.x + EPS
            && other.max.y <= self.max.y + EPS
    }

    /// Smallest region covering both.
    #[inline]
    pub fn hull(&self, other: &Region) -> Region {
        Region::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Strip of depth `depth` attached to the side that `facing` points at.
    pub fn expand_toward(&self, facing: Orientation, depth: f64) -> Region {
        match facing {
            Orientation::North => Region::new(
                Vector2::new(self.min.x, self.min.y - depth),
                Vector2::new(self.max.x, self.min.y),
            ),
            Orientation::South => Region::new(
                Vector2::new(self.min.x, self.max.y),
                Vector2::new(self.max.x, self.max.y + depth),
            ),
            Orientation::East => Region::new(
                Vector2::new(self.max.x, self.min.y),
                Vector2::new(self.max.x + depth, self.max.y),
            ),
            Orientation::West => Region::new(
                Vector2::new(self.min.x - depth, self.min.y),
                Vector2::new(self.min.x, self.max.y),
            ),
        }
    }

    /// Intersection with positive area, if any.
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let min = self.min.sup(&other.min);
        let max = self.max.inf(&other.max);
        if max.x - min.x > EPS && max.y - min.y > EPS {
            Some(Region::new(min, max))
        } else {
            None
        }
    }

    /// Part of `self` inside `bounds`; `None` when nothing with area remains.
    #[inline]
    pub fn clip_to(&self, bounds: &Region) -> Option<Region> {
        self.intersection(bounds)
    }
}

/// Per-axis separation `(gap_x, gap_y)`, each `>= 0`.
#[inline]
pub fn gaps(a: &Region, b: &Region) -> Vector2<f64> {
    let lo = a.min.sup(&b.min);
    let hi = a.max.inf(&b.max);
    (lo - hi).sup(&Vector2::zeros())
}

/// Area of the intersection; 0 for disjoint or edge-touching regions.
pub fn overlap_area(a: &Region, b: &Region) -> f64 {
    a.intersection(b).map_or(0.0, |r| r.area())
}

/// Area covered by at least one region; overlaps count once.
pub fn union_area(regions: &[Region]) -> f64 {
    let mut xs: Vec<f64> = regions.iter().flat_map(|r| [r.min.x, r.max.x]).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    let mut area = 0.0;
    for slab in xs.windows(2) {
        let (x0, x1) = (slab[0], slab[1]);
        let mut spans: Vec<(f64, f64)> = regions
            .iter()
            .filter(|r| r.min.x <= x0 && r.max.x >= x1)
            .map(|r| (r.min.y, r.max.y))
            .collect();
        spans.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut covered = 0.0;
        let mut reach = f64::NEG_INFINITY;
        for (lo, hi) in spans {
            let lo = lo.max(reach);
            if hi > lo {
                covered += hi - lo;
                reach = hi;
            }
        }
        area += covered * (x1 - x0);
    }
    area
}

/// Corridor heuristic: blocking if the regions overlap or if no separating
/// axis leaves a gap of at least `path_width`.
pub fn is_blocking(a: &Region, b: &Region, path_width: f64) -> bool {
    if overlap_area(a, b) > 0.0 {
        return true;
    }
    let g = gaps(a, b);
    g.x.max(g.y) < path_width
}

/// Euclidean distance between the two boundaries; 0 when they meet.
#[inline]
pub fn edge_distance(a: &Region, b: &Region) -> f64 {
    gaps(a, b).norm()
}

/// Open floor strictly between two regions that face each other along one
/// axis: projections overlap with positive length on the other axis and the
/// gap along the facing axis is positive. Diagonal neighbours have no facing
/// strip.
pub fn facing_gap(a: &Region, b: &Region) -> Option<Region> {
    let lo = a.min.sup(&b.min);
    let hi = a.max.inf(&b.max);
    let span = hi - lo;
    if span.x > EPS && span.y < -EPS {
        // Stacked north/south: the strip spans the shared x-interval.
        Some(Region::new(Vector2::new(lo.x, hi.y), Vector2::new(hi.x, lo.y)))
    } else if span.y > EPS && span.x < -EPS {
        Some(Region::new(Vector2::new(hi.x, lo.y), Vector2::new(lo.x, hi.y)))
    } else {
        None
    }
}
