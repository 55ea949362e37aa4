//! Area geometry used by the painter: stroke buffering, fill-ring cleanup and
//! union. Boolean work is delegated to `i_overlay`; everything else is plain
//! polygon construction.

use std::f64::consts::PI;

use i_overlay::core::fill_rule::FillRule as OverlayFillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use crate::types::{Point, Ring, Shape};

use super::operators::FillRule;

impl From<FillRule> for OverlayFillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::NonZero => OverlayFillRule::NonZero,
            FillRule::EvenOdd => OverlayFillRule::EvenOdd,
        }
    }
}

/// Run the shapes through a union with nothing, which resolves overlaps and
/// self-intersections under `rule` and drops zero-area pieces.
fn normalize(shapes: Vec<Shape>, rule: OverlayFillRule) -> Vec<Shape> {
    if shapes.is_empty() {
        return Vec::new();
    }
    let empty: Vec<Shape> = Vec::new();
    shapes
        .overlay(&empty, OverlayRule::Union, rule)
        .into_iter()
        .filter(|shape| !shape.is_empty())
        .collect()
}

/// Buffer a polyline by `half_width` with round caps and joins.
///
/// `steps` is the number of segments used per quarter circle. A non-positive
/// width or an empty polyline produces no area.
pub fn buffer_polyline(points: &[Point], half_width: f64, steps: usize) -> Vec<Shape> {
    if half_width <= 0.0 || !half_width.is_finite() {
        return Vec::new();
    }

    let mut vertices: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if vertices.last() != Some(p) {
            vertices.push(*p);
        }
    }
    if vertices.is_empty() {
        return Vec::new();
    }

    let mut contours: Vec<Shape> = Vec::with_capacity(vertices.len() * 2);
    for pair in vertices.windows(2) {
        if let Some(quad) = segment_quad(pair[0], pair[1], half_width) {
            contours.push(vec![quad]);
        }
    }
    for v in &vertices {
        contours.push(vec![circle_ring(*v, half_width, steps)]);
    }

    normalize(contours, OverlayFillRule::NonZero)
}

/// Clean up a fill ring: resolve self-touching and self-intersecting edges
/// under the operator's fill rule. Rings with fewer than three distinct
/// points have no area and produce nothing.
pub fn normalize_ring(ring: &[Point], rule: FillRule) -> Vec<Shape> {
    let contour = open_contour(ring);
    let mut distinct: Vec<Point> = Vec::with_capacity(3);
    for p in &contour {
        if !distinct.contains(p) {
            distinct.push(*p);
        }
        if distinct.len() >= 3 {
            break;
        }
    }
    if distinct.len() < 3 {
        return Vec::new();
    }
    normalize(vec![vec![contour]], rule.into())
}

/// Drop consecutive duplicates and the repeated closing point. Overlay
/// contours are implicitly closed.
fn open_contour(ring: &[Point]) -> Ring {
    let mut contour: Ring = Vec::with_capacity(ring.len());
    for p in ring {
        if contour.last() != Some(p) {
            contour.push(*p);
        }
    }
    while contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    contour
}

/// Merge shapes into non-overlapping areas.
pub fn union_all(shapes: &[Shape]) -> Vec<Shape> {
    normalize(shapes.to_vec(), OverlayFillRule::NonZero)
}

/// Unsigned area enclosed by a ring (shoelace formula).
pub fn ring_area(ring: &[Point]) -> f64 {
    signed_area(ring).abs()
}

/// Area of a shape: exterior minus holes.
pub fn shape_area(shape: &Shape) -> f64 {
    match shape.split_first() {
        Some((exterior, holes)) => {
            ring_area(exterior) - holes.iter().map(|h| ring_area(h)).sum::<f64>()
        }
        None => 0.0,
    }
}

fn signed_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum / 2.0
}

/// Rectangle around the segment `a`-`b`, counter-clockwise.
fn segment_quad(a: Point, b: Point, half_width: f64) -> Option<Ring> {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    let nx = -dy / len * half_width;
    let ny = dx / len * half_width;
    let mut quad = vec![
        [a[0] - nx, a[1] - ny],
        [b[0] - nx, b[1] - ny],
        [b[0] + nx, b[1] + ny],
        [a[0] + nx, a[1] + ny],
    ];
    if signed_area(&quad) < 0.0 {
        quad.reverse();
    }
    Some(quad)
}

/// Counter-clockwise circle approximation with `4 * steps` segments.
fn circle_ring(center: Point, radius: f64, steps: usize) -> Ring {
    let n = steps.max(1) * 4;
    (0..n)
        .map(|k| {
            let a = 2.0 * PI * (k as f64) / (n as f64);
            [center[0] + radius * a.cos(), center[1] + radius * a.sin()]
        })
        .collect()
}
