use crate::types::{BezierSegment, Point};

/// Sample a cubic Bézier at `steps` evenly spaced parameters in `[0, 1)`.
///
/// `R(t) = P0(1-t)^3 + 3 P1 t(1-t)^2 + 3 P2 t^2(1-t) + P3 t^3`. The end
/// point itself (`t = 1`) is not part of the output. `steps` below 2 is
/// treated as 2.
pub fn flatten(segment: &BezierSegment, steps: usize) -> Vec<Point> {
    let steps = steps.max(2);
    let [start, c1, c2, stop] = *segment;
    (0..steps)
        .map(|k| {
            let t = k as f64 / steps as f64;
            let mt = 1.0 - t;
            let w0 = mt * mt * mt;
            let w1 = 3.0 * t * mt * mt;
            let w2 = 3.0 * t * t * mt;
            let w3 = t * t * t;
            [
                start[0] * w0 + c1[0] * w1 + c2[0] * w2 + stop[0] * w3,
                start[1] * w0 + c1[1] * w1 + c2[1] * w2 + stop[1] * w3,
            ]
        })
        .collect()
}

/// Flatten a chain of segments into one polyline, ending exactly on the
/// last segment's stop point.
pub fn flatten_chain(segments: &[BezierSegment], steps: usize) -> Vec<Point> {
    let mut points: Vec<Point> = segments.iter().flat_map(|s| flatten(s, steps)).collect();
    if let Some(last) = segments.last() {
        points.push(last[3]);
    }
    points
}
