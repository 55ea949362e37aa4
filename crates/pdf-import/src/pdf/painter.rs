use log::debug;

use crate::types::{Point, Shape};

use super::apertures::ApertureTable;
use super::bezier;
use super::geometry;
use super::operators::FillRule;
use super::path::{PaintSource, Subpaths};
use super::state::GraphicsState;

/// What a painting operator does with the consumed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    Stroke,
    Fill(FillRule),
    /// Fill first, then stroke the same subpaths.
    FillStroke(FillRule),
}

/// Turns consumed path buffers into area geometry filed under apertures.
#[derive(Debug, Clone)]
pub struct Painter {
    unit_factor: f64,
    steps: usize,
}

impl Painter {
    pub fn new(unit_factor: f64, steps: usize) -> Self {
        Self {
            unit_factor,
            steps: steps.max(2),
        }
    }

    pub fn paint(
        &self,
        op: PaintOp,
        source: &PaintSource,
        state: &GraphicsState,
        apertures: &mut ApertureTable,
    ) {
        // Width is resolved against the state at paint time, not at `w`
        let width = state.effective_width(self.unit_factor);
        let polylines = self.polylines(&source.subpaths);
        debug!(
            "PDF: {op:?} of {} subpath(s), width {width}",
            polylines.len()
        );

        match op {
            PaintOp::Stroke => self.stroke(&polylines, width, apertures),
            PaintOp::Fill(rule) => self.fill(&polylines, source, rule, width, apertures),
            PaintOp::FillStroke(rule) => {
                self.fill(&polylines, source, rule, width, apertures);
                self.stroke(&polylines, width, apertures);
            }
        }
    }

    fn polylines(&self, subpaths: &Subpaths) -> Vec<Vec<Point>> {
        match subpaths {
            Subpaths::Lines(list) | Subpaths::Rectangle(list) => list.clone(),
            Subpaths::Bezier(list) => list
                .iter()
                .map(|segments| bezier::flatten_chain(segments, self.steps))
                .collect(),
        }
    }

    fn stroke(&self, polylines: &[Vec<Point>], width: f64, apertures: &mut ApertureTable) {
        let shapes: Vec<Shape> = polylines
            .iter()
            .flat_map(|line| geometry::buffer_polyline(line, width / 2.0, self.steps))
            .collect();
        if shapes.is_empty() {
            debug!("PDF: stroke produced no area (width {width})");
        }
        apertures.add_stroke(width, shapes);
    }

    fn fill(
        &self,
        polylines: &[Vec<Point>],
        source: &PaintSource,
        rule: FillRule,
        width: f64,
        apertures: &mut ApertureTable,
    ) {
        let mut shapes: Vec<Shape> = Vec::new();
        for line in polylines {
            let mut ring = line.clone();
            if !source.closed {
                let closing = if source.from_path {
                    ring.first().copied()
                } else {
                    source.start_point
                };
                if let Some(p) = closing {
                    ring.push(p);
                }
            }
            shapes.extend(geometry::normalize_ring(&ring, rule));
        }
        apertures.add_fill(width, shapes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::apertures::FILL_APERTURE_ID;
    use crate::pdf::geometry::shape_area;

    fn state_with_width(line_width: f64) -> GraphicsState {
        GraphicsState {
            line_width,
            ..GraphicsState::default()
        }
    }

    fn total_area(shapes: &[Shape]) -> f64 {
        shapes.iter().map(shape_area).sum()
    }

    fn square_source(closed: bool) -> PaintSource {
        PaintSource {
            subpaths: Subpaths::Lines(vec![vec![
                [0.0, 0.0],
                [10.0, 0.0],
                [10.0, 10.0],
                [0.0, 10.0],
            ]]),
            from_path: false,
            closed,
            start_point: Some([0.0, 0.0]),
        }
    }

    #[test]
    fn test_stroke_files_under_width() {
        let painter = Painter::new(1.0, 16);
        let mut table = ApertureTable::default();
        let source = PaintSource {
            subpaths: Subpaths::Lines(vec![vec![[10.0, 10.0], [20.0, 10.0]]]),
            from_path: true,
            closed: true,
            start_point: Some([10.0, 10.0]),
        };
        painter.paint(PaintOp::Stroke, &source, &state_with_width(1.0), &mut table);

        let ap = table.get("1.0").unwrap();
        assert!((ap.size - 1.0).abs() < 1e-12);
        assert_eq!(ap.geometry.len(), 1);
        let area = total_area(&ap.geometry);
        assert!(area > 10.0 && area < 10.0 + std::f64::consts::PI * 0.25 + 1e-6);
    }

    #[test]
    fn test_stroke_width_scales_with_x_and_unit_factor() {
        let painter = Painter::new(0.5, 8);
        let mut table = ApertureTable::default();
        let state = GraphicsState {
            offset: [0.0, 0.0],
            scale: [4.0, 1.0],
            line_width: 1.0,
        };
        painter.paint(PaintOp::Stroke, &square_source(true), &state, &mut table);
        assert!(table.get("2.0").is_some());
    }

    #[test]
    fn test_fill_square() {
        let painter = Painter::new(1.0, 16);
        let mut table = ApertureTable::default();
        painter.paint(
            PaintOp::Fill(FillRule::NonZero),
            &square_source(false),
            &state_with_width(0.0),
            &mut table,
        );
        let ap = table.get(FILL_APERTURE_ID).unwrap();
        assert_eq!(ap.geometry.len(), 1);
        assert!((total_area(&ap.geometry) - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_fill_stroke_uses_both_apertures() {
        let painter = Painter::new(1.0, 8);
        let mut table = ApertureTable::default();
        painter.paint(
            PaintOp::FillStroke(FillRule::EvenOdd),
            &square_source(true),
            &state_with_width(2.0),
            &mut table,
        );
        let layer = table.take_layer();
        let ids: Vec<&str> = layer.apertures.keys().map(String::as_str).collect();
        assert_eq!(ids, vec![FILL_APERTURE_ID, "2.0"]);
    }

    #[test]
    fn test_zero_width_stroke_creates_no_aperture() {
        let painter = Painter::new(1.0, 8);
        let mut table = ApertureTable::default();
        painter.paint(
            PaintOp::Stroke,
            &square_source(true),
            &state_with_width(0.0),
            &mut table,
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_bezier_fill_closes_on_start_point() {
        let painter = Painter::new(1.0, 16);
        let mut table = ApertureTable::default();
        // Half disc: one curve from (-1, 0) over the top to (1, 0)
        let k = 4.0 / 3.0;
        let source = PaintSource {
            subpaths: Subpaths::Bezier(vec![vec![[
                [-1.0, 0.0],
                [-1.0, k],
                [1.0, k],
                [1.0, 0.0],
            ]]]),
            from_path: false,
            closed: false,
            start_point: Some([-1.0, 0.0]),
        };
        painter.paint(
            PaintOp::Fill(FillRule::NonZero),
            &source,
            &state_with_width(0.0),
            &mut table,
        );
        let ap = table.get(FILL_APERTURE_ID).unwrap();
        let area = total_area(&ap.geometry);
        assert!((area - std::f64::consts::PI / 2.0).abs() < 0.05, "area = {area}");
    }
}
