use log::{debug, trace};

use crate::types::Layer;

use super::apertures::ApertureTable;
use super::layers::LayerSegmenter;
use super::operators::{self, Operator};
use super::painter::{PaintOp, Painter};
use super::path::PathBuilder;
use super::state::GraphicsStack;
#[cfg(test)]
use super::state::GraphicsState;

/// Content-stream state machine. Walks operator lines and files painted
/// geometry into per-color layers.
///
/// All state is owned by one pass, so separate streams can be interpreted
/// on separate threads. Lines may be fed incrementally.
pub struct Interpreter {
    unit_factor: f64,
    stack: GraphicsStack,
    path: PathBuilder,
    painter: Painter,
    apertures: ApertureTable,
    segmenter: LayerSegmenter,
}

impl Interpreter {
    /// `unit_factor` converts points to output units; `steps` is the Bézier
    /// and arc resolution.
    pub fn new(unit_factor: f64, steps: usize) -> Self {
        Self {
            unit_factor,
            stack: GraphicsStack::default(),
            path: PathBuilder::new(),
            painter: Painter::new(unit_factor, steps),
            apertures: ApertureTable::default(),
            segmenter: LayerSegmenter::new(),
        }
    }

    #[cfg(test)]
    fn state(&self) -> &GraphicsState {
        self.stack.current()
    }

    #[cfg(test)]
    fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    #[cfg(test)]
    fn path(&self) -> &PathBuilder {
        &self.path
    }

    #[cfg(test)]
    fn apertures(&self) -> &ApertureTable {
        &self.apertures
    }

    /// Classify and apply one line. Lines that match no operator are skipped.
    pub fn feed_line(&mut self, line: &str) {
        match operators::classify(line) {
            Some(op) => self.process(op),
            None => {
                if !line.trim().is_empty() {
                    trace!("PDF: skipped line {line:?}");
                }
            }
        }
    }

    pub fn process(&mut self, op: Operator) {
        match op {
            Operator::Transform { save, matrix } => {
                if save {
                    self.stack.save();
                }
                self.stack.apply_matrix(matrix);
            }
            Operator::Save => self.stack.save(),
            Operator::Restore => {
                self.stack.restore();
            }
            Operator::MoveTo(raw) => {
                let p = self.to_output(raw);
                self.path.move_to(p);
            }
            Operator::LineTo(raw) => {
                let p = self.to_output(raw);
                self.path.line_to(p);
            }
            Operator::CurveC { c1, c2, end } => {
                let (c1, c2, end) = (self.to_output(c1), self.to_output(c2), self.to_output(end));
                self.path.curve_to(c1, c2, end);
            }
            Operator::CurveV { c2, end } => {
                let (c2, end) = (self.to_output(c2), self.to_output(end));
                self.path.curve_v(c2, end);
            }
            Operator::CurveY { c1, end } => {
                let (c1, end) = (self.to_output(c1), self.to_output(end));
                self.path.curve_y(c1, end);
            }
            Operator::Rect { origin, size } => {
                let origin = self.to_output(origin);
                let size = self.stack.current().extent_to_output(size, self.unit_factor);
                self.path.rectangle(origin, size);
            }
            Operator::Clip => self.path.clip(),
            Operator::ClosePath => self.path.close(),
            Operator::SetWidth(w) => self.stack.set_line_width(w),
            Operator::NoOp => self.path.discard(),
            Operator::Stroke { close } => {
                if close {
                    self.path.close();
                }
                self.paint(PaintOp::Stroke);
            }
            Operator::Fill(rule) => self.paint(PaintOp::Fill(rule)),
            Operator::FillStroke { close, rule } => {
                if close {
                    self.path.close();
                }
                self.paint(PaintOp::FillStroke(rule));
            }
            Operator::StrokeColor(color) => {
                self.segmenter.observe_color(color, &mut self.apertures);
            }
        }
    }

    fn to_output(&self, raw: [f64; 2]) -> [f64; 2] {
        self.stack.current().to_output(raw, self.unit_factor)
    }

    fn paint(&mut self, op: PaintOp) {
        match self.path.take_for_paint() {
            Some(source) => {
                self.painter
                    .paint(op, &source, self.stack.current(), &mut self.apertures)
            }
            None => debug!("PDF: {op:?} with no constructed geometry, nothing painted"),
        }
    }

    /// End the pass: archive the trailing layer and return all layers in
    /// encounter order.
    pub fn finish(mut self) -> Vec<Layer> {
        self.segmenter.finish(&mut self.apertures)
    }
}

/// Interpret a whole sequence of decoded content-stream lines.
pub fn interpret<'a, I>(lines: I, unit_factor: f64, steps: usize) -> Vec<Layer>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut interpreter = Interpreter::new(unit_factor, steps);
    for line in lines {
        interpreter.feed_line(line);
    }
    interpreter.finish()
}
