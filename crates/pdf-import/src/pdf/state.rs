use log::debug;

use crate::types::Point;

/// Transform and pen context saved by `q` and restored by `Q`.
///
/// Only translation and axis scaling are tracked. The offset is in raw
/// user-space units and is applied before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsState {
    pub offset: [f64; 2],
    pub scale: [f64; 2],
    pub line_width: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: [1.0, 1.0],
            line_width: 0.0,
        }
    }
}

impl GraphicsState {
    /// Map a raw coordinate to output units: `(raw + offset) * unit_factor * scale`.
    pub fn to_output(&self, raw: [f64; 2], unit_factor: f64) -> Point {
        [
            (raw[0] + self.offset[0]) * unit_factor * self.scale[0],
            (raw[1] + self.offset[1]) * unit_factor * self.scale[1],
        ]
    }

    /// Map a raw extent (width, height) to output units. Extents are scaled
    /// but not offset.
    pub fn extent_to_output(&self, raw: [f64; 2], unit_factor: f64) -> [f64; 2] {
        [
            raw[0] * unit_factor * self.scale[0],
            raw[1] * unit_factor * self.scale[1],
        ]
    }

    /// Stroke width in output units.
    ///
    /// Only the horizontal scale factor is applied, so a path under unequal
    /// axis scaling strokes with its x-scaled width.
    pub fn effective_width(&self, unit_factor: f64) -> f64 {
        self.line_width * self.scale[0] * unit_factor
    }
}

/// Save/restore stack for [`GraphicsState`].
#[derive(Debug, Default)]
pub struct GraphicsStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl GraphicsStack {
    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        debug!(
            "PDF: save graphics state: offset={:?} scale={:?} width={}",
            self.current.offset, self.current.scale, self.current.line_width
        );
        self.saved.push(self.current);
    }

    /// Pop the most recently saved state. An empty stack leaves the current
    /// state untouched and returns `false`.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                debug!(
                    "PDF: restored graphics state: offset={:?} scale={:?} width={}",
                    state.offset, state.scale, state.line_width
                );
                true
            }
            None => {
                debug!("PDF: restore with empty graphics stack, nothing to restore");
                false
            }
        }
    }

    /// Apply a `cm` matrix `[a b c d e f]`.
    ///
    /// Translation is taken only when both scale components are exactly 1
    /// and some translation is present. Scaling is taken only when both
    /// scale components differ from 1. Shear terms are ignored.
    pub fn apply_matrix(&mut self, matrix: [f64; 6]) {
        let [sx, _, _, sy, dx, dy] = matrix;
        if sx == 1.0 && sy == 1.0 && (dx != 0.0 || dy != 0.0) {
            self.apply_translation(dx, dy);
        }
        if sx != 1.0 && sy != 1.0 {
            self.apply_scale(sx, sy);
        }
    }

    pub fn apply_translation(&mut self, dx: f64, dy: f64) {
        self.current.offset[0] += dx;
        self.current.offset[1] += dy;
        debug!("PDF: offset now {:?}", self.current.offset);
    }

    pub fn apply_scale(&mut self, sx: f64, sy: f64) {
        self.current.scale[0] *= sx;
        self.current.scale[1] *= sy;
        debug!("PDF: scale now {:?}", self.current.scale);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.current.line_width = width;
    }
}
