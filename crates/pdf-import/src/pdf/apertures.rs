use indexmap::IndexMap;

use crate::types::{Aperture, ApertureKind, Layer, Shape};

/// Id of the aperture collecting filled areas. Stroke ids always carry a
/// decimal point, so they never collide with it.
pub const FILL_APERTURE_ID: &str = "0";

/// Aperture id for a stroke of the given effective width, e.g. `"1.0"`, `"0.35"`.
pub fn stroke_aperture_id(width: f64) -> String {
    let id = width.to_string();
    if id.contains('.') || !width.is_finite() {
        id
    } else {
        format!("{id}.0")
    }
}

/// Apertures of the layer currently being drawn, in first-use order.
#[derive(Debug, Default)]
pub struct ApertureTable {
    apertures: IndexMap<String, Aperture>,
}

impl ApertureTable {
    pub fn get(&self, id: &str) -> Option<&Aperture> {
        self.apertures.get(id)
    }

    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    /// Append stroked shapes to the aperture for `width`, creating it on first use.
    pub fn add_stroke(&mut self, width: f64, shapes: Vec<Shape>) {
        self.append(stroke_aperture_id(width), width, ApertureKind::Stroke, shapes);
    }

    /// Append filled shapes to the fill aperture. `size` is only recorded
    /// when the aperture is created.
    pub fn add_fill(&mut self, size: f64, shapes: Vec<Shape>) {
        self.append(FILL_APERTURE_ID.to_string(), size, ApertureKind::Fill, shapes);
    }

    fn append(&mut self, id: String, size: f64, kind: ApertureKind, shapes: Vec<Shape>) {
        if shapes.is_empty() {
            return;
        }
        self.apertures
            .entry(id)
            .or_insert_with(|| Aperture::new(size, kind))
            .geometry
            .extend(shapes);
    }

    /// Move the collected apertures out as a finished layer, leaving the table empty.
    pub fn take_layer(&mut self) -> Layer {
        Layer {
            apertures: std::mem::take(&mut self.apertures),
        }
    }
}
