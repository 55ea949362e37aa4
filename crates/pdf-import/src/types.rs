use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::pdf::geometry;

/// A coordinate pair in output units (offset, scale and point factor applied).
pub type Point = [f64; 2];

/// Closed ring of points. The closing point is not repeated.
pub type Ring = Vec<Point>;

/// Area shape: the first ring is the exterior, any further rings are holes.
pub type Shape = Vec<Ring>;

/// One cubic Bézier segment as `[start, c1, c2, stop]`.
pub type BezierSegment = [Point; 4];

/// Round a float to N decimal places.
pub fn round_f64(v: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (v * factor).round() / factor
}

/// Wrapper that rounds f64 to 6 decimal places on serialization.
fn serialize_f64_rounded<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(round_f64(*v, 6))
}

fn serialize_shapes<S: Serializer>(shapes: &[Shape], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(shapes.iter().map(|shape| {
        shape
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|p| [round_f64(p[0], 6), round_f64(p[1], 6)])
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
    }))
}

// ─── Apertures ───────────────────────────────────────────────────────

/// Whether an aperture collects stroked lines or filled areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApertureKind {
    Stroke,
    Fill,
}

/// Aperture template. Every imported aperture is circular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ApertureShape {
    #[default]
    #[serde(rename = "C")]
    Circle,
}

/// Accumulated output geometry sharing one pen width and kind.
#[derive(Debug, Clone, Serialize)]
pub struct Aperture {
    #[serde(serialize_with = "serialize_f64_rounded")]
    pub size: f64,
    #[serde(rename = "type")]
    pub shape: ApertureShape,
    pub kind: ApertureKind,
    #[serde(serialize_with = "serialize_shapes")]
    pub geometry: Vec<Shape>,
}

impl Aperture {
    pub fn new(size: f64, kind: ApertureKind) -> Self {
        Self {
            size,
            shape: ApertureShape::Circle,
            kind,
            geometry: Vec::new(),
        }
    }
}

// ─── Layers ──────────────────────────────────────────────────────────

/// One run of drawing sharing a single stroke color, keyed by aperture id
/// in first-use order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Layer {
    pub apertures: IndexMap<String, Aperture>,
}

impl Layer {
    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    pub fn get(&self, id: &str) -> Option<&Aperture> {
        self.apertures.get(id)
    }

    /// Total number of shapes across all apertures.
    pub fn shape_count(&self) -> usize {
        self.apertures.values().map(|ap| ap.geometry.len()).sum()
    }

    /// Union of every shape in the layer, merged into non-overlapping areas.
    pub fn solid_geometry(&self) -> Vec<Shape> {
        let shapes: Vec<Shape> = self
            .apertures
            .values()
            .flat_map(|ap| ap.geometry.iter().cloned())
            .collect();
        geometry::union_all(&shapes)
    }

    pub fn solid(&self) -> SolidLayer {
        SolidLayer {
            geometry: self.solid_geometry(),
        }
    }
}

/// A layer flattened to one merged area, the form handed on to object creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolidLayer {
    #[serde(serialize_with = "serialize_shapes")]
    pub geometry: Vec<Shape>,
}
