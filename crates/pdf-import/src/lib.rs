pub mod error;
pub mod pdf;
pub mod types;

use error::ImportError;
use log::info;
use std::path::Path;
use types::Layer;

/// Output units for imported geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Millimeters,
    Inches,
}

impl Units {
    /// Output units per PDF point (1/72 inch).
    pub fn point_factor(self) -> f64 {
        match self {
            Units::Millimeters => 25.4 / 72.0,
            Units::Inches => 1.0 / 72.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub units: Units,
    /// Samples per Bézier segment, and segments per quarter circle when
    /// buffering strokes. Values below 2 act as 2.
    pub circle_steps: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            units: Units::Millimeters,
            circle_steps: 16,
        }
    }
}

/// Read a PDF file and import its vector drawing.
pub fn import(path: &Path, opts: &ImportOptions) -> Result<Vec<Layer>, ImportError> {
    let data = std::fs::read(path)?;
    let layers = import_bytes(&data, opts)?;
    for (index, layer) in layers.iter().enumerate() {
        info!(
            "{}: layer {index}: {} aperture(s), {} shape(s)",
            path.display(),
            layer.len(),
            layer.shape_count()
        );
    }
    Ok(layers)
}

/// Import from the bytes of a PDF file.
pub fn import_bytes(data: &[u8], opts: &ImportOptions) -> Result<Vec<Layer>, ImportError> {
    pdf::parse(data, opts)
}

/// Interpret decoded content-stream text directly. Never fails; input with
/// no drawing yields empty layers.
pub fn interpret_content(text: &str, opts: &ImportOptions) -> Vec<Layer> {
    pdf::interpret_text(text, opts)
}
