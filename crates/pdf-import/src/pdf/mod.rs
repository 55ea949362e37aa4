pub mod apertures;
pub mod bezier;
pub mod geometry;
pub mod interpreter;
pub mod layers;
pub mod operators;
pub mod painter;
pub mod path;
pub mod state;
pub mod stream;

use log::debug;

use crate::error::ImportError;
use crate::types::Layer;
use crate::ImportOptions;

/// Parse a PDF file's vector content into layers.
pub fn parse(data: &[u8], opts: &ImportOptions) -> Result<Vec<Layer>, ImportError> {
    let text = stream::decode_content(data)?;
    let layers = interpret_text(&text, opts);
    if layers.iter().all(Layer::is_empty) {
        return Err(ImportError::NoGeometry);
    }
    Ok(layers)
}

/// Interpret already decoded content-stream text.
pub fn interpret_text(text: &str, opts: &ImportOptions) -> Vec<Layer> {
    debug!(
        "PDF: interpreting {} bytes of content, point factor {}",
        text.len(),
        opts.units.point_factor()
    );
    interpreter::interpret(lines(text), opts.units.point_factor(), opts.circle_steps)
}

/// Split content text into lines on `\n`, `\r\n` or `\r`. Empty lines are dropped.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r']).filter(|line| !line.is_empty())
}
