use log::debug;

use crate::types::Layer;

use super::apertures::ApertureTable;

/// Splits the output into layers at every change of stroke color.
#[derive(Debug, Default)]
pub struct LayerSegmenter {
    last_color: Option<[f64; 3]>,
    layers: Vec<Layer>,
}

impl LayerSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn archived(&self) -> usize {
        self.layers.len()
    }

    /// Observe an `RG` color. On a change, the table's apertures become the
    /// next layer and the table starts over empty. The first color always
    /// counts as a change. Returns whether a layer was archived.
    pub fn observe_color(&mut self, color: [f64; 3], apertures: &mut ApertureTable) -> bool {
        if self.last_color == Some(color) {
            return false;
        }
        self.last_color = Some(color);
        self.layers.push(apertures.take_layer());
        debug!(
            "PDF: stroke color {color:?}, archived layer {}",
            self.layers.len()
        );
        true
    }

    /// Archive whatever is left in the table and return every layer in order.
    pub fn finish(mut self, apertures: &mut ApertureTable) -> Vec<Layer> {
        self.layers.push(apertures.take_layer());
        self.layers
    }
}
