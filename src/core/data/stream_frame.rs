use crate::core::data::colour_palette::ColourPalette;
use crate::core::data::point::Point;

/// One block of rendered pixels.
///
/// `data[i][j]` is the palette index for the pixel at
/// `(origin.x + i, origin.y + j)`, so the outer vector walks columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBatch {
    pub origin: Point,
    pub data: Vec<Vec<u32>>,
    pub palette: ColourPalette,
}

impl PixelBatch {
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.data.iter().map(Vec::len).sum()
    }
}

/// One decoded unit of render-engine output.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    Batch(PixelBatch),
    /// End of stream; carries no pixels.
    Terminate,
}
