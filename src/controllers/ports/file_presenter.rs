use std::path::Path;

use crate::core::data::pixel_buffer::PixelBuffer;

/// Persists a finished surface to disk.
pub trait FilePresenterPort {
    fn present(&self, buffer: &PixelBuffer, filepath: &Path) -> std::io::Result<()>;
}
