use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::core::actions::ports::pixel_surface::PixelSurface;
use crate::core::data::pixel_buffer::PixelBuffer;

/// Writes the surface as a binary (P6) PPM image.
pub fn write_ppm<W: Write>(buffer: &PixelBuffer, out: &mut W) -> std::io::Result<()> {
    let pixel_rect = buffer.pixel_rect();

    // P6: binary RGB, then width, height and max colour value
    writeln!(out, "P6")?;
    writeln!(out, "{} {}", pixel_rect.width(), pixel_rect.height())?;
    writeln!(out, "255")?;
    out.write_all(buffer.buffer())?;

    Ok(())
}

#[derive(Debug, Default)]
pub struct PpmFilePresenter;

impl PpmFilePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FilePresenterPort for PpmFilePresenter {
    fn present(&self, buffer: &PixelBuffer, filepath: &Path) -> std::io::Result<()> {
        if let Some(parent) = filepath.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(File::create(filepath)?);
        write_ppm(buffer, &mut file)?;
        file.flush()
    }
}
