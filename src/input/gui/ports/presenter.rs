use egui::Context as EguiContext;

use crate::adapters::pixel_format::PixelFormatError;
use crate::core::data::pixel_buffer::PixelBuffer;

/// Puts the render surface and the control panel on screen.
pub trait GuiPresenterPort {
    /// Copies the latest surface contents into the framebuffer.
    fn present(&mut self, surface: &PixelBuffer) -> Result<(), PixelFormatError>;

    fn render(&mut self, egui_output: egui::FullOutput, egui_ctx: &EguiContext) -> Result<(), pixels::Error>;

    fn resize(&mut self, width: u32, height: u32) -> Result<(), pixels::TextureError>;

    /// Maps a physical window position to surface pixel coordinates, or
    /// `None` when it falls outside the drawn surface.
    fn surface_position(&self, window_position: (f32, f32)) -> Option<(f64, f64)>;
}
