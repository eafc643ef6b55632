use crate::core::data::colour::Colour;
use crate::core::data::pixel_buffer::PixelBufferError;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::point::Point;

/// A 2-D surface of device pixels owned by the presentation layer.
///
/// The compositor is the only writer; presenters read whatever the concrete
/// surface exposes.
pub trait PixelSurface {
    fn pixel_rect(&self) -> PixelRect;

    fn set_pixel(&mut self, pixel: Point, colour: Colour) -> Result<(), PixelBufferError>;
}
