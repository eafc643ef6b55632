use thiserror::Error;

use crate::core::actions::ports::pixel_surface::PixelSurface;
use crate::core::data::colour::Colour;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::point::Point;

fn pixel_rect_to_buffer_size(pixel_rect: PixelRect) -> usize {
    pixel_rect.size() as usize * 3
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelBufferError {
    #[error("pixel {pixel:?} outside of pixel rect {pixel_rect:?}")]
    PixelOutsideBounds { pixel: Point, pixel_rect: PixelRect },
    #[error("pixel rect size {pixel_rect_size} does not match buffer size {buffer_size}")]
    BoundsMismatch {
        pixel_rect_size: usize,
        buffer_size: usize,
    },
}

pub type PixelBufferData = Vec<u8>;

/// Packed RGB surface, row-major, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixel_rect: PixelRect,
    buffer: PixelBufferData,
}

impl PixelBuffer {
    #[must_use]
    pub fn new(pixel_rect: PixelRect) -> Self {
        let total_bytes = pixel_rect_to_buffer_size(pixel_rect);

        Self {
            pixel_rect,
            buffer: vec![0; total_bytes],
        }
    }

    pub fn from_data(
        pixel_rect: PixelRect,
        buffer: PixelBufferData,
    ) -> Result<Self, PixelBufferError> {
        let buffer_size = pixel_rect_to_buffer_size(pixel_rect);

        if buffer_size != buffer.len() {
            return Err(PixelBufferError::BoundsMismatch {
                pixel_rect_size: buffer_size,
                buffer_size: buffer.len(),
            });
        }

        Ok(Self { pixel_rect, buffer })
    }

    #[must_use]
    pub fn buffer(&self) -> &PixelBufferData {
        &self.buffer
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn pixel(&self, pixel: Point) -> Option<Colour> {
        let index = self.index_of(pixel)?;

        Some(Colour {
            r: self.buffer[index],
            g: self.buffer[index + 1],
            b: self.buffer[index + 2],
        })
    }

    fn index_of(&self, pixel: Point) -> Option<usize> {
        if !self.pixel_rect.contains_point(pixel) {
            return None;
        }

        let relative_x = (pixel.x as i64 - self.pixel_rect.top_left().x as i64) as usize;
        let relative_y = (pixel.y as i64 - self.pixel_rect.top_left().y as i64) as usize;

        Some((relative_y * self.pixel_rect.width() as usize + relative_x) * 3)
    }
}

impl PixelSurface for PixelBuffer {
    fn pixel_rect(&self) -> PixelRect {
        self.pixel_rect
    }

    fn set_pixel(&mut self, pixel: Point, colour: Colour) -> Result<(), PixelBufferError> {
        let index = self
            .index_of(pixel)
            .ok_or(PixelBufferError::PixelOutsideBounds {
                pixel,
                pixel_rect: self.pixel_rect,
            })?;

        self.buffer[index] = colour.r;
        self.buffer[index + 1] = colour.g;
        self.buffer[index + 2] = colour.b;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_pixel_rect(width: u32, height: u32) -> PixelRect {
        PixelRect::from_size(width, height).unwrap()
    }

    fn create_offset_pixel_rect(x: i32, y: i32, width: i32, height: i32) -> PixelRect {
        PixelRect::new(
            Point { x, y },
            Point {
                x: x + width - 1,
                y: y + height - 1,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_creates_zeroed_buffer() {
        let pixel_rect = create_pixel_rect(10, 10);
        let buffer = PixelBuffer::new(pixel_rect);

        assert_eq!(buffer.pixel_rect(), pixel_rect);
        assert_eq!(buffer.buffer_size(), 300); // 10 * 10 * 3
        assert!(buffer.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_data_valid() {
        let pixel_rect = create_pixel_rect(2, 2);
        let data: Vec<u8> = vec![
            255, 0, 0, // pixel (0,0) - red
            0, 255, 0, // pixel (1,0) - green
            0, 0, 255, // pixel (0,1) - blue
            255, 255, 0, // pixel (1,1) - yellow
        ];

        let buffer = PixelBuffer::from_data(pixel_rect, data.clone()).unwrap();

        assert_eq!(buffer.buffer(), &data);
        assert_eq!(buffer.pixel(Point { x: 0, y: 1 }), Some(Colour { r: 0, g: 0, b: 255 }));
    }

    #[test]
    fn test_from_data_size_mismatch() {
        let pixel_rect = create_pixel_rect(2, 2);

        assert_eq!(
            PixelBuffer::from_data(pixel_rect, vec![255, 0, 0]).unwrap_err(),
            PixelBufferError::BoundsMismatch {
                pixel_rect_size: 12,
                buffer_size: 3
            }
        );
        assert_eq!(
            PixelBuffer::from_data(pixel_rect, vec![0; 24]).unwrap_err(),
            PixelBufferError::BoundsMismatch {
                pixel_rect_size: 12,
                buffer_size: 24
            }
        );
    }

    #[test]
    fn test_set_pixel_valid() {
        let mut buffer = PixelBuffer::new(create_pixel_rect(3, 3));
        let red = Colour { r: 255, g: 0, b: 0 };

        buffer.set_pixel(Point { x: 1, y: 1 }, red).unwrap();

        assert_eq!(&buffer.buffer()[12..15], &[255, 0, 0]);
        assert_eq!(buffer.pixel(Point { x: 1, y: 1 }), Some(red));
    }

    #[test]
    fn test_set_pixel_bottom_right_corner() {
        let mut buffer = PixelBuffer::new(create_pixel_rect(3, 3));
        let blue = Colour { r: 0, g: 0, b: 255 };

        buffer.set_pixel(Point { x: 2, y: 2 }, blue).unwrap();

        assert_eq!(&buffer.buffer()[24..27], &[0, 0, 255]);
    }

    #[test]
    fn test_set_pixel_with_offset_rect() {
        let mut buffer = PixelBuffer::new(create_offset_pixel_rect(10, 20, 3, 3));
        let white = Colour {
            r: 255,
            g: 255,
            b: 255,
        };

        buffer.set_pixel(Point { x: 11, y: 21 }, white).unwrap();

        assert_eq!(&buffer.buffer()[12..15], &[255, 255, 255]);
    }

    #[test]
    fn test_set_pixel_outside_bounds() {
        let pixel_rect = create_pixel_rect(3, 3);
        let mut buffer = PixelBuffer::new(pixel_rect);
        let colour = Colour { r: 255, g: 0, b: 0 };

        for pixel in [Point { x: 5, y: 1 }, Point { x: 1, y: 5 }, Point { x: -1, y: -1 }] {
            assert_eq!(
                buffer.set_pixel(pixel, colour),
                Err(PixelBufferError::PixelOutsideBounds { pixel, pixel_rect })
            );
        }
        assert!(buffer.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pixel_outside_bounds_is_none() {
        let buffer = PixelBuffer::new(create_pixel_rect(2, 2));

        assert_eq!(buffer.pixel(Point { x: 2, y: 0 }), None);
    }
}
