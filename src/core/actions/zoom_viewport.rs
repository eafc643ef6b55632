use thiserror::Error;

use crate::core::data::viewport::{Viewport, ViewportError};

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ZoomError {
    #[error("cannot zoom on a {width}x{height} surface")]
    InvalidViewport { width: f64, height: f64 },
    #[error("pointer position ({x}, {y}) is not a finite coordinate")]
    InvalidPointer { x: f64, y: f64 },
    #[error(transparent)]
    Viewport(#[from] ViewportError),
}

/// Zooms in 2× around the fractal-space point under the pointer.
///
/// Pixel row 0 is the top of the surface, which maps to `max_y`. The new
/// viewport is centred on the pointer and spans half the previous range on
/// each axis. Iterations carry over unchanged.
pub fn recenter(
    viewport: &Viewport,
    pointer_x: f64,
    pointer_y: f64,
    surface_width: f64,
    surface_height: f64,
) -> Result<Viewport, ZoomError> {
    let usable = |size: f64| size.is_finite() && size > 0.0;
    if !usable(surface_width) || !usable(surface_height) {
        return Err(ZoomError::InvalidViewport {
            width: surface_width,
            height: surface_height,
        });
    }
    if !pointer_x.is_finite() || !pointer_y.is_finite() {
        return Err(ZoomError::InvalidPointer {
            x: pointer_x,
            y: pointer_y,
        });
    }

    let x_range = viewport.x_range();
    let x = viewport.min_x() + pointer_x * x_range / surface_width;

    let y_range = viewport.y_range();
    let y = viewport.max_y() - pointer_y * y_range / surface_height;

    Ok(Viewport::centred_at(
        x,
        y,
        x_range / 4.0,
        y_range / 4.0,
        viewport.iterations(),
    )?)
}

/// Zooms out 2× about the current centre, undoing a centred [`recenter`].
pub fn zoom_out(viewport: &Viewport) -> Result<Viewport, ZoomError> {
    let (x, y) = viewport.centre();

    Ok(Viewport::centred_at(
        x,
        y,
        viewport.x_range(),
        viewport.y_range(),
        viewport.iterations(),
    )?)
}
