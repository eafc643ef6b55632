use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("viewport bounds must be finite: x [{min_x}, {max_x}], y [{min_y}, {max_y}]")]
    NonFiniteBounds {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    },
    #[error("the minimum x coordinate must be less than the maximum: {min_x} >= {max_x}")]
    InvalidXRange { min_x: f64, max_x: f64 },
    #[error("the minimum y coordinate must be less than the maximum: {min_y} >= {max_y}")]
    InvalidYRange { min_y: f64, max_y: f64 },
    #[error("there must be a positive number of iterations")]
    ZeroIterations,
}

/// A rectangle of fractal space plus the iteration depth to render it at.
///
/// Bounds are checked on construction, so every `Viewport` in circulation
/// satisfies `min_x < max_x`, `min_y < max_y` and `iterations > 0`. Changes
/// produce a new value rather than mutating an existing one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    iterations: u32,
}

impl Viewport {
    pub fn new(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        iterations: u32,
    ) -> Result<Self, ViewportError> {
        if ![min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite()) {
            return Err(ViewportError::NonFiniteBounds {
                min_x,
                max_x,
                min_y,
                max_y,
            });
        }
        if min_x >= max_x {
            return Err(ViewportError::InvalidXRange { min_x, max_x });
        }
        if min_y >= max_y {
            return Err(ViewportError::InvalidYRange { min_y, max_y });
        }
        if iterations == 0 {
            return Err(ViewportError::ZeroIterations);
        }

        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
            iterations,
        })
    }

    /// Builds a viewport of the given half-extents around a centre point.
    pub fn centred_at(
        centre_x: f64,
        centre_y: f64,
        half_width: f64,
        half_height: f64,
        iterations: u32,
    ) -> Result<Self, ViewportError> {
        Self::new(
            centre_x - half_width,
            centre_x + half_width,
            centre_y - half_height,
            centre_y + half_height,
            iterations,
        )
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub fn x_range(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn y_range(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn centre(&self) -> (f64, f64) {
        (
            self.min_x + self.x_range() / 2.0,
            self.min_y + self.y_range() / 2.0,
        )
    }

    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    pub fn with_iterations(&self, iterations: u32) -> Result<Self, ViewportError> {
        Self::new(self.min_x, self.max_x, self.min_y, self.max_y, iterations)
    }
}
