use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};

use crate::controllers::render::RenderController;
use crate::controllers::render::errors::RenderError;
use crate::controllers::render::ports::transport::RenderTransport;
use crate::controllers::render::settings::{DEFAULT_FRAME_QUEUE_DEPTH, RetryPolicy, SessionSettings};
use crate::core::actions::ports::pixel_surface::PixelSurface;
use crate::core::actions::zoom_viewport;
use crate::core::data::pixel_rect::{PixelRect, PixelRectError};
use crate::core::data::render_request::RenderMode;
use crate::core::data::viewport::{Viewport, ViewportError};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/rest";

/// Bounds given on the command line, in fractal space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn with_iterations(&self, iterations: u32) -> Result<Viewport, ViewportError> {
        Viewport::new(self.min_x, self.max_x, self.min_y, self.max_y, iterations)
    }
}

/// Connection and surface flags shared by every binary.
#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Render engine base URL
    #[arg(long, env = "FRACTAL_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Surface width in pixels
    #[arg(long, default_value_t = 480)]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 416)]
    pub height: u32,

    /// Tile scheduling on the engine: sync or async
    #[arg(long, default_value = "sync")]
    pub mode: RenderMode,

    /// Reconnect attempts after a failed stream
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Delay before the first reconnect, grows linearly per attempt
    #[arg(long, default_value_t = 500)]
    pub retry_backoff_ms: u64,

    /// Give up on a stream that stays silent this long
    #[arg(long)]
    pub idle_timeout_secs: Option<u64>,

    /// Decoded frames buffered ahead of compositing
    #[arg(long, default_value_t = DEFAULT_FRAME_QUEUE_DEPTH)]
    pub queue_depth: usize,

    /// Connection timeout for the render engine
    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,
}

impl EngineArgs {
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        let retry = if self.retries == 0 {
            RetryPolicy::NONE
        } else {
            RetryPolicy::bounded(self.retries, Duration::from_millis(self.retry_backoff_ms))
        };

        SessionSettings {
            retry,
            idle_timeout: self.idle_timeout_secs.map(Duration::from_secs),
            frame_queue_depth: self.queue_depth,
        }
    }

    pub fn surface_rect(&self) -> Result<PixelRect, PixelRectError> {
        PixelRect::from_size(self.width, self.height)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Parser, Debug)]
#[command(name = "fractal_stream")]
#[command(about = "Stream a fractal from a remote render engine into a PPM image")]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Equation to render (defaults to the catalog's first)
    #[arg(short, long)]
    pub equation: Option<String>,

    /// Colour scheme (defaults to the catalog's first)
    #[arg(short, long)]
    pub colour_scheme: Option<String>,

    /// Iteration depth (defaults to the equation's)
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// Explicit view as minX,maxX,minY,maxY
    #[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
    pub bounds: Option<Bounds>,

    /// Zoom in 2x at a surface pixel X,Y; repeat to zoom further
    #[arg(long = "zoom", value_parser = parse_pointer, allow_hyphen_values = true)]
    pub zooms: Vec<(f64, f64)>,

    /// Where to write the image
    #[arg(short, long, default_value = "output/fractal.ppm")]
    pub output: PathBuf,

    /// Print the render descriptor and exit without rendering
    #[arg(long)]
    pub describe: bool,
}

impl Cli {
    /// Applies the selection flags to a controller that already holds a
    /// catalog. Zoom clicks are folded into the viewport without opening a
    /// stream for each intermediate view.
    pub fn apply_to<T, S>(&self, controller: &mut RenderController<T, S>) -> Result<(), RenderError>
    where
        T: RenderTransport + ?Sized + 'static,
        S: PixelSurface,
    {
        if let Some(equation) = &self.equation {
            controller.select_equation(equation)?;
        }
        if let Some(colour_scheme) = &self.colour_scheme {
            controller.select_colour_scheme(colour_scheme)?;
        }
        controller.set_mode(self.engine.mode);

        let current = controller.viewport().ok_or(RenderError::Uninitialized)?;
        if let Some(bounds) = self.bounds {
            controller.set_viewport(bounds.with_iterations(current.iterations())?)?;
        }
        if let Some(iterations) = self.iterations {
            controller.set_iterations(iterations)?;
        }

        let width = f64::from(self.engine.width);
        let height = f64::from(self.engine.height);
        for &(x, y) in &self.zooms {
            let viewport = controller.viewport().ok_or(RenderError::Uninitialized)?;
            controller.set_viewport(zoom_viewport::recenter(&viewport, x, y, width, height)?)?;
        }

        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(name = "gui")]
#[command(about = "Explore a remotely rendered fractal in a window")]
pub struct GuiCli {
    #[command(flatten)]
    pub engine: EngineArgs,
}

fn parse_numbers<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let numbers = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("{value:?}: {err}"))?;

    numbers
        .try_into()
        .map_err(|numbers: Vec<f64>| format!("expected {N} comma-separated numbers, got {}", numbers.len()))
}

fn parse_bounds(value: &str) -> Result<Bounds, String> {
    let [min_x, max_x, min_y, max_y] = parse_numbers::<4>(value)?;

    Ok(Bounds {
        min_x,
        max_x,
        min_y,
        max_y,
    })
}

fn parse_pointer(value: &str) -> Result<(f64, f64), String> {
    let [x, y] = parse_numbers::<2>(value)?;
    Ok((x, y))
}
