mod adapters;
mod controllers;
mod core;
mod input;
mod presenters;

pub use crate::adapters::http_transport::{HttpTransport, HttpTransportError};
pub use crate::adapters::logging::init_tracing;
pub use crate::adapters::pixel_format::{PixelFormatError, copy_rgb_to_rgba};
pub use crate::controllers::ports::file_presenter::FilePresenterPort;
pub use crate::controllers::render::{
    CatalogError, CloseReason, ControllerState, EventPayloads, NextPayload, PumpReport,
    RenderController, RenderError, RenderSummary, RenderTransport, RetryPolicy, SessionError,
    SessionEvent, SessionSettings, SessionState, StreamSession, stream_runtime,
};
pub use crate::core::actions::cancellation::CancelFlag;
pub use crate::core::actions::composite_frame::{CompositeStats, composite_frame};
pub use crate::core::actions::decode_frame::{FrameError, decode_frame};
pub use crate::core::actions::encode_request::{RequestDescriptor, RequestError, encode_request};
pub use crate::core::actions::ports::pixel_surface::PixelSurface;
pub use crate::core::actions::zoom_viewport::{ZoomError, recenter, zoom_out};
pub use crate::core::data::catalog::{Catalog, EquationDefaults};
pub use crate::core::data::colour::{Colour, ColourParseError};
pub use crate::core::data::colour_palette::ColourPalette;
pub use crate::core::data::pixel_buffer::{PixelBuffer, PixelBufferError};
pub use crate::core::data::pixel_rect::{PixelRect, PixelRectError};
pub use crate::core::data::point::Point;
pub use crate::core::data::render_request::{RenderMode, RenderRequest};
pub use crate::core::data::stream_frame::{PixelBatch, StreamFrame};
pub use crate::core::data::viewport::{Viewport, ViewportError};
pub use crate::input::cli::{Bounds, Cli, DEFAULT_SERVER_URL, EngineArgs, GuiCli};
#[cfg(feature = "gui")]
pub use crate::input::gui::run_gui;
pub use crate::presenters::file::ppm::{PpmFilePresenter, write_ppm};
