//! Streaming render controller.
//!
//! Turns the explorer's current parameters into render requests, keeps exactly
//! one streaming session with the render engine open, and composites the
//! batches it delivers onto a pixel surface.
//!
//! # Architecture
//!
//! - **Input**: parameter changes and zoom gestures on [`RenderController`]
//! - **Output**: pixels written through the `PixelSurface` port
//! - **Transport**: the [`RenderTransport`] port, implemented over HTTP in
//!   `adapters::http_transport`

mod controller;
pub mod errors;
pub mod ports;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{ControllerState, PumpReport, RenderController, RenderSummary};
pub use errors::{CatalogError, RenderError, SessionError};
pub use ports::transport::RenderTransport;
pub use session::event_stream::{EventPayloads, NextPayload, stream_runtime};
pub use session::stream_session::{CloseReason, SessionEvent, SessionState, StreamSession};
pub use settings::{RetryPolicy, SessionSettings};
