use std::time::Duration;

use thiserror::Error;

use crate::core::actions::encode_request::RequestError;
use crate::core::actions::zoom_viewport::ZoomError;
use crate::core::data::viewport::ViewportError;

/// Connection-level failure of one streaming session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not reach the render engine: {0}")]
    Connect(String),
    #[error("render engine answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("event stream read failed: {0}")]
    Read(String),
    #[error("could not start the session worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("event stream ended before the terminate event")]
    UnexpectedEndOfStream,
    #[error("no event received for {0:?}")]
    IdleTimeout(Duration),
    #[error("session worker stopped without reporting")]
    WorkerDisconnected,
}

impl SessionError {
    /// Client errors mean the engine rejected the request itself; sending it
    /// again cannot succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not fetch the catalog: {0}")]
    Fetch(String),
    #[error("catalog is not valid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("catalog offers no equations")]
    NoEquations,
    #[error("catalog offers no colour schemes")]
    NoColourSchemes,
    #[error("catalog has no equation named {0:?}")]
    UnknownEquation(String),
    #[error("catalog has no colour scheme named {0:?}")]
    UnknownColourScheme(String),
    #[error("default view of {equation:?} is invalid: {source}")]
    InvalidDefaults {
        equation: String,
        source: ViewportError,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("controller has no catalog yet")]
    Uninitialized,
    #[error("no render is in progress")]
    NoActiveRender,
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    #[error(transparent)]
    InvalidViewport(#[from] ZoomError),
    #[error(transparent)]
    Viewport(#[from] ViewportError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
