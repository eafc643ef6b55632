//! In-memory render engine used by the session and controller tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use tokio::runtime::Runtime;

use crate::controllers::render::errors::{CatalogError, SessionError};
use crate::controllers::render::ports::transport::RenderTransport;
use crate::controllers::render::session::event_stream::{EventPayloads, stream_runtime};
use crate::core::actions::encode_request::{RequestDescriptor, encode_request};
use crate::core::data::catalog::Catalog;
use crate::core::data::render_request::{RenderMode, RenderRequest};
use crate::core::data::viewport::Viewport;

pub const TERMINATE: &str = "data: { \"terminate\" : true }\n\n";

pub const CATALOG_JSON: &str = r#"{
    "equations": [
        {"minX": "-2.5", "maxX": "1.0", "minY": "-1.0", "maxY": "1.0",
         "iterations": "100", "equation.type": "mandelbrot"},
        {"minX": -2, "maxX": 2, "minY": -2, "maxY": 2,
         "iterations": 50, "equation.type": "julia"}
    ],
    "colourSchemes": ["fire", "ice"]
}"#;

/// One SSE event carrying a batch whose palette is `colours`.
pub fn batch_event(x: i32, y: i32, data: &[&[u32]], colours: &[&str]) -> String {
    let json = serde_json::json!({
        "x": x,
        "y": y,
        "data": data,
        "colours": colours,
    });

    format!("data: {json}\n\n")
}

pub fn descriptor() -> RequestDescriptor {
    encode_request(&RenderRequest {
        viewport: Viewport::new(-2.0, 1.0, -1.0, 1.0, 100).unwrap(),
        equation_type: "mandelbrot".to_string(),
        colour_scheme: "fire".to_string(),
        mode: RenderMode::Sync,
    })
    .unwrap()
}

pub fn catalog() -> Catalog {
    serde_json::from_str(CATALOG_JSON).unwrap()
}

/// Test side of a live body.
pub struct LiveFeed(UnboundedSender<Vec<u8>>);

impl LiveFeed {
    /// Writes a chunk; false once the session has released the body.
    pub fn send(&self, chunk: impl Into<String>) -> bool {
        self.0.unbounded_send(chunk.into().into_bytes()).is_ok()
    }

    pub fn is_released(&self) -> bool {
        self.0.is_closed()
    }
}

/// Session side of a live body; ends when the feed is dropped.
pub struct LiveBody(UnboundedReceiver<Vec<u8>>);

/// A body the test writes into while the session is reading it.
pub fn live_stream() -> (LiveFeed, LiveBody) {
    let (sender, chunks) = unbounded();
    (LiveFeed(sender), LiveBody(chunks))
}

pub enum Scripted {
    Body(String),
    Live(LiveBody),
    Fail(SessionError),
}

/// Answers each `open_stream` with the next scripted response, in order.
pub struct FakeTransport {
    runtime: Runtime,
    streams: Mutex<VecDeque<Scripted>>,
    catalog: Mutex<Option<Result<Catalog, CatalogError>>>,
    opened: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new(streams: Vec<Scripted>) -> Self {
        Self {
            runtime: stream_runtime().unwrap(),
            streams: Mutex::new(streams.into()),
            catalog: Mutex::new(Some(Ok(catalog()))),
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn with_catalog(self, catalog: Result<Catalog, CatalogError>) -> Self {
        *self.catalog.lock().unwrap() = Some(catalog);
        self
    }

    pub fn push(&self, stream: Scripted) {
        self.streams.lock().unwrap().push_back(stream);
    }

    /// Descriptors opened so far.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl RenderTransport for FakeTransport {
    fn open_stream(&self, descriptor: &RequestDescriptor) -> Result<EventPayloads, SessionError> {
        self.opened.lock().unwrap().push(descriptor.to_string());
        let runtime = self.runtime.handle().clone();

        match self.streams.lock().unwrap().pop_front() {
            Some(Scripted::Body(body)) => {
                let chunks = futures::stream::iter([Ok::<_, io::Error>(body.into_bytes())]);
                Ok(EventPayloads::new(runtime, chunks))
            }
            Some(Scripted::Live(LiveBody(chunks))) => {
                Ok(EventPayloads::new(runtime, chunks.map(Ok::<_, io::Error>)))
            }
            Some(Scripted::Fail(err)) => Err(err),
            None => Err(SessionError::Connect("no scripted stream left".to_string())),
        }
    }

    fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        match self.catalog.lock().unwrap().take() {
            Some(result) => result,
            None => Ok(catalog()),
        }
    }
}
