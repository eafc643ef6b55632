//! `text/event-stream` bodies as a sequence of event payloads.
//!
//! Framing is decoded by `eventsource-stream`. Only the `data` of each event
//! matters to the render protocol; `:` keep-alive comments never surface and
//! events without data are skipped.

use std::fmt;
use std::future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use tokio::runtime::{Builder, Handle, Runtime};

use crate::controllers::render::errors::SessionError;

type Payloads = Pin<Box<dyn Stream<Item = Result<String, SessionError>> + Send>>;

/// Runtime that drives event-stream bodies on behalf of blocking callers.
///
/// Multi-threaded so that any thread can wait on a body through its handle.
pub fn stream_runtime() -> io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("event-stream")
        .enable_all()
        .build()
}

#[derive(Debug, PartialEq, Eq)]
pub enum NextPayload {
    Payload(String),
    /// Nothing arrived within the wait; the body is still open.
    Pending,
    /// The body ended. A partially received trailing event is discarded.
    Ended,
}

/// Event payloads of one open body. Dropping it releases the body.
pub struct EventPayloads {
    runtime: Handle,
    payloads: Payloads,
}

impl EventPayloads {
    pub fn new<S, B, E>(runtime: Handle, body: S) -> Self
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let payloads = body
            .eventsource()
            .map(|event| match event {
                Ok(event) => Ok(event.data),
                Err(err) => Err(SessionError::Read(err.to_string())),
            })
            .filter(|payload| future::ready(!matches!(payload, Ok(data) if data.is_empty())));

        Self {
            runtime,
            payloads: Box::pin(payloads),
        }
    }

    /// Waits at most `wait` for the next event's data.
    ///
    /// Must not be called from inside the runtime's own tasks.
    pub fn next_payload(&mut self, wait: Duration) -> Result<NextPayload, SessionError> {
        let payloads = &mut self.payloads;
        let next = self
            .runtime
            .block_on(async { tokio::time::timeout(wait, payloads.next()).await });

        match next {
            Err(_) => Ok(NextPayload::Pending),
            Ok(None) => Ok(NextPayload::Ended),
            Ok(Some(payload)) => payload.map(NextPayload::Payload),
        }
    }
}

impl fmt::Debug for EventPayloads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPayloads").finish_non_exhaustive()
    }
}
