//! HTTP transport to the render engine's REST endpoints.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::controllers::render::errors::{CatalogError, SessionError};
use crate::controllers::render::ports::transport::RenderTransport;
use crate::controllers::render::session::event_stream::{EventPayloads, stream_runtime};
use crate::core::actions::encode_request::RequestDescriptor;
use crate::core::data::catalog::Catalog;

const CATALOG_PATH: &str = "config";
const EVENT_STREAM: &str = "text/event-stream";

#[derive(Debug, Error)]
pub enum HttpTransportError {
    #[error("could not build the http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("could not start the http runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// reqwest client rooted at the engine's base URL, e.g.
/// `http://localhost:8080/rest`.
///
/// Requests run on a private runtime so callers stay blocking. Streams have
/// no overall deadline; a stalled stream is the session's idle timeout to
/// deal with.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    runtime: Runtime,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, HttpTransportError> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;

        Ok(Self {
            client,
            runtime: stream_runtime()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl RenderTransport for HttpTransport {
    fn open_stream(&self, descriptor: &RequestDescriptor) -> Result<EventPayloads, SessionError> {
        let url = self.url_for(descriptor.as_str());
        debug!(%url, "opening event stream");

        let request = self.client.get(&url).header(ACCEPT, EVENT_STREAM);
        let response = self
            .runtime
            .block_on(request.send())
            .map_err(|err| SessionError::Connect(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = self.runtime.block_on(response.text()).unwrap_or_default();
            return Err(SessionError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(EventPayloads::new(
            self.runtime.handle().clone(),
            response.bytes_stream(),
        ))
    }

    fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let url = self.url_for(CATALOG_PATH);
        debug!(%url, "fetching catalog");

        let (status, body) = self
            .runtime
            .block_on(async {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                Ok::<_, reqwest::Error>((status, response.text().await?))
            })
            .map_err(|err| CatalogError::Fetch(err.to_string()))?;

        if !status.is_success() {
            return Err(CatalogError::Fetch(format!("catalog responded with status {status}")));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
