use crate::controllers::render::errors::{CatalogError, SessionError};
use crate::controllers::render::session::event_stream::EventPayloads;
use crate::core::actions::encode_request::RequestDescriptor;
use crate::core::data::catalog::Catalog;

/// Connection to the render engine and its catalog service.
///
/// `open_stream` is called from a session's worker thread and may block until
/// the engine answers. The returned payloads are read incrementally; dropping
/// them releases the connection.
pub trait RenderTransport: Send + Sync {
    fn open_stream(&self, descriptor: &RequestDescriptor) -> Result<EventPayloads, SessionError>;

    fn fetch_catalog(&self) -> Result<Catalog, CatalogError>;
}
