pub mod http_transport;
pub mod logging;
pub mod pixel_format;
