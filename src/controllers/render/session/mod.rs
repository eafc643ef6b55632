pub mod event_stream;
pub mod stream_session;
