pub mod cancellation;
pub mod composite_frame;
pub mod decode_frame;
pub mod encode_request;
pub mod ports;
pub mod zoom_viewport;
