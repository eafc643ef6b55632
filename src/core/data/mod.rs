pub mod catalog;
pub mod colour;
pub mod colour_palette;
pub mod pixel_buffer;
pub mod pixel_rect;
pub mod point;
pub mod render_request;
pub mod stream_frame;
pub mod viewport;
