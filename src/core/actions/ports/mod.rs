pub mod pixel_surface;
