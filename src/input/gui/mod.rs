//! GUI input adapter for interactive fractal exploration.
//!
//! This module provides a windowed interface using winit for window management,
//! pixels for framebuffer rendering, and egui for the render controls. Left
//! click zooms in at the pointer, right click zooms out.

mod app;
pub mod ports;
mod ui_state;

pub use app::{GuiApp, run_gui};
