//! Input adapters: translate command-line flags and window events into
//! render controller operations.

pub mod cli;
#[cfg(feature = "gui")]
pub mod gui;
