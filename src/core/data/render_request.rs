use std::fmt;
use std::str::FromStr;

use crate::core::data::viewport::Viewport;

/// How the render engine schedules the tiles of one render.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Sync,
    Async,
}

impl RenderMode {
    pub const ALL: &'static [Self] = &[Self::Sync, Self::Async];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sync" => Ok(Self::Sync),
            "async" => Ok(Self::Async),
            other => Err(format!("unknown render mode {other:?}, expected sync or async")),
        }
    }
}

/// A snapshot of everything the render engine needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub viewport: Viewport,
    pub equation_type: String,
    pub colour_scheme: String,
    pub mode: RenderMode,
}
