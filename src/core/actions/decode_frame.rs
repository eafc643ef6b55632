use serde::Deserialize;
use thiserror::Error;

use crate::core::data::colour::ColourParseError;
use crate::core::data::colour_palette::ColourPalette;
use crate::core::data::point::Point;
use crate::core::data::stream_frame::{PixelBatch, StreamFrame};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pixel frame is missing the {0:?} field")]
    MissingField(&'static str),
    #[error("frame palette is invalid: {0}")]
    Palette(#[from] ColourParseError),
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(default)]
    terminate: bool,
    x: Option<i32>,
    y: Option<i32>,
    data: Option<Vec<Vec<u32>>>,
    colours: Option<Vec<String>>,
}

/// Decodes one event payload from the render engine.
///
/// A payload with `"terminate": true` is the end-of-stream sentinel whatever
/// else it carries. Any other payload must be a complete pixel batch.
pub fn decode_frame(payload: &str) -> Result<StreamFrame, FrameError> {
    let event: WireEvent = serde_json::from_str(payload)?;

    if event.terminate {
        return Ok(StreamFrame::Terminate);
    }

    let x = event.x.ok_or(FrameError::MissingField("x"))?;
    let y = event.y.ok_or(FrameError::MissingField("y"))?;
    let data = event.data.ok_or(FrameError::MissingField("data"))?;
    let colours = event.colours.ok_or(FrameError::MissingField("colours"))?;

    Ok(StreamFrame::Batch(PixelBatch {
        origin: Point { x, y },
        data,
        palette: ColourPalette::from_css(&colours)?,
    }))
}
