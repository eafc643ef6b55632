use std::fmt;

use thiserror::Error;

use crate::core::data::render_request::{RenderMode, RenderRequest};
use crate::core::data::viewport::{Viewport, ViewportError};

const RENDER_ROOT: &str = "render";
const DELIMITER: char = '/';

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("an equation type is required")]
    EmptyEquationType,
    #[error("a colour scheme is required")]
    EmptyColourScheme,
    #[error(transparent)]
    InvalidViewport(#[from] ViewportError),
    #[error("malformed render descriptor {descriptor:?}: {reason}")]
    MalformedDescriptor { descriptor: String, reason: String },
}

/// Transport-addressable path for one render, relative to the server root.
///
/// Shape: `render/{mode}/{minX}/{maxX}/{minY}/{maxY}/{iterations}/{equation}/{colourScheme}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestDescriptor(String);

impl RequestDescriptor {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the request a descriptor was encoded from.
    pub fn parse(descriptor: &str) -> Result<RenderRequest, RequestError> {
        let malformed = |reason: String| RequestError::MalformedDescriptor {
            descriptor: descriptor.to_string(),
            reason,
        };

        let segments: Vec<&str> = descriptor
            .trim_start_matches(DELIMITER)
            .split(DELIMITER)
            .collect();
        let [root, mode, min_x, max_x, min_y, max_y, iterations, equation, colour_scheme] =
            segments.as_slice()
        else {
            return Err(malformed(format!(
                "expected 9 segments, found {}",
                segments.len()
            )));
        };

        if *root != RENDER_ROOT {
            return Err(malformed(format!("unexpected root segment {root:?}")));
        }

        let mode = mode.parse::<RenderMode>().map_err(malformed)?;
        let bound = |name: &str, value: &str| {
            value
                .parse::<f64>()
                .map_err(|err| malformed(format!("{name} {value:?}: {err}")))
        };
        let iterations = iterations
            .parse::<u32>()
            .map_err(|err| malformed(format!("iterations {iterations:?}: {err}")))?;
        let identifier = |name: &str, value: &str| {
            urlencoding::decode(value)
                .map(|decoded| decoded.into_owned())
                .map_err(|err| malformed(format!("{name} {value:?}: {err}")))
        };

        let request = RenderRequest {
            viewport: Viewport::new(
                bound("minX", *min_x)?,
                bound("maxX", *max_x)?,
                bound("minY", *min_y)?,
                bound("maxY", *max_y)?,
                iterations,
            )?,
            equation_type: identifier("equation", *equation)?,
            colour_scheme: identifier("colour scheme", *colour_scheme)?,
            mode,
        };

        validate_identifiers(&request)?;

        Ok(request)
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_identifiers(request: &RenderRequest) -> Result<(), RequestError> {
    if request.equation_type.trim().is_empty() {
        return Err(RequestError::EmptyEquationType);
    }
    if request.colour_scheme.trim().is_empty() {
        return Err(RequestError::EmptyColourScheme);
    }

    Ok(())
}

/// Serialises a request into its descriptor.
///
/// Bounds are written with the shortest representation that parses back to
/// the identical `f64`, so deep zooms lose nothing in transit.
pub fn encode_request(request: &RenderRequest) -> Result<RequestDescriptor, RequestError> {
    validate_identifiers(request)?;

    let viewport = &request.viewport;

    let segments = [
        RENDER_ROOT.to_string(),
        request.mode.to_string(),
        viewport.min_x().to_string(),
        viewport.max_x().to_string(),
        viewport.min_y().to_string(),
        viewport.max_y().to_string(),
        viewport.iterations().to_string(),
        urlencoding::encode(&request.equation_type).into_owned(),
        urlencoding::encode(&request.colour_scheme).into_owned(),
    ];

    Ok(RequestDescriptor(segments.join(&DELIMITER.to_string())))
}
