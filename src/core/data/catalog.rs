use serde::{Deserialize, Deserializer};

use crate::core::data::viewport::{Viewport, ViewportError};

/// The equations and colour schemes the render engine currently offers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub equations: Vec<EquationDefaults>,
    #[serde(default, rename = "colourSchemes")]
    pub colour_schemes: Vec<String>,
}

/// An equation's identifier plus the view it is best rendered at.
///
/// The catalog publishes service properties, which arrive as JSON numbers or
/// as numeric strings depending on how the equation was registered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquationDefaults {
    #[serde(rename = "equation.type")]
    pub equation_type: String,
    #[serde(rename = "minX", deserialize_with = "number_or_string")]
    pub min_x: f64,
    #[serde(rename = "maxX", deserialize_with = "number_or_string")]
    pub max_x: f64,
    #[serde(rename = "minY", deserialize_with = "number_or_string")]
    pub min_y: f64,
    #[serde(rename = "maxY", deserialize_with = "number_or_string")]
    pub max_y: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub iterations: f64,
}

impl EquationDefaults {
    pub fn viewport(&self) -> Result<Viewport, ViewportError> {
        let iterations = if self.iterations.is_finite() && self.iterations >= 1.0 {
            self.iterations.min(u32::MAX as f64) as u32
        } else {
            0
        };

        Viewport::new(self.min_x, self.max_x, self.min_y, self.max_y, iterations)
    }
}

impl Catalog {
    #[must_use]
    pub fn equation(&self, equation_type: &str) -> Option<&EquationDefaults> {
        self.equations
            .iter()
            .find(|equation| equation.equation_type == equation_type)
    }

    #[must_use]
    pub fn has_colour_scheme(&self, colour_scheme: &str) -> bool {
        self.colour_schemes.iter().any(|name| name == colour_scheme)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {text:?}"))),
    }
}
