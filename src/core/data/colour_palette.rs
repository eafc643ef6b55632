use crate::core::data::colour::{Colour, ColourParseError};

/// Palette index to display colour, as shipped with each pixel batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColourPalette {
    colours: Vec<Colour>,
}

impl ColourPalette {
    #[must_use]
    pub fn new(colours: Vec<Colour>) -> Self {
        Self { colours }
    }

    pub fn from_css<S: AsRef<str>>(spectrum: &[S]) -> Result<Self, ColourParseError> {
        let colours = spectrum
            .iter()
            .map(|colour| colour.as_ref().parse())
            .collect::<Result<Vec<Colour>, _>>()?;

        Ok(Self { colours })
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<Colour> {
        self.colours.get(index as usize).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_css_preserves_order() {
        let palette = ColourPalette::from_css(&["#000000", "#FFFFFF", "#FF0000"]).unwrap();

        assert_eq!(palette.len(), 3);
        assert_eq!(palette.get(0), Some(Colour { r: 0, g: 0, b: 0 }));
        assert_eq!(palette.get(1), Some(Colour { r: 255, g: 255, b: 255 }));
        assert_eq!(palette.get(2), Some(Colour { r: 255, g: 0, b: 0 }));
        assert_eq!(palette.get(3), None);
    }

    #[test]
    fn test_from_css_fails_on_first_bad_colour() {
        let result = ColourPalette::from_css(&["#000000", "red"]);

        assert_eq!(
            result,
            Err(ColourParseError::InvalidFormat("red".to_string()))
        );
    }

    #[test]
    fn test_empty_palette() {
        let palette = ColourPalette::from_css::<&str>(&[]).unwrap();

        assert!(palette.is_empty());
        assert_eq!(palette.get(0), None);
    }
}
