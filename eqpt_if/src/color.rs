//! # Color Classifier Interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A classifier producing the dominant color under the robot's color sensor.
///
/// The predicates take a fresh reading on every call. A classifier which cannot make sense of its
/// reading must report [`ColorLabel::None`] rather than failing.
pub trait ColorClassifier {
    /// Sample the sensor and return the dominant color label.
    fn dominant_color(&mut self) -> ColorLabel;

    /// True if the course line (red) is under the sensor.
    fn is_red(&mut self) -> bool {
        self.dominant_color() == ColorLabel::Red
    }

    /// True if a zone marker (blue) is under the sensor.
    fn is_blue(&mut self) -> bool {
        self.dominant_color() == ColorLabel::Blue
    }

    /// True if the course end marker (black) is under the sensor.
    fn is_black(&mut self) -> bool {
        self.dominant_color() == ColorLabel::Black
    }
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Discrete result of a color classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorLabel {
    /// The course line
    Red,
    Green,
    /// Pickup/dropoff zone marker
    Blue,
    /// Course end marker
    Black,
    White,
    /// No dominant color, or the reading could not be classified
    None,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Unrecognised color label \"{0}\"")]
pub struct ColorParseError(pub String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ColorLabel {
    fn default() -> Self {
        ColorLabel::None
    }
}

impl Display for ColorLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColorLabel::Red => "RED",
            ColorLabel::Green => "GREEN",
            ColorLabel::Blue => "BLUE",
            ColorLabel::Black => "BLACK",
            ColorLabel::White => "WHITE",
            ColorLabel::None => "NONE",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ColorLabel {
    type Err = ColorParseError;

    /// Parse the label text reported by a classifier, e.g. `"RED"`. Case is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RED" => Ok(ColorLabel::Red),
            "GREEN" => Ok(ColorLabel::Green),
            "BLUE" => Ok(ColorLabel::Blue),
            "BLACK" => Ok(ColorLabel::Black),
            "WHITE" => Ok(ColorLabel::White),
            "NONE" | "" => Ok(ColorLabel::None),
            _ => Err(ColorParseError(s.to_string())),
        }
    }
}
