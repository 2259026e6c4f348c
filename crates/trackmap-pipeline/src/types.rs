//! Shared types for the trackmap extraction pipeline.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::wrap::{FeatureLayout, WrapError};

/// Re-export `RgbaImage` so downstream crates can hand decoded images
/// to the scanner without depending on `image` directly.
pub use image::RgbaImage;

/// A 4-channel 8-bit pixel color (R, G, B, A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Opaque white, the canvas color of a painted map.
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    /// Opaque red, used for the race track.
    pub const RED: Self = Self([255, 0, 0, 255]);
    /// Opaque green, used for trees.
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    /// Opaque blue, used for power-ups.
    pub const BLUE: Self = Self([0, 0, 255, 255]);
    /// Opaque magenta, used for the lake.
    pub const MAGENTA: Self = Self([255, 0, 255, 255]);

    /// Create a color from its four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// The raw channel values.
    #[must_use]
    pub const fn channels(self) -> [u8; 4] {
        self.0
    }
}

impl From<image::Rgba<u8>> for Rgba {
    fn from(pixel: image::Rgba<u8>) -> Self {
        Self(pixel.0)
    }
}

impl From<Rgba> for image::Rgba<u8> {
    fn from(color: Rgba) -> Self {
        Self(color.0)
    }
}

/// A pixel position in image space.
///
/// The image's vertical axis is reported as `z`, matching the
/// ground-plane convention of the scene that consumes the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal position (pixels from left edge).
    pub x: u32,
    /// Vertical position (pixels from top edge).
    pub z: u32,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Squared Euclidean distance to another coordinate.
    ///
    /// Exact integer arithmetic, so equal distances compare equal and
    /// tie-breaking stays reproducible.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dz = u64::from(self.z.abs_diff(other.z));
        (dx * dx).saturating_add(dz * dz)
    }

    /// Euclidean distance to another coordinate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

/// An ordered visiting sequence over a set of coordinates.
///
/// Produced open by [`build_tour`](crate::tour::build_tour); a closed
/// loop after [`wrap_tour`](crate::wrap::wrap_tour) repeats its first
/// coordinate at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour(Vec<Coordinate>);

impl Tour {
    /// Create a tour from an already ordered vector of coordinates.
    #[must_use]
    pub const fn new(coordinates: Vec<Coordinate>) -> Self {
        Self(coordinates)
    }

    /// Returns `true` if the tour has no coordinates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of coordinates in the tour.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first coordinate, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Coordinate> {
        self.0.first()
    }

    /// Returns the last coordinate, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Coordinate> {
        self.0.last()
    }

    /// Returns `true` if the tour has at least two coordinates and
    /// ends where it starts.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.len() >= 2 && self.0.first() == self.0.last()
    }

    /// Returns a slice of all coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.0
    }

    /// Consumes the tour and returns the underlying vector.
    #[must_use]
    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.0
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One named feature to extract from the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Key the feature is reported under (e.g. `"track"`).
    pub name: String,

    /// Target color painted for this feature.
    pub color: Rgba,

    /// Whether the ordered tour is emitted open or wrapped into a loop.
    #[serde(default)]
    pub layout: FeatureLayout,
}

impl FeatureSpec {
    /// An open (unwrapped) feature.
    #[must_use]
    pub fn open(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            color,
            layout: FeatureLayout::Open,
        }
    }

    /// A closed-loop feature starting at `start`.
    #[must_use]
    pub fn closed(name: impl Into<String>, color: Rgba, start: Coordinate) -> Self {
        Self {
            name: name.into(),
            color,
            layout: FeatureLayout::Closed { start },
        }
    }
}

/// Configuration for a full extraction run.
///
/// Defaults reproduce the standard race map: a red closed-loop track
/// starting at `(12, 68)`, then green trees, blue power-ups and a
/// magenta lake, all matched at a threshold of 50.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Maximum Euclidean RGBA distance for a pixel to match a feature
    /// color. Shared by every feature.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Features to extract, in output order.
    pub features: Vec<FeatureSpec>,
}

const fn default_threshold() -> f64 {
    ExtractConfig::DEFAULT_THRESHOLD
}

impl ExtractConfig {
    /// Default match threshold.
    pub const DEFAULT_THRESHOLD: f64 = 50.0;

    /// Default start coordinate of the closed track loop.
    pub const DEFAULT_TRACK_START: Coordinate = Coordinate::new(12, 68);

    /// Check the configuration for values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the threshold is
    /// negative or not finite, if there are no features, or if a
    /// feature name is empty or repeated.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        if self.features.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one feature is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for feature in &self.features {
            if feature.name.is_empty() {
                return Err(PipelineError::InvalidConfig(
                    "feature name must not be empty".to_string(),
                ));
            }
            if !seen.insert(feature.name.as_str()) {
                return Err(PipelineError::InvalidConfig(format!(
                    "duplicate feature name {:?}",
                    feature.name
                )));
            }
        }
        Ok(())
    }

    /// Replace the start coordinate of every closed-loop feature.
    #[must_use]
    pub fn with_loop_start(mut self, start: Coordinate) -> Self {
        for feature in &mut self.features {
            if let FeatureLayout::Closed { start: s } = &mut feature.layout {
                *s = start;
            }
        }
        self
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            features: vec![
                FeatureSpec::closed("track", Rgba::RED, Self::DEFAULT_TRACK_START),
                FeatureSpec::open("trees", Rgba::GREEN),
                FeatureSpec::open("powerups", Rgba::BLUE),
                FeatureSpec::open("lake", Rgba::MAGENTA),
            ],
        }
    }
}

/// Output of one feature's pass through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureResult {
    /// Feature key, copied from its [`FeatureSpec`].
    pub name: String,

    /// Ordered coordinates, wrapped for closed-loop features.
    ///
    /// Empty when a closed-loop feature's start point was not found.
    pub tour: Tour,

    /// Number of pixels that matched the feature color.
    pub matched: usize,

    /// Non-fatal problem encountered while arranging the tour.
    pub warning: Option<WrapError>,
}

/// Result of running the pipeline over every configured feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Per-feature results, in configured order.
    pub features: Vec<FeatureResult>,

    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,
}

impl ExtractResult {
    /// Look up a feature's result by name.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&FeatureResult> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Iterate over every warning raised during the run.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &WrapError)> {
        self.features
            .iter()
            .filter_map(|f| f.warning.as_ref().map(|w| (f.name.as_str(), w)))
    }
}

/// Fatal errors that abort an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Extraction configuration is invalid.
    #[error("invalid extraction configuration: {0}")]
    InvalidConfig(String),
}
