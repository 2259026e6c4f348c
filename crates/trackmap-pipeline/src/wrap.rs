//! Loop wrapping: turn an open tour into a closed loop from a chosen
//! start.
//!
//! Race tracks are drawn as a ring of pixels, so the ordered tour must
//! begin at the start line and return to it. This module defines the
//! [`TourArranger`] trait for the final arrangement step and the
//! [`FeatureLayout`] enum selecting it per feature.

use serde::{Deserialize, Serialize};

use crate::types::{Coordinate, Tour};

/// Selects how a feature's ordered tour is arranged for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// Emit the nearest-neighbor order as is (trees, power-ups, lake).
    #[default]
    Open,

    /// Rotate the tour to begin at `start` and close it by repeating
    /// `start` at the end.
    Closed {
        /// Coordinate the loop begins and ends at.
        start: Coordinate,
    },
}

/// The loop start was not one of the tour's coordinates.
///
/// Reported rather than fatal: the feature is emitted empty and the
/// rest of the run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum WrapError {
    /// `start` does not appear in the tour.
    #[error("starting point ({}, {}) not found in the ordered coordinates", .start.x, .start.z)]
    StartPointNotFound {
        /// The requested loop start.
        start: Coordinate,
    },
}

/// Trait for the arrangement step applied after tour construction.
pub trait TourArranger {
    /// Arrange an ordered tour for output.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError`] if the arrangement cannot be applied to
    /// this tour.
    fn arrange(&self, tour: Tour) -> Result<Tour, WrapError>;
}

impl TourArranger for FeatureLayout {
    fn arrange(&self, tour: Tour) -> Result<Tour, WrapError> {
        match *self {
            Self::Open => Ok(tour),
            Self::Closed { start } => wrap_tour(tour, start),
        }
    }
}

/// Rotate `tour` so it begins at `start`, then append `start` again.
///
/// The coordinates before `start` move to the end in their original
/// order, so the cyclic order is unchanged. The result is one longer
/// than the input and its first and last coordinates are both `start`.
///
/// # Errors
///
/// Returns [`WrapError::StartPointNotFound`] if `start` is not in the
/// tour, including when the tour is empty.
pub fn wrap_tour(tour: Tour, start: Coordinate) -> Result<Tour, WrapError> {
    let Some(start_idx) = tour.coordinates().iter().position(|&c| c == start) else {
        return Err(WrapError::StartPointNotFound { start });
    };

    let mut coordinates = tour.into_coordinates();
    coordinates.rotate_left(start_idx);
    coordinates.push(start);
    Ok(Tour::new(coordinates))
}
