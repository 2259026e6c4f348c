//! Color matching: decide whether a sampled pixel is an instance of a
//! feature color.
//!
//! Distance is Euclidean across all four RGBA channels. Background
//! white is handled separately by [`is_background`]; the scanner skips
//! those pixels before any distance test.

use crate::types::Rgba;

/// Euclidean distance between two colors across R, G, B and A.
#[must_use]
pub fn color_distance(a: Rgba, b: Rgba) -> f64 {
    let sum: u32 = a
        .channels()
        .iter()
        .zip(b.channels())
        .map(|(&ca, cb)| {
            let d = u32::from(ca.abs_diff(cb));
            d * d
        })
        .sum();
    f64::from(sum).sqrt()
}

/// Returns `true` if `sample` is within `threshold` of `target`.
///
/// The comparison is inclusive: a distance exactly equal to the
/// threshold matches.
#[must_use]
pub fn matches(sample: Rgba, target: Rgba, threshold: f64) -> bool {
    color_distance(sample, target) <= threshold
}

/// Returns `true` for exactly opaque white, the map canvas.
///
/// Background pixels are never tested against a target color, however
/// close that target is to white.
#[must_use]
pub fn is_background(sample: Rgba) -> bool {
    sample == Rgba::WHITE
}
