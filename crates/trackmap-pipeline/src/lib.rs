//! trackmap-pipeline: Pure feature extraction pipeline (sans-IO).
//!
//! Turns a hand-painted raster map into ordered coordinate lists,
//! one per feature color:
//! decode -> color scan -> nearest-neighbor tour -> optional loop wrap.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. Reading files and printing
//! reports lives in the `trackmap` binary.

pub mod color;
pub mod decode;
pub mod diagnostics;
pub mod scan;
pub mod tour;
pub mod types;
pub mod wrap;

pub use types::{
    Coordinate, Dimensions, ExtractConfig, ExtractResult, FeatureResult, FeatureSpec,
    PipelineError, Rgba, RgbaImage, Tour,
};
pub use wrap::{FeatureLayout, TourArranger, WrapError};

/// Run the full extraction pipeline.
///
/// Decodes the image once, then runs every configured feature through
/// its own independent pass, in order.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails validation.
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
///
/// A loop start missing from its feature is not an error here; it is
/// recorded as a warning on that feature's [`FeatureResult`].
pub fn process(image_bytes: &[u8], config: &ExtractConfig) -> Result<ExtractResult, PipelineError> {
    config.validate()?;

    let image = decode::decode_rgba(image_bytes)?;
    let dimensions = Dimensions {
        width: image.width(),
        height: image.height(),
    };

    let features = config
        .features
        .iter()
        .map(|spec| extract_feature(&image, spec, config.threshold))
        .collect();

    Ok(ExtractResult {
        features,
        dimensions,
    })
}

/// Run one feature's pass over an already decoded image.
///
/// # Pipeline steps
///
/// 1. Scan for pixels matching the feature color
/// 2. Order them by greedy nearest-neighbor chaining
/// 3. Wrap into a closed loop if the layout asks for it
///
/// If wrapping fails the feature comes back with an empty tour and the
/// failure in [`FeatureResult::warning`].
#[must_use]
pub fn extract_feature(image: &RgbaImage, spec: &FeatureSpec, threshold: f64) -> FeatureResult {
    let coordinates = scan::scan(image, spec.color, threshold);
    let matched = coordinates.len();
    let tour = tour::build_tour(&coordinates);

    let (tour, warning) = match spec.layout.arrange(tour) {
        Ok(tour) => (tour, None),
        Err(e) => (Tour::default(), Some(e)),
    };

    FeatureResult {
        name: spec.name.clone(),
        tour,
        matched,
        warning,
    }
}
