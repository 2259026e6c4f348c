//! Extraction diagnostics: timing and counts for each feature pass.
//!
//! The pipeline crate never reads the system clock itself. Callers
//! supply a [`Clock`] so timing works the same on native targets and
//! in tests.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::types::{
    Dimensions, ExtractConfig, ExtractResult, FeatureResult, FeatureSpec, PipelineError,
};
use crate::wrap::{FeatureLayout, TourArranger};

/// Source of timestamps for diagnostics.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// Capture the current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractDiagnostics {
    /// Size of the encoded input in bytes.
    pub input_bytes: usize,
    /// Decoded image dimensions.
    pub dimensions: Dimensions,
    /// Time spent decoding the image.
    #[serde(with = "duration_serde")]
    pub decode_duration: Duration,
    /// One entry per configured feature, in order.
    pub features: Vec<FeatureDiagnostics>,
    /// Wall-clock duration of the whole run.
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Diagnostics for one feature's pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDiagnostics {
    /// Feature key.
    pub name: String,
    /// Pixels matching the feature color.
    pub matched: usize,
    /// Coordinates in the emitted tour (one more than `matched` for a
    /// wrapped loop, zero when wrapping failed).
    pub emitted: usize,
    /// Whether the feature was wrapped into a closed loop.
    pub closed: bool,
    /// Total path length of the emitted tour in pixels.
    pub path_length: f64,
    /// Time spent scanning pixels.
    #[serde(with = "duration_serde")]
    pub scan_duration: Duration,
    /// Time spent ordering coordinates.
    #[serde(with = "duration_serde")]
    pub tour_duration: Duration,
    /// Time spent wrapping (zero for open features).
    #[serde(with = "duration_serde")]
    pub wrap_duration: Duration,
}

/// Run the pipeline while timing every stage.
///
/// Produces the same [`ExtractResult`] as [`crate::process`].
///
/// # Errors
///
/// Same as [`crate::process`].
pub fn process_with_diagnostics<C: Clock>(
    image_bytes: &[u8],
    config: &ExtractConfig,
    clock: &C,
) -> Result<(ExtractResult, ExtractDiagnostics), PipelineError> {
    let run_start = clock.now();
    config.validate()?;

    let decode_start = clock.now();
    let image = crate::decode::decode_rgba(image_bytes)?;
    let decode_duration = clock.elapsed(&decode_start);
    let dimensions = Dimensions {
        width: image.width(),
        height: image.height(),
    };

    let mut features = Vec::with_capacity(config.features.len());
    let mut feature_diagnostics = Vec::with_capacity(config.features.len());
    for spec in &config.features {
        let (result, diag) = extract_feature_timed(&image, spec, config.threshold, clock);
        features.push(result);
        feature_diagnostics.push(diag);
    }

    let result = ExtractResult {
        features,
        dimensions,
    };
    let diagnostics = ExtractDiagnostics {
        input_bytes: image_bytes.len(),
        dimensions,
        decode_duration,
        features: feature_diagnostics,
        total_duration: clock.elapsed(&run_start),
    };
    Ok((result, diagnostics))
}

fn extract_feature_timed<C: Clock>(
    image: &RgbaImage,
    spec: &FeatureSpec,
    threshold: f64,
    clock: &C,
) -> (FeatureResult, FeatureDiagnostics) {
    let t = clock.now();
    let coordinates = crate::scan::scan(image, spec.color, threshold);
    let scan_duration = clock.elapsed(&t);

    let t = clock.now();
    let tour = crate::tour::build_tour(&coordinates);
    let tour_duration = clock.elapsed(&t);

    let t = clock.now();
    let (tour, warning) = match spec.layout.arrange(tour) {
        Ok(tour) => (tour, None),
        Err(e) => (crate::types::Tour::default(), Some(e)),
    };
    let wrap_duration = clock.elapsed(&t);

    let diag = FeatureDiagnostics {
        name: spec.name.clone(),
        matched: coordinates.len(),
        emitted: tour.len(),
        closed: matches!(spec.layout, FeatureLayout::Closed { .. }),
        path_length: crate::tour::tour_length(&tour),
        scan_duration,
        tour_duration,
        wrap_duration,
    };
    let result = FeatureResult {
        name: spec.name.clone(),
        tour,
        matched: coordinates.len(),
        warning,
    };
    (result, diag)
}

impl ExtractDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Extraction Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} bytes)",
            self.dimensions.width, self.dimensions.height, self.input_bytes,
        ));
        lines.push(format!(
            "Decode: {:.3}ms  |  Total: {:.3}ms",
            duration_ms(self.decode_duration),
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10}",
            "Feature", "Matched", "Emitted", "Length", "Scan", "Tour", "Wrap"
        ));
        lines.push("-".repeat(80));

        for f in &self.features {
            let name = if f.closed {
                format!("{} (loop)", f.name)
            } else {
                f.name.clone()
            };
            lines.push(format!(
                "{name:<16} {:>8} {:>8} {:>10.1} {:>8.3}ms {:>8.3}ms {:>8.3}ms",
                f.matched,
                f.emitted,
                f.path_length,
                duration_ms(f.scan_duration),
                duration_ms(f.tour_duration),
                duration_ms(f.wrap_duration),
            ));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::types::{Coordinate, Rgba};

    /// Clock that advances one millisecond per reading.
    struct TickClock {
        ticks: Cell<u64>,
    }

    impl Clock for TickClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.ticks.get();
            self.ticks.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.ticks.get() - since)
        }
    }

    fn png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let ms = duration_ms(Duration::from_millis(1234));
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn diagnostics_match_plain_process() {
        let img = RgbaImage::from_fn(6, 6, |x, y| match (x, y) {
            (0..=2, 0) => image::Rgba([255, 0, 0, 255]),
            (5, 5) => image::Rgba([0, 255, 0, 255]),
            _ => image::Rgba([255, 255, 255, 255]),
        });
        let bytes = png(&img);
        let config = ExtractConfig::default().with_loop_start(Coordinate::new(1, 0));
        let clock = TickClock {
            ticks: Cell::new(0),
        };

        let (result, diag) = process_with_diagnostics(&bytes, &config, &clock).unwrap();
        assert_eq!(result, crate::process(&bytes, &config).unwrap());

        assert_eq!(diag.input_bytes, bytes.len());
        assert_eq!(diag.features.len(), 4);
        let track = &diag.features[0];
        assert!(track.closed);
        assert_eq!(track.matched, 3);
        assert_eq!(track.emitted, 4);
        assert!((track.path_length - 4.0).abs() < f64::EPSILON);
        assert_eq!(diag.features[1].matched, 1);
        assert!(diag.total_duration > Duration::ZERO);
    }

    #[test]
    fn diagnostics_reject_invalid_config() {
        let config = ExtractConfig {
            threshold: f64::INFINITY,
            features: vec![FeatureSpec::open("trees", Rgba::GREEN)],
        };
        let clock = TickClock {
            ticks: Cell::new(0),
        };
        let result = process_with_diagnostics(&[1, 2, 3], &config, &clock);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn report_lists_every_feature() {
        let diag = ExtractDiagnostics {
            input_bytes: 1000,
            dimensions: Dimensions {
                width: 100,
                height: 80,
            },
            decode_duration: Duration::from_millis(3),
            features: vec![
                FeatureDiagnostics {
                    name: "track".to_string(),
                    matched: 120,
                    emitted: 121,
                    closed: true,
                    path_length: 130.5,
                    scan_duration: Duration::from_millis(2),
                    tour_duration: Duration::from_millis(4),
                    wrap_duration: Duration::from_micros(10),
                },
                FeatureDiagnostics {
                    name: "lake".to_string(),
                    matched: 0,
                    emitted: 0,
                    closed: false,
                    path_length: 0.0,
                    scan_duration: Duration::from_millis(2),
                    tour_duration: Duration::ZERO,
                    wrap_duration: Duration::ZERO,
                },
            ],
            total_duration: Duration::from_millis(12),
        };

        let report = diag.report();
        assert!(report.contains("Extraction Diagnostics Report"));
        assert!(report.contains("track (loop)"));
        assert!(report.contains("lake"));
        assert!(report.contains("100x80"));
    }

    #[test]
    fn diagnostics_serialize_durations_as_seconds() {
        let diag = FeatureDiagnostics {
            name: "trees".to_string(),
            matched: 1,
            emitted: 1,
            closed: false,
            path_length: 0.0,
            scan_duration: Duration::from_millis(1500),
            tour_duration: Duration::ZERO,
            wrap_duration: Duration::ZERO,
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert!((json["scan_duration"].as_f64().unwrap() - 1.5).abs() < f64::EPSILON);
    }
}
