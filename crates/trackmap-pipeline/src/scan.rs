//! Feature scanning: collect every pixel coordinate matching a target
//! color.
//!
//! Pixels are visited column by column (every `y` for `x = 0`, then
//! every `y` for `x = 1`, ...). The resulting order carries no meaning
//! of its own but seeds the tour builder, so it must be reproducible.

use image::RgbaImage;

use crate::color;
use crate::types::{Coordinate, Rgba};

/// Collect the coordinates of all pixels matching `target`.
///
/// Opaque white pixels are skipped outright. Every other pixel is kept
/// if its color lies within `threshold` of `target`. Coordinates are
/// returned in scan order, each pixel at most once.
#[must_use = "returns the matching coordinates"]
pub fn scan(image: &RgbaImage, target: Rgba, threshold: f64) -> Vec<Coordinate> {
    let (width, height) = image.dimensions();
    let mut found = Vec::new();

    for x in 0..width {
        for y in 0..height {
            let sample = Rgba::from(*image.get_pixel(x, y));
            if color::is_background(sample) {
                continue;
            }
            if color::matches(sample, target, threshold) {
                found.push(Coordinate::new(x, y));
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_from(width: u32, height: u32, f: impl Fn(u32, u32) -> Rgba) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| f(x, y).into())
    }

    #[test]
    fn red_white_red_row() {
        let img = image_from(3, 1, |x, _| if x == 1 { Rgba::WHITE } else { Rgba::RED });
        let found = scan(&img, Rgba::RED, 50.0);
        assert_eq!(found, vec![Coordinate::new(0, 0), Coordinate::new(2, 0)]);
    }

    #[test]
    fn empty_image_yields_nothing() {
        let img = RgbaImage::new(0, 0);
        assert!(scan(&img, Rgba::RED, 50.0).is_empty());
    }

    #[test]
    fn all_white_yields_nothing() {
        let img = image_from(4, 4, |_, _| Rgba::WHITE);
        assert!(scan(&img, Rgba::RED, 50.0).is_empty());
    }

    #[test]
    fn white_never_matches_even_a_white_target() {
        let img = image_from(2, 2, |_, _| Rgba::WHITE);
        assert!(scan(&img, Rgba::WHITE, 510.0).is_empty());
    }

    #[test]
    fn near_white_is_not_background() {
        let img = image_from(1, 1, |_, _| Rgba::new(250, 250, 250, 255));
        assert_eq!(scan(&img, Rgba::WHITE, 50.0), vec![Coordinate::new(0, 0)]);
    }

    #[test]
    fn scan_order_is_column_major() {
        let img = image_from(2, 2, |_, _| Rgba::BLUE);
        let found = scan(&img, Rgba::BLUE, 50.0);
        assert_eq!(
            found,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(0, 1),
                Coordinate::new(1, 0),
                Coordinate::new(1, 1),
            ]
        );
    }

    #[test]
    fn count_matches_predicate_and_is_deterministic() {
        // Checkerboard of green and approximate-green with a few reds.
        let img = image_from(9, 7, |x, y| match (x + y) % 3 {
            0 => Rgba::GREEN,
            1 => Rgba::new(20, 230, 15, 255),
            _ => Rgba::RED,
        });
        let expected = img
            .pixels()
            .filter(|p| {
                let c = Rgba::from(**p);
                !color::is_background(c) && color::matches(c, Rgba::GREEN, 50.0)
            })
            .count();

        let first = scan(&img, Rgba::GREEN, 50.0);
        let second = scan(&img, Rgba::GREEN, 50.0);
        assert_eq!(first.len(), expected);
        assert_eq!(first, second);

        let mut unique = first.clone();
        unique.sort_by_key(|c| (c.x, c.z));
        unique.dedup();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn vertical_axis_becomes_z() {
        let img = image_from(1, 5, |_, y| if y == 3 { Rgba::MAGENTA } else { Rgba::WHITE });
        assert_eq!(scan(&img, Rgba::MAGENTA, 50.0), vec![Coordinate::new(0, 3)]);
    }
}
