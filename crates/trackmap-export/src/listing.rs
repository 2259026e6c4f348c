//! Coordinate listing serializer.
//!
//! Renders each feature as a quoted key followed by an array of
//! `x`/`z` records, one field per line:
//!
//! ```text
//! "track": [
//!   {
//!     "x": 12,
//!     "z": 68
//!   },
//! ]
//! ```
//!
//! Every record carries a trailing comma, including the last one, so
//! blocks can be pasted into a scene file by hand. Feature blocks are
//! separated by [`SEPARATOR`].
//!
//! This is a pure function with no I/O -- it returns a `String`.

use std::fmt::Write;

use trackmap_pipeline::{ExtractResult, Tour};

/// Line printed between feature blocks.
pub const SEPARATOR: &str = "=================================";

/// Render one named coordinate sequence as a listing block.
///
/// Records appear in the tour's order, unmodified. The block ends with
/// a newline.
///
/// # Examples
///
/// ```
/// use trackmap_pipeline::{Coordinate, Tour};
/// use trackmap_export::listing::emit;
///
/// let tour = Tour::new(vec![Coordinate::new(3, 4)]);
/// assert_eq!(
///     emit("trees", &tour),
///     "\"trees\": [\n  {\n    \"x\": 3,\n    \"z\": 4\n  },\n]\n",
/// );
/// ```
#[must_use]
pub fn emit(name: &str, tour: &Tour) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}: [", quote(name));
    for coordinate in tour.coordinates() {
        let _ = writeln!(out, "  {{");
        let _ = writeln!(out, "    \"x\": {},", coordinate.x);
        let _ = writeln!(out, "    \"z\": {}", coordinate.z);
        let _ = writeln!(out, "  }},");
    }
    let _ = writeln!(out, "]");

    out
}

/// Render every feature of a run, in configured order, with
/// [`SEPARATOR`] lines between blocks.
#[must_use]
pub fn to_listing(result: &ExtractResult) -> String {
    let blocks: Vec<String> = result
        .features
        .iter()
        .map(|feature| emit(&feature.name, &feature.tour))
        .collect();

    blocks.join(&format!("{SEPARATOR}\n"))
}

/// Quote a feature name as a JSON string literal.
fn quote(name: &str) -> String {
    serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
}
