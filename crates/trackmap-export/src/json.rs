//! JSON scene document serializer.
//!
//! Produces one object keyed by feature name, each value an array of
//! `{"x": .., "z": ..}` records -- the shape the scene loader reads a
//! track file in. Keys are written in configured feature order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use trackmap_pipeline::ExtractResult;

/// Serialize every feature of a run as a pretty-printed JSON object.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn to_json(result: &ExtractResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SceneDocument(result))
}

/// Ordered map view of an [`ExtractResult`].
struct SceneDocument<'a>(&'a ExtractResult);

impl Serialize for SceneDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.features.len()))?;
        for feature in &self.0.features {
            map.serialize_entry(&feature.name, &feature.tour)?;
        }
        map.end()
    }
}
