//! trackmap-export: Pure format serializers (sans-IO)
//!
//! Converts extraction results into output text. Supports the
//! coordinate listing and a JSON scene document.

pub mod json;
pub mod listing;

pub use json::to_json;
pub use listing::{SEPARATOR, emit, to_listing};
