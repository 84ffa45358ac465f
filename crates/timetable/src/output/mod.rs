//! Rendering of command results.

pub mod pretty;

use serde::Serialize;

/// Renders a value as one line of JSON. Unserializable values render empty.
pub fn json_line<T: Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to render JSON output");
            String::new()
        }
    }
}
