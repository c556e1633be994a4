//! Step configuration and its JSON persistence.
//!
//! The persisted document is a JSON object with sorted keys and a 4-space
//! indent:
//!
//! ```json
//! {
//!     "frames_per_second": 30,
//!     "identifier": "images"
//! }
//! ```
//!
//! Loading is a merge: keys present in the document overwrite the current
//! values, missing keys keep them, unknown keys are reported and dropped.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_FRAMES_PER_SECOND: f64 = 30.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fields are declared in key order so the serialized object comes out sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    #[serde(serialize_with = "serialize_rate")]
    pub frames_per_second: f64,
    pub identifier: String,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            identifier: String::new(),
        }
    }
}

/// A partially specified configuration, as read from a persisted document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigPatch {
    pub frames_per_second: Option<f64>,
    pub identifier: Option<String>,
    #[serde(flatten)]
    pub unrecognized: Map<String, Value>,
}

impl StepConfig {
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Merge a persisted document over the current values.
    pub fn merge_json(&mut self, text: &str) -> Result<(), ConfigError> {
        let patch: ConfigPatch = serde_json::from_str(text)?;
        self.merge(patch);
        Ok(())
    }

    pub fn merge(&mut self, patch: ConfigPatch) {
        for key in patch.unrecognized.keys() {
            warn!(key = %key, "ignoring unrecognized configuration key");
        }
        if let Some(frames_per_second) = patch.frames_per_second {
            self.frames_per_second = frames_per_second;
        }
        if let Some(identifier) = patch.identifier {
            self.identifier = identifier;
        }
    }
}

// Whole-number rates are written as integers, matching documents saved by
// earlier versions of the step.
fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if rate.is_finite() && rate.fract() == 0.0 && rate.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*rate as i64)
    } else {
        serializer.serialize_f64(*rate)
    }
}
