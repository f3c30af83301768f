//! Transcript segment type.
//!
//! Segments arrive from the transcript-acquisition service as timestamped
//! text units and are never modified here — the chunker only reads them.

use serde::{Deserialize, Serialize};

/// A timestamped unit of source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Spoken text of this segment.
    pub text: String,
    /// Start time in seconds from the beginning of the recording.
    #[serde(default)]
    pub start_secs: f64,
    /// Duration of the segment in seconds.
    #[serde(default)]
    pub duration_secs: f64,
}

impl Segment {
    /// Convenience constructor.
    pub fn new(text: impl Into<String>, start_secs: f64, duration_secs: f64) -> Self {
        Self {
            text: text.into(),
            start_secs,
            duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_missing_timestamps() {
        let segment: Segment = serde_json::from_str(r#"{"text": "hello there"}"#).unwrap();
        assert_eq!(segment.text, "hello there");
        assert_eq!(segment.start_secs, 0.0);
        assert_eq!(segment.duration_secs, 0.0);
    }
}
