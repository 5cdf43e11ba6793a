//! Recorded hand-tracking sessions for offline replay.

use crate::skeleton::HandSample;
use crate::transform::Viewpoint;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One frame: the raw sample and where the observer was
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub sample: HandSample,
    #[serde(default)]
    pub viewpoint: Viewpoint,
}

/// Ordered frames of one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if timestamps go backwards.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let recording: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::RecordingError(format!("Failed to parse recording: {e}")))?;
        recording.validate()?;
        Ok(recording)
    }

    /// Save the recording to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::RecordingError(format!("Failed to serialize recording: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that timestamps never decrease
    ///
    /// # Errors
    ///
    /// Returns an error naming the first frame that goes back in time.
    pub fn validate(&self) -> Result<()> {
        for (index, pair) in self.frames.windows(2).enumerate() {
            if pair[1].sample.timestamp < pair[0].sample.timestamp {
                return Err(Error::RecordingError(format!(
                    "Frame {} goes back in time ({} < {})",
                    index + 1,
                    pair[1].sample.timestamp,
                    pair[0].sample.timestamp
                )));
            }
        }
        Ok(())
    }

    /// Number of frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the recording has no frames
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
