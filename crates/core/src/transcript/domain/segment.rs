use serde::{Deserialize, Serialize};

/// One timestamped transcript line, in seconds relative to the file start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptionSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
