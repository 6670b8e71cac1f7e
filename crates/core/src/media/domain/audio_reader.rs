use std::path::Path;

use crate::shared::waveform::Waveform;

/// Domain interface for decoding an audio file into a mono waveform at the
/// requested sample rate.
pub trait AudioReader: Send {
    fn load(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Waveform, Box<dyn std::error::Error>>;
}
