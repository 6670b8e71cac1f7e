/// Decoded mono audio: PCM samples normalized to [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let w = Waveform::new(vec![0.0; 48000], 16000);
        assert_eq!(w.duration(), 3.0);
    }

    #[test]
    fn test_empty() {
        let w = Waveform::new(Vec::new(), 16000);
        assert!(w.is_empty());
        assert_eq!(w.duration(), 0.0);
    }
}
