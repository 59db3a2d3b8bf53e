//! The grain value type that flows from the extractor, through the scaler, into the
//! reconstructor.

pub mod envelope;

// -------------------------------------------------------------------------------------------------

/// A short fixed-length fragment of mono PCM audio, extracted from a source buffer, together
/// with its placement on the output timeline and its fade envelope.
///
/// All times are in seconds. The original extraction position is immutable once created; the
/// output position (`start`) is the only mutable part of a grain and gets rewritten by the
/// [scaler](crate::scale).
#[derive(Debug, Clone, PartialEq)]
pub struct Grain {
    /// Position where the grain was taken from in the source.
    original_start: f32,
    /// Position at which the grain gets mixed into the output.
    start: f32,
    /// Nominal duration. Matches `samples.len() / sample_rate`.
    width: f32,
    /// Linear fade-in duration.
    ramp_in: f32,
    /// Linear fade-out duration.
    ramp_out: f32,
    /// The grain's PCM samples, zero-padded past the source's end.
    samples: Vec<f32>,
}

impl Grain {
    /// Create a new grain at the given source position. The output position initially is
    /// the source position.
    pub fn new(
        original_start: f32,
        width: f32,
        ramp_in: f32,
        ramp_out: f32,
        samples: Vec<f32>,
    ) -> Self {
        Self {
            original_start,
            start: original_start,
            width,
            ramp_in,
            ramp_out,
            samples,
        }
    }

    /// Position in seconds where this grain was extracted from the source.
    pub fn original_start(&self) -> f32 {
        self.original_start
    }

    /// Position in seconds at which this grain gets mixed into the output.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Move the grain to a new output position in seconds.
    pub fn set_start(&mut self, start: f32) {
        self.start = start;
    }

    /// Nominal grain duration in seconds.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Fade-in duration in seconds.
    pub fn ramp_in(&self) -> f32 {
        self.ramp_in
    }

    /// Fade-out duration in seconds.
    pub fn ramp_out(&self) -> f32 {
        self.ramp_out
    }

    /// The grain's PCM samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples in the grain.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the grain holds no samples at all.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_independent_from_original_start() {
        let mut grain = Grain::new(0.5, 0.2, 0.09, 0.09, vec![0.0; 8820]);
        assert_eq!(grain.start(), 0.5);
        assert_eq!(grain.original_start(), 0.5);
        assert_eq!(grain.len(), 8820);
        assert!(!grain.is_empty());

        grain.set_start(1.25);
        assert_eq!(grain.start(), 1.25);
        assert_eq!(grain.original_start(), 0.5);
    }
}
