//! Trapezoid shaped mixing weights for a single grain.

use crate::{utils::time::seconds_to_frames_round, Grain};

// -------------------------------------------------------------------------------------------------

/// Per sample mixing weights of a grain, built from three index ranges:
///
/// - ramp up: `[0, ramp_up_end)` with a weight of `i / ramp_up_end`,
/// - plateau: `[plateau_start, ramp_up_end)` with a weight of `1.0`,
/// - ramp down: `[ramp_up_end, len)` with a weight falling from `1.0` by
///   `1.0 / (len - ramp_up_end)` per sample, never reaching 0.
///
/// The ramp up ends where the grain's *ramp out* duration ends and the plateau starts where the
/// *ramp in* duration ends. The plateau range overlaps the ramp up range, so samples in
/// `[plateau_start, ramp_up_end)` receive both weights. The ranges are empty when their bounds
/// meet or cross, so a zero length ramp never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrainEnvelope {
    len: usize,
    plateau_start: usize,
    ramp_up_end: usize,
}

impl GrainEnvelope {
    /// Create an envelope from raw frame positions.
    ///
    /// `ramp_up_end` must not exceed `len`.
    pub fn new(len: usize, plateau_start: usize, ramp_up_end: usize) -> Self {
        debug_assert!(ramp_up_end <= len, "Ramp exceeds the envelope's length");
        Self {
            len,
            plateau_start,
            ramp_up_end,
        }
    }

    /// Create an envelope for the given grain at the given sample rate.
    ///
    /// Returns `None` if the grain's ramp out duration reaches past its samples.
    pub fn from_grain(grain: &Grain, sample_rate: u32) -> Option<Self> {
        let len = grain.len();
        let plateau_start = seconds_to_frames_round(grain.ramp_in(), sample_rate);
        let ramp_up_end = seconds_to_frames_round(grain.ramp_out(), sample_rate);
        if ramp_up_end > len {
            return None;
        }
        Some(Self::new(len, plateau_start, ramp_up_end))
    }

    /// Number of samples the envelope covers.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the envelope covers no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index at which the plateau starts.
    pub fn plateau_start(&self) -> usize {
        self.plateau_start
    }

    /// Index at which the ramp up ends and the ramp down starts.
    pub fn ramp_up_end(&self) -> usize {
        self.ramp_up_end
    }

    /// Invoke `f(index, weight)` for every weighted contribution of the envelope: the ramp up,
    /// then the plateau, then the ramp down. Indices in the plateau's overlap with the ramp up
    /// are visited twice. Every visited index is smaller than [`Self::len`].
    pub fn for_each_weight<F: FnMut(usize, f32)>(&self, mut f: F) {
        let ramp_up_end = self.ramp_up_end.min(self.len);

        for index in 0..ramp_up_end {
            f(index, index as f32 / ramp_up_end as f32);
        }

        for index in self.plateau_start..ramp_up_end {
            f(index, 1.0);
        }

        if ramp_up_end < self.len {
            let step = 1.0 / (self.len - ramp_up_end) as f32;
            let mut weight = 1.0f32;
            for index in ramp_up_end..self.len {
                f(index, weight);
                weight -= step;
            }
        }
    }

    /// Summed weights for each index of the envelope.
    pub fn weights(&self) -> Vec<f32> {
        let mut weights = vec![0.0; self.len];
        self.for_each_weight(|index, weight| weights[index] += weight);
        weights
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_up_and_down() {
        let envelope = GrainEnvelope::new(8, 4, 4);
        let weights = envelope.weights();
        assert_eq!(
            weights,
            vec![0.0, 0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25]
        );
    }

    #[test]
    fn plateau_overlaps_ramp_up() {
        // plateau [2, 4) gets added on top of the ramp up [0, 4)
        let envelope = GrainEnvelope::new(6, 2, 4);
        let weights = envelope.weights();
        assert_eq!(weights, vec![0.0, 0.25, 1.5, 1.75, 1.0, 0.5]);

        let mut visits = 0;
        envelope.for_each_weight(|_, _| visits += 1);
        assert_eq!(visits, 4 + 2 + 2);
    }

    #[test]
    fn crossing_plateau_is_empty() {
        let envelope = GrainEnvelope::new(6, 5, 3);
        let weights = envelope.weights();
        let expected = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, 2.0 / 3.0, 1.0 / 3.0];
        for (weight, expected) in weights.iter().zip(expected) {
            assert!((weight - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_ramps() {
        // no ramp up: ramp down over the whole grain
        let weights = GrainEnvelope::new(4, 0, 0).weights();
        assert_eq!(weights, vec![1.0, 0.75, 0.5, 0.25]);

        // no ramp down: ramp up over the whole grain
        let weights = GrainEnvelope::new(4, 4, 4).weights();
        assert_eq!(weights, vec![0.0, 0.25, 0.5, 0.75]);

        // nothing at all
        assert!(GrainEnvelope::new(0, 0, 0).weights().is_empty());
        assert!(GrainEnvelope::new(0, 0, 0).is_empty());
    }

    #[test]
    fn from_grain() {
        let grain = Grain::new(0.0, 0.2, 0.09, 0.09, vec![0.0; 8820]);
        let envelope = GrainEnvelope::from_grain(&grain, 44100).unwrap();
        assert_eq!(envelope.len(), 8820);
        assert_eq!(envelope.plateau_start(), 3969);
        assert_eq!(envelope.ramp_up_end(), 3969);

        let weights = envelope.weights();
        assert_eq!(weights[0], 0.0);
        assert_eq!(weights[3969], 1.0);
        assert!(weights[8819] > 0.0);
        assert!(weights.iter().all(|w| (0.0..=1.0).contains(w)));

        let too_long_ramp = Grain::new(0.0, 0.1, 0.0, 0.2, vec![0.0; 4410]);
        assert!(GrainEnvelope::from_grain(&too_long_ramp, 44100).is_none());
    }
}
