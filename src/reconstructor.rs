//! Weighted overlap-add resynthesis of grains into a continuous output buffer.

use assume::assume;

use crate::{
    grain::envelope::GrainEnvelope,
    utils::{buffer::scale_buffer, time::seconds_to_frames_round},
    Error, Grain,
};

// -------------------------------------------------------------------------------------------------

/// A validated grain with its output frame position and mixing envelope.
struct GrainPlacement<'a> {
    grain: &'a Grain,
    start_index: usize,
    end_index: usize,
    envelope: GrainEnvelope,
}

impl<'a> GrainPlacement<'a> {
    fn new(index: usize, grain: &'a Grain, sample_rate: u32) -> Result<Self, Error> {
        if !grain.start().is_finite() || grain.start() < 0.0 {
            return Err(Error::InvalidGrainError(
                index,
                format!("start time must be zero or positive, got {}", grain.start()),
            ));
        }
        if grain.is_empty() {
            return Err(Error::InvalidGrainError(index, "grain has no samples".to_string()));
        }
        if !grain.ramp_in().is_finite()
            || !grain.ramp_out().is_finite()
            || grain.ramp_in() < 0.0
            || grain.ramp_out() < 0.0
        {
            return Err(Error::InvalidGrainError(
                index,
                format!(
                    "ramps must be zero or positive, got {} and {}",
                    grain.ramp_in(),
                    grain.ramp_out()
                ),
            ));
        }
        let envelope = GrainEnvelope::from_grain(grain, sample_rate).ok_or_else(|| {
            Error::InvalidGrainError(
                index,
                format!(
                    "ramp out of {}s exceeds the grain's {} samples",
                    grain.ramp_out(),
                    grain.len()
                ),
            )
        })?;
        let start_index = seconds_to_frames_round(grain.start(), sample_rate);
        let end_index = start_index.checked_add(grain.len()).ok_or_else(|| {
            Error::InvalidGrainError(
                index,
                format!("start time {}s is out of range", grain.start()),
            )
        })?;
        Ok(Self {
            grain,
            start_index,
            end_index,
            envelope,
        })
    }

    fn end_index(&self) -> usize {
        self.end_index
    }
}

// -------------------------------------------------------------------------------------------------

/// Reconstruct a continuous mono signal from the given grains.
///
/// Every grain is mixed in at `round(start * sample_rate)`, weighted by its
/// [`GrainEnvelope`]. Weights get accumulated alongside the samples and each output sample
/// becomes the weighted average of all grains covering it, multiplied by `gain`. Positions no
/// grain contributes to are silent.
///
/// The output length is the largest `round(start * sample_rate) + len` of all grains, so the
/// grains don't need to be ordered.
///
/// Fails if `grains` is empty, or if any grain has a negative or non-finite start, no
/// samples, or a ramp out that exceeds its samples.
pub fn reconstruct(grains: &[Grain], sample_rate: u32, gain: f32) -> Result<Vec<f32>, Error> {
    if sample_rate == 0 {
        return Err(Error::ParameterError(
            "Sample rate must be greater than zero".to_string(),
        ));
    }
    if !gain.is_finite() {
        return Err(Error::ParameterError(format!(
            "Gain must be a finite number, got {gain}"
        )));
    }
    if grains.is_empty() {
        return Err(Error::EmptyGrainsError);
    }

    let placements = grains
        .iter()
        .enumerate()
        .map(|(index, grain)| GrainPlacement::new(index, grain, sample_rate))
        .collect::<Result<Vec<_>, _>>()?;

    let output_len = placements
        .iter()
        .map(GrainPlacement::end_index)
        .max()
        .unwrap_or(0);

    // accumulated sample * weight and accumulated weight
    let mut accum = vec![0.0f32; output_len];
    let mut weights = vec![0.0f32; output_len];

    for placement in &placements {
        let range = placement.start_index..placement.end_index();
        let accum = &mut accum[range.clone()];
        let weights = &mut weights[range];
        let samples = placement.grain.samples();
        let len = samples.len();
        placement.envelope.for_each_weight(|index, weight| {
            assume!(unsafe: index < len, "Envelope indices are within the grain's length");
            accum[index] += weight * samples[index];
            weights[index] += weight;
        });
    }

    for (sample, weight) in accum.iter_mut().zip(weights.iter()) {
        if *weight == 0.0 {
            *sample = 0.0;
        } else {
            *sample /= *weight;
        }
    }
    scale_buffer(&mut accum, gain);

    log::debug!(
        "Reconstructed {} samples from {} grains",
        accum.len(),
        grains.len()
    );

    Ok(accum)
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use crate::scale;

    const SAMPLE_RATE: u32 = 10000;

    fn grain_at(start: f32, samples: Vec<f32>) -> Grain {
        // 100 samples at 10kHz, 40 samples ramp up, 60 samples ramp down
        Grain::new(start, 0.01, 0.004, 0.004, samples)
    }

    fn noise(len: usize, seed: u64) -> Vec<f32> {
        use rand::{rngs::SmallRng, Rng, SeedableRng};
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    #[test]
    fn empty_grains() {
        assert_eq!(
            reconstruct(&[], SAMPLE_RATE, 1.0),
            Err(Error::EmptyGrainsError)
        );
    }

    #[test]
    fn isolated_grain_keeps_its_samples() -> Result<(), Error> {
        let samples = noise(100, 1);
        let grain = grain_at(0.0, samples.clone());
        let output = reconstruct(&[grain], SAMPLE_RATE, 1.0)?;
        assert_eq!(output.len(), 100);
        // zero weight at the very first ramp up sample
        assert_eq!(output[0], 0.0);
        for (output, sample) in output.iter().zip(&samples).skip(1) {
            assert!((output - sample).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn gain() -> Result<(), Error> {
        let samples = noise(100, 2);
        let grain = grain_at(0.0, samples.clone());
        let output = reconstruct(&[grain], SAMPLE_RATE, 2.0)?;
        for (output, sample) in output.iter().zip(&samples).skip(1) {
            assert!((output - sample * 2.0).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn silence_in_gaps() -> Result<(), Error> {
        // stride 0.02s > width 0.01s: every second 100 samples block has no grain
        let grains = (0..4)
            .map(|index| grain_at(index as f32 * 0.02, vec![1.0; 100]))
            .collect::<Vec<_>>();
        let output = reconstruct(&grains, SAMPLE_RATE, 1.0)?;
        assert_eq!(output.len(), 700);
        for block in 0..4 {
            let start = block * 200;
            assert_eq!(output[start], 0.0);
            assert!(output[start + 1..start + 100]
                .iter()
                .all(|s| (s - 1.0).abs() < 1e-5));
            if block < 3 {
                assert!(output[start + 100..start + 200].iter().all(|s| *s == 0.0));
            }
        }
        Ok(())
    }

    #[test]
    fn silence_before_first_grain() -> Result<(), Error> {
        let grain = grain_at(0.005, vec![0.5; 100]);
        let output = reconstruct(&[grain], SAMPLE_RATE, 1.0)?;
        assert_eq!(output.len(), 150);
        assert!(output[..51].iter().all(|s| *s == 0.0));
        assert!(output[51..].iter().all(|s| (s - 0.5).abs() < 1e-5));
        Ok(())
    }

    #[test]
    fn overlapping_grains_blend_by_weight() -> Result<(), Error> {
        // two constant grains overlapping by 50 samples
        let grains = vec![grain_at(0.0, vec![1.0; 100]), grain_at(0.005, vec![-1.0; 100])];
        let output = reconstruct(&grains, SAMPLE_RATE, 1.0)?;
        assert_eq!(output.len(), 150);

        let first = GrainEnvelope::new(100, 40, 40).weights();
        let second = GrainEnvelope::new(100, 40, 40).weights();
        for index in 50..100 {
            let w1 = first[index];
            let w2 = second[index - 50];
            let expected = (w1 - w2) / (w1 + w2);
            assert!((output[index] - expected).abs() < 1e-5);
        }
        assert!(output.iter().all(|s| (-1.0..=1.0).contains(s)));
        Ok(())
    }

    #[test]
    fn output_length_from_latest_grain() -> Result<(), Error> {
        let ordered = vec![grain_at(0.0, vec![0.0; 100]), grain_at(0.03, vec![0.0; 100])];
        assert_eq!(reconstruct(&ordered, SAMPLE_RATE, 1.0)?.len(), 400);

        let unordered = vec![grain_at(0.03, vec![0.0; 100]), grain_at(0.0, vec![0.0; 100])];
        assert_eq!(reconstruct(&unordered, SAMPLE_RATE, 1.0)?.len(), 400);
        Ok(())
    }

    #[test]
    fn grain_order_does_not_matter() -> Result<(), Error> {
        let mut grains = (0..8)
            .map(|index| grain_at(index as f32 * 0.005, noise(100, index)))
            .collect::<Vec<_>>();
        let forward = reconstruct(&grains, SAMPLE_RATE, 1.0)?;
        grains.reverse();
        let backward = reconstruct(&grains, SAMPLE_RATE, 1.0)?;
        assert_eq!(forward.len(), backward.len());
        for (a, b) in forward.iter().zip(&backward) {
            assert!((a - b).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn invalid_grains() {
        let mut grains = vec![grain_at(0.0, vec![0.0; 100]), grain_at(0.01, vec![0.0; 100])];
        scale(&mut grains, -1.0, false);
        assert!(matches!(
            reconstruct(&grains, SAMPLE_RATE, 1.0),
            Err(Error::InvalidGrainError(1, _))
        ));

        scale(&mut grains, f32::NAN, false);
        assert!(matches!(
            reconstruct(&grains, SAMPLE_RATE, 1.0),
            Err(Error::InvalidGrainError(0, _))
        ));

        let too_long_ramp = Grain::new(0.0, 0.01, 0.0, 0.02, vec![0.0; 100]);
        assert!(matches!(
            reconstruct(&[too_long_ramp], SAMPLE_RATE, 1.0),
            Err(Error::InvalidGrainError(0, _))
        ));

        let no_samples = Grain::new(0.0, 0.0, 0.0, 0.0, Vec::new());
        assert!(matches!(
            reconstruct(&[no_samples], SAMPLE_RATE, 1.0),
            Err(Error::InvalidGrainError(0, _))
        ));

        let mut far_away = grain_at(0.0, vec![0.0; 100]);
        far_away.set_start(1e30);
        assert!(matches!(
            reconstruct(&[far_away], SAMPLE_RATE, 1.0),
            Err(Error::InvalidGrainError(0, _))
        ));

        let grain = grain_at(0.0, vec![0.0; 100]);
        assert!(matches!(
            reconstruct(&[grain.clone()], 0, 1.0),
            Err(Error::ParameterError(_))
        ));
        assert!(matches!(
            reconstruct(&[grain], SAMPLE_RATE, f32::INFINITY),
            Err(Error::ParameterError(_))
        ));
    }
}
