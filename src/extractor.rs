//! Slices a mono source buffer into fixed width, evenly spaced, zero-padded grains.

use crate::{
    utils::time::seconds_to_frames_floor,
    Error, Grain, GrainParameters,
};

// -------------------------------------------------------------------------------------------------

/// Number of grains needed to cover `clip_duration` with the given stride: `ceil(D / s)`.
///
/// Ratios within two `f32` ulps of an integer are treated as that integer, so that
/// e.g. a 2.0s clip with a 0.1s stride yields 20 and not 21 grains.
fn grain_count(clip_duration: f32, stride: f32) -> Result<usize, Error> {
    let ratio = clip_duration as f64 / stride as f64;
    if ratio <= 0.0 {
        return Ok(0);
    }
    if ratio > isize::MAX as f64 {
        return Err(Error::ParameterError(format!(
            "Clip duration {clip_duration}s needs too many grains with a {stride}s stride"
        )));
    }
    let rounded = ratio.round();
    if (ratio - rounded).abs() <= ratio * 2.0 * f32::EPSILON as f64 {
        Ok(rounded as usize)
    } else {
        Ok(ratio.ceil() as usize)
    }
}

// -------------------------------------------------------------------------------------------------

/// Extract grains from the given mono sample buffer.
///
/// Grains are placed every `parameters.stride` seconds, starting at 0, for as long as the grain
/// position is before `clip_duration`, which results in `ceil(clip_duration / stride)` grains.
/// Each grain holds `floor(width * sample_rate)` samples, copied from the source at its
/// position. Samples past the end of the source are zero.
///
/// The grain width gets extended to `ramp_in + ramp_out` when it's too short to host both
/// ramps. An empty source results in an empty grain list.
///
/// Returned grains are ordered by their source position, and their output position equals
/// their source position.
pub fn extract(
    samples: &[f32],
    sample_rate: u32,
    clip_duration: f32,
    parameters: &GrainParameters,
) -> Result<Vec<Grain>, Error> {
    if sample_rate == 0 {
        return Err(Error::ParameterError(
            "Sample rate must be greater than zero".to_string(),
        ));
    }
    if !clip_duration.is_finite() {
        return Err(Error::ParameterError(format!(
            "Clip duration must be a finite number of seconds, got {clip_duration}"
        )));
    }
    parameters.validate()?;

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let width = parameters.effective_width();
    if width > parameters.width {
        log::warn!(
            "Grain width {}s is too short for its ramps, extending it to {}s",
            parameters.width,
            width
        );
    }

    let grain_sample_count = seconds_to_frames_floor(width, sample_rate);
    if grain_sample_count == 0 {
        return Err(Error::ParameterError(format!(
            "Grain width {width}s is shorter than a single sample at {sample_rate}Hz"
        )));
    }

    let count = grain_count(clip_duration, parameters.stride)?;
    let total_sample_count = count
        .checked_mul(grain_sample_count)
        .filter(|total| *total <= isize::MAX as usize / std::mem::size_of::<f32>());
    if total_sample_count.is_none() {
        return Err(Error::ParameterError(format!(
            "{count} grains of {grain_sample_count} samples exceed the addressable memory"
        )));
    }

    let mut grains = Vec::with_capacity(count);
    for index in 0..count {
        let start = (index as f64 * parameters.stride as f64) as f32;

        let grain_start = seconds_to_frames_floor(start, sample_rate);
        let grain_end = (grain_start + grain_sample_count).min(samples.len());

        let mut grain_samples = vec![0.0; grain_sample_count];
        if grain_end > grain_start {
            let copy_count = grain_end - grain_start;
            grain_samples[..copy_count].copy_from_slice(&samples[grain_start..grain_end]);
        }

        grains.push(Grain::new(
            start,
            width,
            parameters.ramp_in,
            parameters.ramp_out,
            grain_samples,
        ));
    }

    log::debug!(
        "Extracted {} grains of {} samples from {} source samples",
        grains.len(),
        grain_sample_count,
        samples.len()
    );

    Ok(grains)
}

// -------------------------------------------------------------------------------------------------
