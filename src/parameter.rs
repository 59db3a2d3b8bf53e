//! Grain extraction settings.

use std::ops::RangeInclusive;

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Sample rate of the recordings the default parameters are tuned for.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

// -------------------------------------------------------------------------------------------------

/// Parameters controlling how a source buffer gets sliced into grains.
///
/// All values are in seconds. Use [`Self::validate`] to check the hard constraints before
/// extracting grains. The `*_RANGE` constants describe sensible ranges for interactive use,
/// which are not enforced here.
#[derive(Clone, Debug, PartialEq)]
pub struct GrainParameters {
    /// Duration of each grain. Gets extended to `ramp_in + ramp_out` when shorter.
    pub width: f32,
    /// Distance between the start of two consecutive grains.
    pub stride: f32,
    /// Duration of the linear fade-in.
    pub ramp_in: f32,
    /// Duration of the linear fade-out.
    pub ramp_out: f32,
}

impl Default for GrainParameters {
    fn default() -> Self {
        Self::new(0.2, 0.1)
    }
}

impl GrainParameters {
    /// Fraction of the grain width that is used for each ramp in [`Self::new`].
    pub const RAMP_WIDTH_RATIO: f32 = 0.45;

    /// Recommended grain widths.
    pub const WIDTH_RANGE: RangeInclusive<f32> = 0.1..=0.5;
    /// Recommended grain strides.
    pub const STRIDE_RANGE: RangeInclusive<f32> = 0.05..=0.5;
    /// Recommended time scale factors for a single scaling operation.
    pub const SCALE_RANGE: RangeInclusive<f32> = 0.25..=4.0;
    /// Recommended output gains.
    pub const GAIN_RANGE: RangeInclusive<f32> = 1.0..=2.0;

    /// Create new parameters with the given grain width and stride. Ramp in and out each
    /// take [`Self::RAMP_WIDTH_RATIO`] of the grain width.
    pub fn new(width: f32, stride: f32) -> Self {
        Self {
            width,
            stride,
            ramp_in: width * Self::RAMP_WIDTH_RATIO,
            ramp_out: width * Self::RAMP_WIDTH_RATIO,
        }
    }

    /// Builder style setter for explicit ramp in and out durations.
    pub fn with_ramps(mut self, ramp_in: f32, ramp_out: f32) -> Self {
        self.ramp_in = ramp_in;
        self.ramp_out = ramp_out;
        self
    }

    /// The grain width that actually gets used: never shorter than both ramps together.
    pub fn effective_width(&self) -> f32 {
        self.width.max(self.ramp_in + self.ramp_out)
    }

    /// Validate all parameters.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(Error::ParameterError(format!(
                "Grain width must be a positive number of seconds, got {}",
                self.width
            )));
        }

        if !self.stride.is_finite() || self.stride <= 0.0 {
            return Err(Error::ParameterError(format!(
                "Grain stride must be greater than zero seconds, got {}",
                self.stride
            )));
        }

        if !self.ramp_in.is_finite() || self.ramp_in < 0.0 {
            return Err(Error::ParameterError(format!(
                "Grain ramp in must be zero or more seconds, got {}",
                self.ramp_in
            )));
        }

        if !self.ramp_out.is_finite() || self.ramp_out < 0.0 {
            return Err(Error::ParameterError(format!(
                "Grain ramp out must be zero or more seconds, got {}",
                self.ramp_out
            )));
        }

        if self.effective_width() <= 0.0 {
            return Err(Error::ParameterError(
                "Grain width and ramps can not all be zero".to_string(),
            ));
        }

        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
