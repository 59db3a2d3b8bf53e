use crate::{
    extract, reconstruct, scale, utils::time::frames_to_seconds, Error, Grain, GrainParameters,
};

// -------------------------------------------------------------------------------------------------

/// Owns the grains of one granulated recording and runs the scale and reconstruct steps on
/// them.
///
/// Granulating again replaces all previously extracted grains.
///
/// ## Example
///
/// ```rust
/// use grainstretch::{Grainer, GrainParameters};
///
/// # fn main() -> Result<(), grainstretch::Error> {
/// let sample_rate = 44100;
/// let recording = vec![0.25; sample_rate as usize * 2];
///
/// let mut grainer = Grainer::new();
/// grainer.granulate(&recording, sample_rate, &GrainParameters::new(0.2, 0.1))?;
/// grainer.scale_grain_time(1.5, false);
/// let stretched = grainer.reconstruct_grains(1.0)?;
/// assert!(stretched.len() > recording.len());
/// # Ok(()) }
/// ```
#[derive(Debug, Default, Clone)]
pub struct Grainer {
    grains: Vec<Grain>,
    sample_rate: u32,
}

impl Grainer {
    /// Create a new grainer without any grains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current grains with grains extracted from the given mono recording.
    /// The whole recording gets granulated. Returns the number of extracted grains.
    pub fn granulate(
        &mut self,
        samples: &[f32],
        sample_rate: u32,
        parameters: &GrainParameters,
    ) -> Result<usize, Error> {
        self.clear();
        if sample_rate == 0 {
            return Err(Error::ParameterError(
                "Sample rate must be greater than zero".to_string(),
            ));
        }
        let clip_duration = frames_to_seconds(samples.len(), sample_rate);
        self.grains = extract(samples, sample_rate, clip_duration, parameters)?;
        self.sample_rate = sample_rate;
        Ok(self.grains.len())
    }

    /// Scale the output times of all grains. See [`scale`] for details.
    pub fn scale_grain_time(&mut self, factor: f32, compound: bool) {
        scale(&mut self.grains, factor, compound);
    }

    /// Reconstruct the grains into a continuous signal at the recording's sample rate.
    /// See [`reconstruct`] for details.
    pub fn reconstruct_grains(&self, gain: f32) -> Result<Vec<f32>, Error> {
        reconstruct(&self.grains, self.sample_rate, gain)
    }

    /// Drop all grains.
    pub fn clear(&mut self) {
        self.grains.clear();
    }

    /// True if there are any grains to reconstruct.
    pub fn has_grains(&self) -> bool {
        !self.grains.is_empty()
    }

    /// Number of grains.
    pub fn len(&self) -> usize {
        self.grains.len()
    }

    /// True if there are no grains.
    pub fn is_empty(&self) -> bool {
        self.grains.is_empty()
    }

    /// Read-only access to the grains.
    pub fn grains(&self) -> &[Grain] {
        &self.grains
    }

    /// Sample rate of the granulated recording. 0 when nothing got granulated yet.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

// -------------------------------------------------------------------------------------------------
