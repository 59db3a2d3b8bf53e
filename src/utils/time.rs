// -------------------------------------------------------------------------------------------------

/// Frame offsets closer than this to an integer, relative to their magnitude, are treated as
/// that integer, so that `f32` representation errors of second values (e.g. `0.7f32` is
/// `0.69999999`) don't drop a frame. Two `f32` ulps.
const FRAME_EPSILON: f64 = 2.0 * f32::EPSILON as f64;

// -------------------------------------------------------------------------------------------------

/// Convert a time in seconds to a fractional frame position with the given sample rate.
pub fn seconds_to_frames(seconds: f32, sample_rate: u32) -> f64 {
    debug_assert!(sample_rate > 0, "Invalid sample rate");
    let frames = seconds as f64 * sample_rate as f64;
    let rounded = frames.round();
    if (frames - rounded).abs() <= (frames.abs() * FRAME_EPSILON).max(1e-6) {
        rounded
    } else {
        frames
    }
}

/// Convert a time in seconds to frames, rounding down.
/// Negative times are clamped to frame 0.
pub fn seconds_to_frames_floor(seconds: f32, sample_rate: u32) -> usize {
    seconds_to_frames(seconds, sample_rate).floor().max(0.0) as usize
}

/// Convert a time in seconds to frames, rounding to the nearest frame.
/// Negative times are clamped to frame 0.
pub fn seconds_to_frames_round(seconds: f32, sample_rate: u32) -> usize {
    seconds_to_frames(seconds, sample_rate).round().max(0.0) as usize
}

/// Convert a frame count to seconds with the given sample rate.
pub fn frames_to_seconds(frames: usize, sample_rate: u32) -> f32 {
    debug_assert!(sample_rate > 0, "Invalid sample rate");
    (frames as f64 / sample_rate as f64) as f32
}

// -------------------------------------------------------------------------------------------------
