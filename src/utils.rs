//! Numeric helpers shared by the grain extractor, scaler and reconstructor.

pub mod buffer;
pub mod time;

// -------------------------------------------------------------------------------------------------

/// Smallest dB value that is not treated as silence.
pub const MINUS_INF_IN_DB: f32 = -200.0f32;

// -------------------------------------------------------------------------------------------------

/// Convert a linear gain factor into decibels.
pub fn linear_to_db(value: f32) -> f32 {
    if value == 1.0 {
        return 0.0; // avoid rounding errors at exactly 0 dB
    } else if value > 1e-12f32 {
        return value.ln() * (20.0f32 / std::f32::consts::LN_10);
    }
    MINUS_INF_IN_DB
}

/// Convert decibels into a linear gain factor.
pub fn db_to_linear(value: f32) -> f32 {
    if value == 0.0f32 {
        return 1.0f32; // avoid rounding errors at exactly 0 dB
    } else if value > MINUS_INF_IN_DB {
        return (value * (std::f32::consts::LN_10 / 20.0f32)).exp();
    }
    0.0f32
}

// -------------------------------------------------------------------------------------------------
