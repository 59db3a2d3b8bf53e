//! Grain timeline scaling.

use crate::Grain;

// -------------------------------------------------------------------------------------------------

/// Scale the output positions of all given grains by `factor`.
///
/// With `compound` set, the current output position gets scaled, so repeated calls multiply.
/// Otherwise the position is recalculated from the grain's original source position, which
/// overwrites any previous scaling.
///
/// Any factor is accepted. Negative or non-finite factors produce timelines that
/// [`reconstruct`](crate::reconstruct) will reject.
pub fn scale(grains: &mut [Grain], factor: f32, compound: bool) {
    for grain in grains.iter_mut() {
        let start = if compound {
            grain.start() * factor
        } else {
            grain.original_start() * factor
        };
        grain.set_start(start);
    }
}

// -------------------------------------------------------------------------------------------------
