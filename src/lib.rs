#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod error;
mod extractor;
mod grainer;
mod parameter;
mod reconstructor;
mod scaler;

// public, flat re-exports
pub use error::Error;

pub use extractor::extract;
pub use grain::{envelope::GrainEnvelope, Grain};
pub use grainer::Grainer;
pub use parameter::{GrainParameters, DEFAULT_SAMPLE_RATE};
pub use reconstructor::reconstruct;
pub use scaler::scale;

// public mods
pub mod grain;
pub mod utils;
