//! Spectral synthesis over the partial bank

pub mod bank;
pub mod category;
pub mod engine;

pub use bank::{AcousticSignature, NoiseColor, NoiseDescriptor, Partial, PartialBank};
pub use category::SoundCategory;
pub use engine::SpectralEngine;
