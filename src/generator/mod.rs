//! Frame-based signal generators
//!
//! Every waveform the crate produces (membrane partials, stick click, stick
//! ring) comes from a [`SignalGenerator`] driven frame by frame and collected
//! into a fixed-length buffer with [`render`].

pub mod additive;
pub mod damped;
pub mod noise;

pub use additive::{band_gain, synthesize_additive, AdditiveVoice};
pub use damped::DampedSineGenerator;
pub use noise::NoiseBurstGenerator;

/// Frame size used when rendering a generator into a buffer
pub const FRAME_SIZE: usize = 512;

/// Represents the current state of a signal generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Generator is still producing samples
    Running,
    /// Generator has completed and will produce no more samples
    Complete,
}

/// Core trait for all signal generators
///
/// Signal generators produce audio samples frame by frame.
/// Each generator is independent and can run in parallel with others.
pub trait SignalGenerator {
    /// Process the next frame of samples
    ///
    /// # Arguments
    /// * `buffer` - Mutable slice to write samples into. The length determines frame size.
    ///
    /// # Returns
    /// * `GeneratorState::Running` if the generator is still active
    /// * `GeneratorState::Complete` if the generator has finished
    ///
    /// # Note
    /// Even when Complete is returned, the buffer is filled with valid samples
    /// (silence once the sound has died out).
    fn process(&mut self, buffer: &mut [f32]) -> GeneratorState;

    /// Check if this generator has completed
    fn is_complete(&self) -> bool;

    /// Reset the generator to its initial state
    ///
    /// A reset generator replays exactly the same samples.
    fn reset(&mut self);
}

/// Render a generator into a buffer of exactly `len` samples.
///
/// Processing stops early once the generator completes; the rest of the
/// buffer stays silent.
pub fn render<G: SignalGenerator + ?Sized>(generator: &mut G, len: usize) -> Vec<f32> {
    let mut output = vec![0.0f32; len];
    for frame in output.chunks_mut(FRAME_SIZE) {
        if generator.process(frame) == GeneratorState::Complete {
            break;
        }
    }
    output
}
