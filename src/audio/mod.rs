//! Microphone capture and spectral feature extraction
//!
//! [`SpectrumCapture`] turns the default input device into a stream of
//! [`AudioFrame`]s; [`AudioCaptureSession`] owns the sampling loop that
//! feeds whichever consumer is registered. The functions in [`features`]
//! reduce a frame's byte bins to the levels the drawing pipeline runs on.

pub mod capture;
pub mod features;
pub mod spectrum;

pub use capture::{AudioCaptureSession, CaptureSource, FrameConsumer};
pub use features::{AudioFrame, BandProfile};
pub use spectrum::SpectrumCapture;
