//! Live spectrum capture over the system microphone
//!
//! Builds a cpal input stream, accumulates samples from the device
//! callback, and on demand turns the most recent window into the
//! byte-magnitude frequency bins the rest of the pipeline consumes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use tracing::{debug, error};

use crate::audio::capture::CaptureSource;
use crate::audio::features::AudioFrame;
use crate::config::CaptureConfig;
use crate::{Error, Result};

/// Decibel floor of the byte mapping; quieter bins clamp to 0
const MIN_DB: f32 = -100.0;

/// Decibel ceiling of the byte mapping; louder bins clamp to 255
const MAX_DB: f32 = -30.0;

/// Per-bin exponential smoothing between consecutive frames
const BIN_SMOOTHING: f32 = 0.8;

/// Microphone-backed [`CaptureSource`] producing byte-magnitude spectra
pub struct SpectrumCapture {
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Arc<Mutex<Vec<f32>>>,
    recent: Vec<f32>,
    smoothed: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    stream: Option<Stream>,
}

impl SpectrumCapture {
    /// Create a capture backend; the device is not touched until
    /// [`CaptureSource::open`]
    #[must_use]
    pub fn new(config: &CaptureConfig) -> Self {
        let fft_size = config.normalized_fft_size();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            fft_size,
            fft,
            window: hann_window(fft_size),
            buffer: Arc::new(Mutex::new(Vec::new())),
            recent: Vec::with_capacity(fft_size),
            smoothed: vec![0.0; fft_size / 2],
            sample_rate: 0,
            channels: 1,
            stream: None,
        }
    }

    /// Number of frequency bins per produced frame
    #[must_use]
    pub const fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    fn fold_into_recent(&mut self, drained: &[f32]) {
        if self.channels <= 1 {
            self.recent.extend_from_slice(drained);
        } else {
            // interleaved multi-channel input is averaged down to mono
            let channels = usize::from(self.channels);
            #[allow(clippy::cast_precision_loss)]
            self.recent.extend(
                drained
                    .chunks_exact(channels)
                    .map(|frame| frame.iter().sum::<f32>() / channels as f32),
            );
        }

        if self.recent.len() > self.fft_size {
            let excess = self.recent.len() - self.fft_size;
            self.recent.drain(..excess);
        }
    }
}

#[async_trait(?Send)]
impl CaptureSource for SpectrumCapture {
    fn name(&self) -> &'static str {
        "microphone"
    }

    async fn open(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| Error::CaptureUnavailable("no input device available".to_string()))?;

        let supported = device
            .default_input_config()
            .map_err(|e| Error::CaptureUnavailable(e.to_string()))?;
        let config: StreamConfig = supported.config();
        self.sample_rate = config.sample_rate.0;
        self.channels = config.channels;

        let buffer = Arc::clone(&self.buffer);
        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    error!(error = %err, "capture stream error");
                },
                None,
            )
            .map_err(|e| Error::CaptureUnavailable(e.to_string()))?;

        stream
            .play()
            .map_err(|e| Error::CaptureUnavailable(e.to_string()))?;

        debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = self.sample_rate,
            channels = self.channels,
            fft_size = self.fft_size,
            "spectrum capture started"
        );
        self.stream = Some(stream);
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn read_frame(&mut self) -> Option<AudioFrame> {
        let drained = self
            .buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();
        self.fold_into_recent(&drained);

        // not enough history for a full transform yet
        if self.recent.len() < self.fft_size {
            return None;
        }

        let mut freq: Vec<Complex<f32>> = self
            .recent
            .iter()
            .zip(&self.window)
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        self.fft.process(&mut freq);

        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / self.fft_size as f32;
        let half = self.fft_size / 2;
        let mut bins = Vec::with_capacity(half);
        for (slot, value) in self.smoothed.iter_mut().zip(&freq[..half]) {
            let magnitude = value.norm() * scale;
            *slot = BIN_SMOOTHING * *slot + (1.0 - BIN_SMOOTHING) * magnitude;
            let db = if *slot > 1e-10 {
                20.0 * slot.log10()
            } else {
                MIN_DB
            };
            let level = ((db - MIN_DB) / (MAX_DB - MIN_DB)).clamp(0.0, 1.0);
            bins.push((level * 255.0).round() as u8);
        }

        Some(AudioFrame::from_bins(bins, self.sample_rate))
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("spectrum capture stopped");
        }
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
        self.recent.clear();
        self.smoothed.fill(0.0);
    }
}

#[allow(clippy::cast_precision_loss)]
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / (size - 1) as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture() -> SpectrumCapture {
        SpectrumCapture::new(&CaptureConfig::default())
    }

    fn push_samples(capture: &SpectrumCapture, samples: &[f32]) {
        capture.buffer.lock().unwrap().extend_from_slice(samples);
    }

    #[test]
    fn test_hann_window_tapers_to_zero_at_the_edges() {
        let window = hann_window(512);
        assert!(window[0].abs() < 1e-6);
        assert!(window[511].abs() < 1e-6);
        assert!((window[256] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_read_frame_requires_a_full_window() {
        let mut capture = capture();
        capture.sample_rate = 48_000;

        push_samples(&capture, &[0.1; 511]);
        assert!(capture.read_frame().is_none());

        push_samples(&capture, &[0.1]);
        assert!(capture.read_frame().is_some());
    }

    #[test]
    fn test_silent_input_produces_zero_bins() {
        let mut capture = capture();
        capture.sample_rate = 48_000;

        push_samples(&capture, &[0.0; 512]);
        let frame = capture.read_frame().unwrap();

        assert_eq!(frame.bins.len(), 256);
        assert!(frame.bins.iter().all(|&b| b == 0));
        assert!(frame.volume.abs() < f32::EPSILON);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_pure_tone_dominates_its_bin() {
        let mut capture = capture();
        capture.sample_rate = 48_000;

        // 3 kHz lands exactly on bin 32 at 48 kHz / 512 points
        let samples: Vec<f32> = (0..512)
            .map(|i| {
                let t = i as f32 / 48_000.0;
                0.9 * (std::f32::consts::TAU * 3000.0 * t).sin()
            })
            .collect();
        push_samples(&capture, &samples);

        let frame = capture.read_frame().unwrap();
        assert_eq!(crate::audio::features::dominant_bin_index(&frame.bins), 32);
        assert!(frame.bins[32] > 200);
    }

    #[test]
    fn test_close_resets_accumulated_state() {
        let mut capture = capture();
        capture.sample_rate = 48_000;

        push_samples(&capture, &[0.5; 512]);
        capture.read_frame().unwrap();

        capture.close();
        assert!(capture.recent.is_empty());
        assert!(capture.smoothed.iter().all(|&m| m.abs() < f32::EPSILON));

        // after a reset a fresh full window is required again
        push_samples(&capture, &[0.5; 100]);
        assert!(capture.read_frame().is_none());
    }
}
