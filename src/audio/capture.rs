//! Capture session and the frame pump
//!
//! [`AudioCaptureSession`] owns a [`CaptureSource`] and drives it on a
//! fixed tick, handing each produced frame to a [`FrameConsumer`]. The
//! source is a capability interface so the pipeline can run against the
//! real microphone or a scripted fixture.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::Result;
use crate::audio::features::AudioFrame;
use crate::config::CaptureConfig;

/// Capability interface over a microphone-like spectrum source
///
/// Implementations are driven from the task that owns them and do not need
/// to be `Send` (platform audio handles usually are not).
#[async_trait(?Send)]
pub trait CaptureSource {
    /// Get the source name (used in log context)
    fn name(&self) -> &'static str;

    /// Acquire the underlying device and start capturing
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CaptureUnavailable`] when no device can be
    /// acquired.
    async fn open(&mut self) -> Result<()>;

    /// Produce the current spectral frame, if one is ready
    fn read_frame(&mut self) -> Option<AudioFrame>;

    /// Release the device; safe to call repeatedly
    fn close(&mut self);
}

/// Receives the frames a capture session produces
#[async_trait(?Send)]
pub trait FrameConsumer {
    /// Handle one frame
    async fn consume(&mut self, frame: &AudioFrame);
}

/// Periodic sampling loop over a capture source
pub struct AudioCaptureSession {
    source: Box<dyn CaptureSource>,
    tick: Duration,
    open: bool,
}

impl AudioCaptureSession {
    /// Create a session over `source` ticking at the configured rate
    #[must_use]
    pub fn new(source: Box<dyn CaptureSource>, config: &CaptureConfig) -> Self {
        Self {
            source,
            tick: config.tick(),
            open: false,
        }
    }

    /// Acquire the capture device
    ///
    /// Idempotent; opening an already-open session does nothing.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::CaptureUnavailable`] from the source. The
    /// failure is logged here but must still be handled by the caller.
    pub async fn open(&mut self) -> Result<()> {
        if self.open {
            debug!("capture session already open");
            return Ok(());
        }

        if let Err(e) = self.source.open().await {
            warn!(source = self.source.name(), error = %e, "capture open failed");
            return Err(e);
        }

        self.open = true;
        info!(source = self.source.name(), "capture session opened");
        Ok(())
    }

    /// Release the capture device
    ///
    /// Idempotent; closing a session that was never opened does nothing.
    pub fn close(&mut self) {
        if self.open {
            self.source.close();
            self.open = false;
            info!(source = self.source.name(), "capture session closed");
        } else {
            debug!("close on a session that is not open");
        }
    }

    /// Whether the session currently holds the device
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Pump frames to `consumer` until `shutdown` fires
    ///
    /// Reads at most one frame per tick; ticks with no frame ready are
    /// skipped. Returns immediately if the session is not open.
    pub async fn pump<C: FrameConsumer>(
        &mut self,
        consumer: &mut C,
        shutdown: &mut mpsc::Receiver<()>,
    ) {
        if !self.open {
            warn!("pump on a session that is not open");
            return;
        }

        let mut ticker = tokio::time::interval(self.tick);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(frame) = self.source.read_frame() {
                        consumer.consume(&frame).await;
                    } else {
                        trace!("no frame ready this tick");
                    }
                }
                _ = shutdown.recv() => {
                    info!("capture pump shutting down");
                    break;
                }
            }
        }
    }
}

impl Drop for AudioCaptureSession {
    fn drop(&mut self) {
        if self.open {
            self.source.close();
        }
    }
}
